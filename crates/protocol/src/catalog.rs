use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ToolError;
use crate::JsonObject;

/// Names of the tools every fsmcp component understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    CreateFile,
    ReadFile,
    EditFile,
    DeleteFile,
    ListFiles,
}

impl ToolName {
    pub const ALL: [ToolName; 5] = [
        ToolName::CreateFile,
        ToolName::ReadFile,
        ToolName::EditFile,
        ToolName::DeleteFile,
        ToolName::ListFiles,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::CreateFile => "create_file",
            ToolName::ReadFile => "read_file",
            ToolName::EditFile => "edit_file",
            ToolName::DeleteFile => "delete_file",
            ToolName::ListFiles => "list_files",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ToolError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct CreateFileRequest {
    /// File path
    pub path: String,
    /// File content
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct ReadFileRequest {
    /// File path
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct EditFileRequest {
    /// File path
    pub path: String,
    /// New content
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct DeleteFileRequest {
    /// File path
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
pub struct ListFilesRequest {
    /// Directory path
    pub path: String,
}

/// A tool invocation with its arguments already parsed into the tool's request type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    CreateFile(CreateFileRequest),
    ReadFile(ReadFileRequest),
    EditFile(EditFileRequest),
    DeleteFile(DeleteFileRequest),
    ListFiles(ListFilesRequest),
}

impl ToolCall {
    /// Resolve `name` against the catalog and decode `arguments` into its request type.
    ///
    /// Missing arguments are treated as an empty object, so a tool that needs `path` reports the
    /// missing field rather than an unknown shape.
    pub fn parse(name: &str, arguments: Option<&JsonObject>) -> Result<Self, ToolError> {
        let tool: ToolName = name.parse()?;
        let args = Value::Object(arguments.cloned().unwrap_or_default());
        Ok(match tool {
            ToolName::CreateFile => ToolCall::CreateFile(decode_args(tool, args)?),
            ToolName::ReadFile => ToolCall::ReadFile(decode_args(tool, args)?),
            ToolName::EditFile => ToolCall::EditFile(decode_args(tool, args)?),
            ToolName::DeleteFile => ToolCall::DeleteFile(decode_args(tool, args)?),
            ToolName::ListFiles => ToolCall::ListFiles(decode_args(tool, args)?),
        })
    }

    pub fn name(&self) -> ToolName {
        match self {
            ToolCall::CreateFile(_) => ToolName::CreateFile,
            ToolCall::ReadFile(_) => ToolName::ReadFile,
            ToolCall::EditFile(_) => ToolName::EditFile,
            ToolCall::DeleteFile(_) => ToolName::DeleteFile,
            ToolCall::ListFiles(_) => ToolName::ListFiles,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            ToolCall::CreateFile(req) => &req.path,
            ToolCall::ReadFile(req) => &req.path,
            ToolCall::EditFile(req) => &req.path,
            ToolCall::DeleteFile(req) => &req.path,
            ToolCall::ListFiles(req) => &req.path,
        }
    }
}

fn decode_args<T: DeserializeOwned>(tool: ToolName, args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args)
        .map_err(|err| ToolError::invalid_arguments(tool.as_str(), err.to_string()))
}

#[derive(Clone, Copy)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    schema: fn() -> JsonObject,
}

impl ToolDescriptor {
    pub fn input_schema(&self) -> JsonObject {
        (self.schema)()
    }

    /// Field names listed under `required` in the input schema.
    pub fn required_fields(&self) -> Vec<String> {
        self.input_schema()
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

fn schema_of<T: JsonSchema>() -> JsonObject {
    match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(Value::Object(map)) => map,
        _ => JsonObject::new(),
    }
}

pub const TOOL_CATALOG: &[ToolDescriptor] = &[
    ToolDescriptor {
        name: "create_file",
        description: "Create a new file with content",
        schema: schema_of::<CreateFileRequest>,
    },
    ToolDescriptor {
        name: "read_file",
        description: "Read file content",
        schema: schema_of::<ReadFileRequest>,
    },
    ToolDescriptor {
        name: "edit_file",
        description: "Edit file content",
        schema: schema_of::<EditFileRequest>,
    },
    ToolDescriptor {
        name: "delete_file",
        description: "Delete a file",
        schema: schema_of::<DeleteFileRequest>,
    },
    ToolDescriptor {
        name: "list_files",
        description: "List files in directory",
        schema: schema_of::<ListFilesRequest>,
    },
];

/// Check that a published catalog and the routable tool set agree.
///
/// Every entry must route to a [`ToolName`], appear once, and declare an object schema whose
/// required fields are string-typed; every [`ToolName`] must be published.
pub fn validate_catalog(catalog: &[ToolDescriptor]) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in catalog {
        let Ok(tool) = entry.name.parse::<ToolName>() else {
            bail!("catalog entry '{}' has no handler", entry.name);
        };
        if !seen.insert(tool) {
            bail!("catalog entry '{}' is published twice", entry.name);
        }

        let schema = entry.input_schema();
        if schema.get("type").and_then(Value::as_str) != Some("object") {
            bail!("catalog entry '{}' does not declare an object schema", entry.name);
        }
        let required = entry.required_fields();
        if required.is_empty() {
            bail!("catalog entry '{}' declares no required fields", entry.name);
        }
        for field in &required {
            let field_type = schema
                .get("properties")
                .and_then(|props| props.get(field))
                .and_then(|prop| prop.get("type"))
                .and_then(Value::as_str);
            if field_type != Some("string") {
                bail!(
                    "catalog entry '{}' field '{field}' is not string-typed",
                    entry.name
                );
            }
        }
    }

    for tool in ToolName::ALL {
        if !seen.contains(&tool) {
            bail!("tool '{tool}' has a handler but is missing from the catalog");
        }
    }
    Ok(())
}

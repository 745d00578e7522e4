//! Shared protocol types for the fsmcp filesystem tools.
//!
//! Both the MCP dispatcher and the simulated storage client speak the same surface: the five
//! tools in [`TOOL_CATALOG`], invoked with string arguments and answered with a
//! [`ResultEnvelope`] holding exactly one text block.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod error;

pub use catalog::{
    validate_catalog, CreateFileRequest, DeleteFileRequest, EditFileRequest,
    ListFilesRequest, ReadFileRequest, ToolCall, ToolDescriptor, ToolName, TOOL_CATALOG,
};
pub use error::ToolError;

pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Successful tool output: a single text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    text: String,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
}

/// Wire shape of every tool response. `isError` is only present on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    pub content: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ResultEnvelope {
    pub fn success(output: ToolOutput) -> Self {
        Self {
            content: vec![ContentBlock::Text {
                text: output.into_text(),
            }],
            is_error: None,
        }
    }

    pub fn error(err: &ToolError) -> Self {
        Self {
            content: vec![ContentBlock::Text {
                text: format!("Error: {err}"),
            }],
            is_error: Some(true),
        }
    }

    pub fn from_result(result: Result<ToolOutput, ToolError>) -> Self {
        match result {
            Ok(output) => Self::success(output),
            Err(err) => Self::error(&err),
        }
    }

    pub fn is_error(&self) -> bool {
        self.is_error == Some(true)
    }

    pub fn text(&self) -> &str {
        match self.content.first() {
            Some(ContentBlock::Text { text }) => text.as_str(),
            None => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One row of a `list_files` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }
}

/// Render a listing as pretty JSON (two-space indent), the `list_files` payload format.
pub fn render_entries(entries: &[DirEntry]) -> String {
    serde_json::to_string_pretty(entries).unwrap_or_default()
}

pub fn parse_entries(text: &str) -> serde_json::Result<Vec<DirEntry>> {
    serde_json::from_str(text)
}

/// The five file operations, implemented by every backend.
#[async_trait]
pub trait FileTools: Send + Sync {
    async fn create_file(&self, path: &str, content: &str) -> Result<ToolOutput, ToolError>;

    async fn read_file(&self, path: &str) -> Result<ToolOutput, ToolError>;

    async fn edit_file(&self, path: &str, content: &str) -> Result<ToolOutput, ToolError>;

    async fn delete_file(&self, path: &str) -> Result<ToolOutput, ToolError>;

    async fn list_files(&self, path: &str) -> Result<ToolOutput, ToolError>;

    /// Route a parsed call to its handler.
    async fn execute(&self, call: ToolCall) -> Result<ToolOutput, ToolError> {
        match call {
            ToolCall::CreateFile(req) => self.create_file(&req.path, &req.content).await,
            ToolCall::ReadFile(req) => self.read_file(&req.path).await,
            ToolCall::EditFile(req) => self.edit_file(&req.path, &req.content).await,
            ToolCall::DeleteFile(req) => self.delete_file(&req.path).await,
            ToolCall::ListFiles(req) => self.list_files(&req.path).await,
        }
    }

    /// Parse, execute and render one invocation. Failures never escape as `Err`; they become an
    /// error envelope.
    async fn call(&self, name: &str, arguments: Option<&JsonObject>) -> ResultEnvelope {
        let result = match ToolCall::parse(name, arguments) {
            Ok(call) => self.execute(call).await,
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            log::warn!("tool '{name}' failed: {err}");
        }
        ResultEnvelope::from_result(result)
    }
}

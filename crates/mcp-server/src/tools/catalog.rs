use fsmcp_protocol::{ToolDescriptor, TOOL_CATALOG};
use rmcp::model::Tool;
use std::sync::Arc;

/// The published tool list in MCP form.
pub(crate) fn mcp_tools() -> Vec<Tool> {
    TOOL_CATALOG.iter().map(mcp_tool).collect()
}

fn mcp_tool(descriptor: &ToolDescriptor) -> Tool {
    Tool::new(
        descriptor.name,
        descriptor.description,
        Arc::new(descriptor.input_schema()),
    )
}

pub(crate) fn tool_instructions() -> String {
    let mut lines = vec![
        "Filesystem tools: create, read, edit, delete and list files by path.".to_string(),
        "Paths are used as given (relative paths resolve against the server working directory)."
            .to_string(),
        String::new(),
        "Tools:".to_string(),
    ];
    for tool in TOOL_CATALOG {
        lines.push(format!("- {}: {}", tool.name, tool.description));
    }
    lines.join("\n")
}

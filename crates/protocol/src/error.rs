use std::io;
use thiserror::Error;

/// Failures a tool call can produce.
///
/// Callers only ever see the rendered text (`Error: <display>`), but the variants stay available
/// to in-process code and tests.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Operation attempted on a client that has not been connected
    #[error("Not connected to MCP server")]
    NotConnected,

    /// Target path does not exist
    #[error("File not found: {path}")]
    NotFound { path: String },

    /// Tool name is not part of the catalog
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments missing or not strings
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// Any other failure reported by the filesystem
    #[error("{op} {path}: {source}")]
    Io {
        op: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },
}

impl ToolError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn invalid_arguments(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an I/O error, promoting `ErrorKind::NotFound` to [`ToolError::NotFound`].
    pub fn from_io(op: &'static str, path: impl Into<String>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            return Self::NotFound { path };
        }
        Self::Io { op, path, source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

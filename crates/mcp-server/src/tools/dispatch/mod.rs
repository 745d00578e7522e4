//! Tool dispatch for the fsmcp filesystem server.
//!
//! Routes a tool name plus string arguments to one of the five file operations and renders
//! the outcome as a result envelope. The dispatcher holds no state besides its filesystem.

use super::fs::{FileSystem, TokioFileSystem};
use anyhow::{Context as AnyhowContext, Result};
use async_trait::async_trait;
use fsmcp_protocol::{
    render_entries, validate_catalog, FileTools, JsonObject, ResultEnvelope, ToolDescriptor,
    ToolError, ToolOutput, TOOL_CATALOG,
};
use std::path::Path;

mod service;

pub use service::FsToolService;

#[derive(Debug, Clone)]
pub struct Dispatcher<F = TokioFileSystem> {
    fs: F,
}

impl Dispatcher<TokioFileSystem> {
    pub fn new() -> Result<Self> {
        Self::with_filesystem(TokioFileSystem)
    }
}

impl<F: FileSystem> Dispatcher<F> {
    /// Build a dispatcher over `fs`, refusing to start if the published catalog and the
    /// routing table disagree.
    pub fn with_filesystem(fs: F) -> Result<Self> {
        validate_catalog(TOOL_CATALOG).context("tool catalog does not match dispatch table")?;
        Ok(Self { fs })
    }

    pub fn catalog(&self) -> &'static [ToolDescriptor] {
        TOOL_CATALOG
    }

    pub async fn dispatch(&self, name: &str, arguments: Option<&JsonObject>) -> ResultEnvelope {
        log::debug!("dispatching tool '{name}'");
        self.call(name, arguments).await
    }
}

#[async_trait]
impl<F: FileSystem> FileTools for Dispatcher<F> {
    async fn create_file(&self, path: &str, content: &str) -> Result<ToolOutput, ToolError> {
        let target = Path::new(path);
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.fs.ensure_dir(parent).await.map_err(|err| {
                ToolError::from_io("create directory", parent.to_string_lossy(), err)
            })?;
        }
        self.fs
            .write(target, content)
            .await
            .map_err(|err| ToolError::from_io("write", path, err))?;
        Ok(ToolOutput::text(format!("File created: {path}")))
    }

    async fn read_file(&self, path: &str) -> Result<ToolOutput, ToolError> {
        let content = self
            .fs
            .read_to_string(Path::new(path))
            .await
            .map_err(|err| ToolError::from_io("read", path, err))?;
        Ok(ToolOutput::text(content))
    }

    async fn edit_file(&self, path: &str, content: &str) -> Result<ToolOutput, ToolError> {
        self.fs
            .write(Path::new(path), content)
            .await
            .map_err(|err| ToolError::from_io("write", path, err))?;
        Ok(ToolOutput::text(format!("File edited: {path}")))
    }

    async fn delete_file(&self, path: &str) -> Result<ToolOutput, ToolError> {
        self.fs
            .remove_all(Path::new(path))
            .await
            .map_err(|err| ToolError::from_io("delete", path, err))?;
        Ok(ToolOutput::text(format!("File deleted: {path}")))
    }

    async fn list_files(&self, path: &str) -> Result<ToolOutput, ToolError> {
        let mut entries = self
            .fs
            .list_dir(Path::new(path))
            .await
            .map_err(|err| ToolError::from_io("list", path, err))?;
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ToolOutput::text(render_entries(&entries)))
    }
}

//! fsmcp filesystem server
//!
//! Exposes five file tools to MCP clients over stdio.
//!
//! ## Tools
//!
//! - `create_file` - Write a file, creating parent directories
//! - `read_file` - Return a file's full content
//! - `edit_file` - Overwrite a file's content
//! - `delete_file` - Remove a file or directory tree (missing paths are fine)
//! - `list_files` - List a directory's immediate children as JSON
//!
//! ## Usage
//!
//! Add to your MCP client configuration:
//! ```json
//! {
//!   "mcpServers": {
//!     "filesystem": {
//!       "command": "fsmcp-server",
//!       "args": ["--working-dir", "/path/to/project"]
//!     }
//!   }
//! }
//! ```

use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use rmcp::transport::stdio;
use rmcp::ServiceExt;

pub mod config;
pub mod tools;

pub use config::ServerConfig;
pub use tools::{Dispatcher, FileSystem, FsToolService, TokioFileSystem};

pub async fn main_entry() -> Result<()> {
    let config = ServerConfig::parse();
    config.init_logging();
    config.apply_working_dir()?;

    log::info!("Starting fsmcp filesystem server");

    let service = FsToolService::new()?;
    let server = service
        .serve(stdio())
        .await
        .context("Failed to start MCP stdio transport")?;

    // Wait for the client to hang up, or for Ctrl-C.
    tokio::select! {
        quit = server.waiting() => {
            let reason = quit.context("MCP server task failed")?;
            log::debug!("MCP session ended: {reason:?}");
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            log::info!("Received Ctrl-C, shutting down");
        }
    }

    log::info!("fsmcp filesystem server stopped");
    Ok(())
}

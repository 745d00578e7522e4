//! MCP tools for the fsmcp filesystem server.

pub(crate) mod catalog;
pub mod dispatch;
pub mod fs;

pub use dispatch::{Dispatcher, FsToolService};
pub use fs::{FileSystem, TokioFileSystem};

use async_trait::async_trait;
use fsmcp_protocol::DirEntry;
use std::io;
use std::path::Path;

/// Filesystem primitives the dispatcher is built on.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Create `path` and any missing ancestors.
    async fn ensure_dir(&self, path: &Path) -> io::Result<()>;

    /// Write `content` to `path`, truncating any existing file.
    async fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Whole file as text. Invalid UTF-8 sequences become U+FFFD instead of failing.
    async fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Remove a file or a whole directory tree. A missing path is not an error.
    async fn remove_all(&self, path: &Path) -> io::Result<()>;

    /// Immediate children of a directory, tagged file/directory.
    async fn list_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;
}

/// [`FileSystem`] over `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileSystem;

#[async_trait]
impl FileSystem for TokioFileSystem {
    async fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }

    async fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        tokio::fs::write(path, content).await
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = tokio::fs::read(path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn remove_all(&self, path: &Path) -> io::Result<()> {
        let metadata = match tokio::fs::symlink_metadata(path).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err),
        };
        let removed = if metadata.is_dir() {
            tokio::fs::remove_dir_all(path).await
        } else {
            tokio::fs::remove_file(path).await
        };
        match removed {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    async fn list_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut reader = tokio::fs::read_dir(path).await?;
        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            // file_type() does not follow symlinks
            if entry.file_type().await?.is_dir() {
                entries.push(DirEntry::directory(name));
            } else {
                entries.push(DirEntry::file(name));
            }
        }
        Ok(entries)
    }
}

use async_trait::async_trait;
use fsmcp_protocol::{render_entries, DirEntry, FileTools, ToolError, ToolOutput};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::store::MemoryStore;

const DEFAULT_CONNECT_DELAY_MS: u64 = 1_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimClientConfig {
    /// Simulated handshake latency for `connect()`
    pub connect_delay_ms: u64,
}

impl Default for SimClientConfig {
    fn default() -> Self {
        Self {
            connect_delay_ms: DEFAULT_CONNECT_DELAY_MS,
        }
    }
}

impl SimClientConfig {
    /// No handshake latency (tests, scripted demos).
    pub fn instant() -> Self {
        Self {
            connect_delay_ms: 0,
        }
    }

    pub fn connect_delay(&self) -> Duration {
        Duration::from_millis(self.connect_delay_ms)
    }
}

/// Stand-in for a remote filesystem tool server, backed by a [`MemoryStore`].
///
/// Every operation requires a prior [`connect`](Self::connect). Unlike the real dispatcher,
/// `read_file`, `edit_file` and `delete_file` report missing paths, and `list_files` never
/// reports directories.
#[derive(Debug)]
pub struct SimulatedClient {
    store: MemoryStore,
    config: SimClientConfig,
    connected: AtomicBool,
}

impl SimulatedClient {
    pub fn new(store: MemoryStore) -> Self {
        Self::with_config(store, SimClientConfig::default())
    }

    pub fn with_config(store: MemoryStore, config: SimClientConfig) -> Self {
        Self {
            store,
            config,
            connected: AtomicBool::new(false),
        }
    }

    pub async fn connect(&self) -> Result<(), ToolError> {
        let delay = self.config.connect_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.connected.store(true, Ordering::SeqCst);
        log::info!("Connected to MCP server (simulated)");
        Ok(())
    }

    /// Drops the connection flag only; stored files are kept.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        log::debug!("Disconnected from MCP server (simulated)");
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Create every `(path, content)` pair in order, stopping at the first failure.
    pub async fn upload<I, P, C>(&self, files: I) -> Result<usize, ToolError>
    where
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<str>,
        C: AsRef<str>,
    {
        let mut written = 0usize;
        for (path, content) in files {
            self.create_file(path.as_ref(), content.as_ref()).await?;
            written += 1;
        }
        log::debug!("uploaded {written} files");
        Ok(written)
    }

    fn ensure_connected(&self) -> Result<(), ToolError> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(ToolError::NotConnected)
        }
    }
}

/// Keys of `paths` that sit directly under `base`.
///
/// A trailing `/` on `base` is ignored, except that a base made only of slashes means the
/// absolute root and matches keys starting with `/`.
fn direct_children(paths: &[String], base: &str) -> Vec<DirEntry> {
    let trimmed = base.trim_end_matches('/');
    let prefix = if trimmed.is_empty() && !base.is_empty() {
        "/".to_string()
    } else if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    };

    paths
        .iter()
        .filter_map(|path| path.strip_prefix(prefix.as_str()))
        .filter(|name| !name.is_empty() && !name.contains('/'))
        .map(DirEntry::file)
        .collect()
}

#[async_trait]
impl FileTools for SimulatedClient {
    async fn create_file(&self, path: &str, content: &str) -> Result<ToolOutput, ToolError> {
        self.ensure_connected()?;
        self.store.insert(path, content);
        Ok(ToolOutput::text(format!("File created: {path}")))
    }

    async fn read_file(&self, path: &str) -> Result<ToolOutput, ToolError> {
        self.ensure_connected()?;
        self.store
            .get(path)
            .map(ToolOutput::text)
            .ok_or_else(|| ToolError::not_found(path))
    }

    async fn edit_file(&self, path: &str, content: &str) -> Result<ToolOutput, ToolError> {
        self.ensure_connected()?;
        if !self.store.replace(path, content) {
            return Err(ToolError::not_found(path));
        }
        Ok(ToolOutput::text(format!("File edited: {path}")))
    }

    async fn delete_file(&self, path: &str) -> Result<ToolOutput, ToolError> {
        self.ensure_connected()?;
        if self.store.remove(path).is_none() {
            return Err(ToolError::not_found(path));
        }
        Ok(ToolOutput::text(format!("File deleted: {path}")))
    }

    async fn list_files(&self, path: &str) -> Result<ToolOutput, ToolError> {
        self.ensure_connected()?;
        let entries = direct_children(&self.store.paths(), path);
        Ok(ToolOutput::text(render_entries(&entries)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsmcp_protocol::parse_entries;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    async fn connected_client() -> SimulatedClient {
        let client = SimulatedClient::with_config(MemoryStore::new(), SimClientConfig::instant());
        client.connect().await.unwrap();
        client
    }

    #[tokio::test]
    async fn create_read_edit_delete_cycle() {
        let client = connected_client().await;

        let created = client.create_file("proj/a.txt", "one").await.unwrap();
        assert_eq!(created.as_str(), "File created: proj/a.txt");
        assert_eq!(client.read_file("proj/a.txt").await.unwrap().as_str(), "one");

        let edited = client.edit_file("proj/a.txt", "two").await.unwrap();
        assert_eq!(edited.as_str(), "File edited: proj/a.txt");
        assert_eq!(client.read_file("proj/a.txt").await.unwrap().as_str(), "two");

        let deleted = client.delete_file("proj/a.txt").await.unwrap();
        assert_eq!(deleted.as_str(), "File deleted: proj/a.txt");
        let err = client.read_file("proj/a.txt").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn create_overwrites_existing_entry() {
        let client = connected_client().await;
        client.create_file("a.txt", "first").await.unwrap();
        client.create_file("a.txt", "second").await.unwrap();
        assert_eq!(client.read_file("a.txt").await.unwrap().as_str(), "second");
        assert_eq!(client.store().len(), 1);
    }

    #[tokio::test]
    async fn missing_paths_are_not_found() {
        let client = connected_client().await;
        for err in [
            client.read_file("ghost.txt").await.unwrap_err(),
            client.edit_file("ghost.txt", "x").await.unwrap_err(),
            client.delete_file("ghost.txt").await.unwrap_err(),
        ] {
            assert!(matches!(err, ToolError::NotFound { ref path } if path == "ghost.txt"));
            assert_eq!(err.to_string(), "File not found: ghost.txt");
        }
        // edit must not create the entry
        assert!(!client.store().contains("ghost.txt"));
    }

    #[tokio::test]
    async fn operations_require_connection() {
        let client = SimulatedClient::with_config(MemoryStore::new(), SimClientConfig::instant());
        assert!(!client.is_connected());

        let results = [
            client.create_file("a", "b").await,
            client.read_file("a").await,
            client.edit_file("a", "b").await,
            client.delete_file("a").await,
            client.list_files("a").await,
        ];
        for result in results {
            let err = result.unwrap_err();
            assert!(matches!(err, ToolError::NotConnected));
            assert!(err.to_string().contains("Not connected"));
        }

        let envelope = client.call("read_file", json!({ "path": "a" }).as_object()).await;
        assert!(envelope.is_error());
        assert!(envelope.text().contains("Not connected"), "{}", envelope.text());
        assert!(client.store().is_empty());
    }

    #[tokio::test]
    async fn disconnect_keeps_stored_files() {
        let client = connected_client().await;
        client.create_file("keep.txt", "data").await.unwrap();
        client.disconnect();
        assert!(matches!(
            client.read_file("keep.txt").await,
            Err(ToolError::NotConnected)
        ));

        client.connect().await.unwrap();
        assert_eq!(client.read_file("keep.txt").await.unwrap().as_str(), "data");
    }

    #[tokio::test]
    async fn list_reports_only_direct_file_children() {
        let client = connected_client().await;
        client.create_file("dir/a", "1").await.unwrap();
        client.create_file("dir/b", "2").await.unwrap();
        client.create_file("dir/sub/c", "3").await.unwrap();
        client.create_file("dirty/x", "4").await.unwrap();
        client.create_file("top.txt", "5").await.unwrap();

        let listing = client.list_files("dir").await.unwrap();
        assert_eq!(
            parse_entries(listing.as_str()).unwrap(),
            vec![DirEntry::file("a"), DirEntry::file("b")]
        );

        let trailing = client.list_files("dir/").await.unwrap();
        assert_eq!(trailing, listing);

        let root = client.list_files("").await.unwrap();
        assert_eq!(
            parse_entries(root.as_str()).unwrap(),
            vec![DirEntry::file("top.txt")]
        );

        let empty = client.list_files("nowhere").await.unwrap();
        assert_eq!(empty.as_str(), "[]");
    }

    #[tokio::test]
    async fn slash_base_lists_absolute_keys_only() {
        let client = connected_client().await;
        client.create_file("top.txt", "1").await.unwrap();
        client.create_file("/abs.txt", "2").await.unwrap();
        client.create_file("/etc/hosts", "3").await.unwrap();

        let listing = client.list_files("/").await.unwrap();
        assert_eq!(
            parse_entries(listing.as_str()).unwrap(),
            vec![DirEntry::file("abs.txt")]
        );

        let etc = client.list_files("/etc").await.unwrap();
        assert_eq!(
            parse_entries(etc.as_str()).unwrap(),
            vec![DirEntry::file("hosts")]
        );
    }

    #[tokio::test]
    async fn clients_with_separate_stores_are_isolated() {
        let shared = MemoryStore::new();
        let first = SimulatedClient::with_config(shared.clone(), SimClientConfig::instant());
        let second = SimulatedClient::with_config(shared, SimClientConfig::instant());
        let isolated = connected_client().await;
        first.connect().await.unwrap();
        second.connect().await.unwrap();

        first.create_file("shared.txt", "hello").await.unwrap();
        assert_eq!(second.read_file("shared.txt").await.unwrap().as_str(), "hello");
        assert!(isolated.read_file("shared.txt").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn upload_writes_every_file_in_order() {
        let client = connected_client().await;
        let written = client
            .upload([("site/index.html", "<h1>hi</h1>"), ("site/app.js", "run()")])
            .await
            .unwrap();
        assert_eq!(written, 2);
        assert_eq!(client.store().paths(), vec!["site/index.html", "site/app.js"]);

        client.disconnect();
        let err = client.upload([("site/late.css", "")]).await.unwrap_err();
        assert!(matches!(err, ToolError::NotConnected));
    }

    #[tokio::test(start_paused = true)]
    async fn connect_waits_for_configured_delay() {
        let client = SimulatedClient::new(MemoryStore::new());
        let started = tokio::time::Instant::now();
        client.connect().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(DEFAULT_CONNECT_DELAY_MS));
        assert!(client.is_connected());
    }

    #[test]
    fn config_defaults_when_fields_are_omitted() {
        let config: SimClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.connect_delay(), Duration::from_secs(1));
        let config: SimClientConfig = serde_json::from_str(r#"{"connect_delay_ms": 5}"#).unwrap();
        assert_eq!(config.connect_delay(), Duration::from_millis(5));
    }

    fn run<T>(fut: impl std::future::Future<Output = T>) -> T {
        tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .expect("runtime")
            .block_on(fut)
    }

    const KEY: &str = "[a-z0-9_.]{1,8}(/[a-z0-9_.]{1,8}){0,3}";

    proptest! {
        #[test]
        fn proptest_create_read_edit_round_trip(
            path in KEY,
            first in any::<String>(),
            second in any::<String>(),
        ) {
            let (read_first, read_second) = run(async {
                let client = connected_client().await;
                client.create_file(&path, &first).await.unwrap();
                let read_first = client.read_file(&path).await.unwrap().into_text();
                client.edit_file(&path, &second).await.unwrap();
                let read_second = client.read_file(&path).await.unwrap().into_text();
                (read_first, read_second)
            });
            prop_assert_eq!(read_first, first);
            prop_assert_eq!(read_second, second);
        }

        #[test]
        fn proptest_delete_makes_reads_fail(path in KEY, content in any::<String>()) {
            let (err, remaining) = run(async {
                let client = connected_client().await;
                client.create_file(&path, &content).await.unwrap();
                client.delete_file(&path).await.unwrap();
                (client.read_file(&path).await.unwrap_err(), client.store().len())
            });
            prop_assert!(err.is_not_found());
            prop_assert_eq!(remaining, 0);
        }

        #[test]
        fn proptest_created_key_is_listed_under_its_parent(path in KEY) {
            let (parent, leaf) = match path.rsplit_once('/') {
                Some((parent, leaf)) => (parent.to_string(), leaf.to_string()),
                None => (String::new(), path.clone()),
            };
            let entries = run(async {
                let client = connected_client().await;
                client.create_file(&path, "x").await.unwrap();
                let listing = client.list_files(&parent).await.unwrap();
                parse_entries(listing.as_str()).unwrap()
            });
            prop_assert_eq!(entries, vec![DirEntry::file(leaf)]);
        }
    }
}

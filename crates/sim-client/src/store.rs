use indexmap::IndexMap;
use std::sync::{Arc, PoisonError, RwLock};

/// In-memory `path -> content` map backing a simulated client.
///
/// Cloning is cheap and yields a handle to the same storage. Keys keep their first-insertion
/// order; overwriting a key does not move it.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: Arc<RwLock<IndexMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files<I, K, V>(files: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let files = files
            .into_iter()
            .map(|(path, content)| (path.into(), content.into()))
            .collect();
        Self {
            files: Arc::new(RwLock::new(files)),
        }
    }

    /// Returns `true` when an existing entry was overwritten.
    pub fn insert(&self, path: impl Into<String>, content: impl Into<String>) -> bool {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), content.into())
            .is_some()
    }

    pub fn get(&self, path: &str) -> Option<String> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }

    /// Replace the content of an existing entry; returns `false` if `path` is absent.
    pub fn replace(&self, path: &str, content: impl Into<String>) -> bool {
        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);
        match files.get_mut(path) {
            Some(slot) => {
                *slot = content.into();
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, path: &str) -> Option<String> {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .shift_remove(path)
    }

    /// Snapshot of all keys in insertion order.
    pub fn paths(&self) -> Vec<String> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.files.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

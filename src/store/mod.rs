//! Whole-file JSON documents on disk.
//!
//! Every logical collection lives in one JSON file. Reads never fail: a
//! missing, empty or unparsable file yields the caller's fallback. Writes go
//! through a temporary sibling file and a rename, and read-modify-write
//! cycles are serialized per document so two requests in this process cannot
//! lose each other's updates.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex as AsyncMutex;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io { path: path.to_path_buf(), source }
    }
}

#[derive(Clone, Debug)]
pub struct JsonStore {
    root: PathBuf,
    locks: Arc<Mutex<HashMap<PathBuf, Arc<AsyncMutex<()>>>>>,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a document path relative to the data directory.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Read a document, falling back to `fallback` when it is absent, empty
    /// or corrupt. Failures other than "not found" are logged.
    pub async fn read<T: DeserializeOwned>(&self, path: &Path, fallback: T) -> T {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return fallback,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to read JSON document, using fallback");
                return fallback;
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return fallback;
        }

        match serde_json::from_slice(&bytes) {
            Ok(document) => document,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "corrupt JSON document, using fallback");
                fallback
            }
        }
    }

    /// Replace a document on disk.
    pub async fn write<T: Serialize + Sync>(&self, path: &Path, document: &T) -> Result<(), StoreError> {
        let lock = self.lock_for(path);
        let _guard = lock.lock().await;
        write_document(path, document).await
    }

    /// Read-modify-write a document while holding its writer lock.
    ///
    /// Nothing is written when `mutate` returns an error.
    pub async fn update<T, R, E, F>(&self, path: &Path, fallback: T, mutate: F) -> Result<R, E>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        R: Send,
        E: From<StoreError>,
        F: FnOnce(&mut T) -> Result<R, E> + Send,
    {
        let lock = self.lock_for(path);
        let _guard = lock.lock().await;

        let mut document = self.read(path, fallback).await;
        let result = mutate(&mut document)?;
        write_document(path, &document).await?;
        Ok(result)
    }

    /// Remove a directory tree under the data root. Missing directories are fine.
    pub async fn remove_dir(&self, relative: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = self.path(relative);
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    fn lock_for(&self, path: &Path) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(path.to_path_buf()).or_default().clone()
    }
}

async fn write_document<T: Serialize + Sync>(path: &Path, document: &T) -> Result<(), StoreError> {
    let mut bytes = serde_json::to_vec_pretty(document).map_err(|source| StoreError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    bytes.push(b'\n');

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::io(parent, e))?;
    }

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &bytes).await.map_err(|e| StoreError::io(&tmp, e))?;
    tokio::fs::rename(&tmp, path).await.map_err(|e| StoreError::io(path, e))?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote JSON document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn missing_file_yields_fallback() {
        let (_dir, store) = store();
        let doc: Vec<String> = store.read(&store.path("nope.json"), vec!["x".into()]).await;
        assert_eq!(doc, vec!["x".to_string()]);
    }

    #[tokio::test]
    async fn corrupt_and_empty_files_yield_fallback() {
        let (_dir, store) = store();
        let corrupt = store.path("corrupt.json");
        let empty = store.path("empty.json");
        std::fs::write(&corrupt, b"{ not json").unwrap();
        std::fs::write(&empty, b"  \n").unwrap();

        let a: Vec<Value> = store.read(&corrupt, Vec::new()).await;
        let b: Vec<Value> = store.read(&empty, Vec::new()).await;
        assert!(a.is_empty());
        assert!(b.is_empty());
    }

    #[tokio::test]
    async fn write_creates_parents_and_round_trips() {
        let (_dir, store) = store();
        let path = store.path("tenants/a/list.json");
        store.write(&path, &json!([{"id": 1}])).await.unwrap();

        let doc: Value = store.read(&path, Value::Null).await;
        assert_eq!(doc, json!([{"id": 1}]));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn failed_mutation_writes_nothing() {
        let (_dir, store) = store();
        let path = store.path("list.json");
        store.write(&path, &vec![1, 2]).await.unwrap();

        let result: Result<(), StoreError> = store
            .update(&path, Vec::<i32>::new(), |doc| {
                doc.push(3);
                Err(StoreError::io(Path::new("x"), std::io::Error::new(ErrorKind::Other, "stop")))
            })
            .await;
        assert!(result.is_err());

        let doc: Vec<i32> = store.read(&path, Vec::new()).await;
        assert_eq!(doc, vec![1, 2]);
    }

    #[tokio::test]
    async fn concurrent_updates_are_not_lost() {
        let (_dir, store) = store();
        let path = store.path("counter.json");

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            let path = path.clone();
            handles.push(tokio::spawn(async move {
                store
                    .update(&path, Vec::<i32>::new(), |doc| {
                        doc.push(i);
                        Ok::<_, StoreError>(())
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let doc: Vec<i32> = store.read(&path, Vec::new()).await;
        assert_eq!(doc.len(), 20);
    }

    #[tokio::test]
    async fn remove_dir_tolerates_missing() {
        let (_dir, store) = store();
        store.remove_dir("tenants/ghost").await.unwrap();

        let path = store.path("tenants/real/a.json");
        store.write(&path, &json!({})).await.unwrap();
        store.remove_dir("tenants/real").await.unwrap();
        assert!(!path.exists());
    }
}

//! Durable single-document store.
//!
//! The registry persists the whole ticket collection as one serialized
//! document under a well-known key. Reads return the full document or
//! "absent"; writes replace it whole, so a partial failure can never leave a
//! half-written collection. The store offers no isolation across concurrent
//! callers - the registry serializes its own read-modify-write cycles on top.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Well-known key holding the serialized ticket collection.
pub const TICKETS_KEY: &str = "nft_tickets";

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failure modes of the durable store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem-level failure.
    #[error("storage i/o: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure.
    #[error("storage backend: {0}")]
    Backend(String),
}

/// Process-local key/value persistence surface.
///
/// One serialized document per key. `write` replaces the document atomically
/// from the caller's perspective (single-writer, synchronous).
pub trait DurableStore: Send + Sync {
    /// Read the full document under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replace the document under `key` with `document`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be written.
    fn write(&self, key: &str, document: &str) -> StoreResult<()>;
}

/// Filesystem-backed store: one JSON document per key under a root directory.
///
/// The localStorage analog for native processes. A missing file reads as
/// absent; writes go through a temp file plus rename so readers never observe
/// a torn document.
#[derive(Clone, Debug)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn document_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl DurableStore for FsStore {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.document_path(key)) {
            Ok(document) => Ok(Some(document)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, document: &str) -> StoreResult<()> {
        fs::create_dir_all(&self.root)?;
        let path = self.document_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, document)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("fs-store-{tag}-{nanos}"))
    }

    #[test]
    fn absent_key_reads_as_none() {
        let store = FsStore::new(scratch_dir("absent"));
        assert!(store.read(TICKETS_KEY).unwrap().is_none());
    }

    #[test]
    fn write_then_read_round_trips() {
        let root = scratch_dir("roundtrip");
        let store = FsStore::new(&root);
        store.write(TICKETS_KEY, "[]").unwrap();
        assert_eq!(store.read(TICKETS_KEY).unwrap().as_deref(), Some("[]"));
        fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn write_replaces_whole_document() {
        let root = scratch_dir("replace");
        let store = FsStore::new(&root);
        store.write(TICKETS_KEY, "[1]").unwrap();
        store.write(TICKETS_KEY, "[1,2]").unwrap();
        assert_eq!(store.read(TICKETS_KEY).unwrap().as_deref(), Some("[1,2]"));
        fs::remove_dir_all(root).unwrap();
    }
}

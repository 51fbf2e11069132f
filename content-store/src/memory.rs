use crate::{ContentStore, StoreError, StoredContent, VersionToken};
use async_trait::async_trait;
use http::StatusCode;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Content store held in process memory.
///
/// Versions are the SHA-256 of the file text, and a write with a stale
/// version is rejected with `409 Conflict`, matching the remote store.
#[derive(Default)]
pub struct MemoryContentStore {
    files: Mutex<HashMap<String, String>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

fn version_of(text: &str) -> VersionToken {
    VersionToken::new(format!("{:x}", Sha256::digest(text.as_bytes())))
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file<P: Into<String>, T: Into<String>>(self, path: P, text: T) -> Self {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.into(), text.into());
        self
    }

    /// Current text of `path`, bypassing the read counter.
    pub fn text(&self, path: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(path)
            .cloned()
    }

    /// Number of reads served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of accepted writes so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn read(&self, path: &str) -> Result<StoredContent, StoreError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        let files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        let text = files.get(path).ok_or(StoreError::Read(StatusCode::NOT_FOUND))?;

        Ok(StoredContent {
            text: text.clone(),
            version: version_of(text),
        })
    }

    async fn write(
        &self,
        path: &str,
        text: &str,
        version: &VersionToken,
        message: &str,
    ) -> Result<(), StoreError> {
        let mut files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        let current = files
            .get_mut(path)
            .ok_or(StoreError::Write(StatusCode::NOT_FOUND))?;

        if version_of(current) != *version {
            return Err(StoreError::Write(StatusCode::CONFLICT));
        }

        *current = text.to_string();
        self.writes.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(path, message, "Committed to memory store");
        Ok(())
    }
}

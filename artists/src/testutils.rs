use async_trait::async_trait;
use content_store::memory::MemoryContentStore;
use content_store::{ContentStore, StoreError, StoredContent, VersionToken};
use std::sync::{Arc, Mutex};

pub fn memory_store(artists: &[&str]) -> Arc<MemoryContentStore> {
    let text = serde_json::to_string_pretty(artists).unwrap();
    Arc::new(MemoryContentStore::new().with_file("artists.json", text))
}

/// Store wrapper where another writer commits just before each of our
/// writes, for as long as it has names left to add.
pub struct RacingStore {
    inner: Arc<MemoryContentStore>,
    competing: Mutex<Vec<String>>,
}

impl RacingStore {
    pub fn new(inner: Arc<MemoryContentStore>, competing: &[&str]) -> Self {
        RacingStore {
            inner,
            competing: Mutex::new(competing.iter().rev().map(|n| n.to_string()).collect()),
        }
    }
}

#[async_trait]
impl ContentStore for RacingStore {
    async fn read(&self, path: &str) -> Result<StoredContent, StoreError> {
        self.inner.read(path).await
    }

    async fn write(
        &self,
        path: &str,
        text: &str,
        version: &VersionToken,
        message: &str,
    ) -> Result<(), StoreError> {
        let competing = self.competing.lock().unwrap().pop();
        if let Some(name) = competing {
            let current = self.inner.read(path).await?;
            let mut artists: Vec<String> = serde_json::from_str(&current.text).unwrap();
            artists.push(name.clone());
            artists.sort_by_cached_key(|a| a.to_lowercase());
            let updated = serde_json::to_string_pretty(&artists).unwrap();
            self.inner
                .write(path, &updated, &current.version, &format!("Add {name}"))
                .await?;
        }

        self.inner.write(path, text, version, message).await
    }
}

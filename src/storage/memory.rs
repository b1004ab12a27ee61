//! In-memory key-value store for tests and ephemeral hosts.

use crate::error::AppError;
use crate::storage::KeyValueStore;
use async_trait::async_trait;
use dashmap::DashMap;

/// Key-value store backed by a process-local map. Contents do not survive
/// a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.items.get(key).map(|v| v.clone()))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

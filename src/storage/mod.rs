//! On-device key-value storage abstraction.
//!
//! The cache layer only ever needs the AsyncStorage shape: read a string
//! by key, write a string by key. Failures map to `AppError::Storage` and
//! are treated as non-fatal by the services that mirror into the cache.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::AppError;
use async_trait::async_trait;

/// Minimal persistent key-value interface.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the string stored under `key`, or `None` if absent.
    async fn get_item(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Write `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), AppError>;
}

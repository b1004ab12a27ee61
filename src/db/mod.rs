//! Remote document store abstraction.
//!
//! The store is schemaless: documents are field maps in named collections,
//! queryable by field equality. Timestamps are assigned at this boundary
//! (`add`/`set` stamp `created_at`, `update` stamps `updated_at`), so
//! callers never supply their own.

pub mod firestore;

pub use firestore::FirestoreStore;

use crate::error::AppError;
use async_trait::async_trait;
use serde::Serialize;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const TASKS: &str = "tasks";
}

/// Document field names the crate reads or writes by name.
pub mod doc_fields {
    pub const OWNER_ID: &str = "owner_id";
    pub const CREATED_AT: &str = "created_at";
    pub const UPDATED_AT: &str = "updated_at";
}

/// Schemaless document field map.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// A stored document: store-assigned ID plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

/// Collection-scoped operations against the remote document store.
///
/// Every operation either resolves or fails with `AppError::Remote`; there
/// are no automatic retries and no owned timeouts.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by ID, or `None` if absent.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError>;

    /// All documents where `field` equals `value`, in creation order.
    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, AppError>;

    /// Create a document with a store-assigned ID and `created_at` stamp.
    async fn add(&self, collection: &str, fields: Fields) -> Result<Document, AppError>;

    /// Create or replace the document at `id`, stamping `created_at`.
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), AppError>;

    /// Merge `fields` into the existing document at `id`, stamping
    /// `updated_at`. Fails when the document does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), AppError>;

    /// Delete the document at `id`. Deleting an absent document is not an
    /// error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), AppError>;
}

/// Convert a serializable model into a document field map.
pub fn to_fields<T: Serialize>(value: &T) -> Result<Fields, AppError> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(AppError::Internal(anyhow::anyhow!(
            "model serialized to {} instead of an object",
            other
        ))),
        Err(e) => Err(AppError::Internal(e.into())),
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore-backed document store.
//!
//! Wraps the Firestore client with the schemaless, collection-scoped
//! operations the rest of the crate consumes. Supports the local emulator
//! (via FIRESTORE_EMULATOR_HOST) and an offline mock mode for tests.

use crate::db::{doc_fields, Document, DocumentStore, Fields};
use crate::error::AppError;
use crate::time_utils::now_rfc3339;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reserved field the Firestore crate uses to surface document IDs.
const FIRESTORE_ID_FIELD: &str = "_firestore_id";

/// Wire shape for fluent select/insert calls; `_firestore_id` captures the
/// server-assigned document ID on reads and is never written.
#[derive(Debug, Serialize, Deserialize)]
struct StoredDoc {
    #[serde(rename = "_firestore_id", skip_serializing, default)]
    id: Option<String>,
    #[serde(flatten)]
    fields: Fields,
}

impl StoredDoc {
    fn into_document(mut self, fallback_id: Option<&str>) -> Result<Document, AppError> {
        // The flatten map may have captured the reserved field too.
        self.fields.remove(FIRESTORE_ID_FIELD);
        let id = self
            .id
            .or_else(|| fallback_id.map(str::to_string))
            .ok_or_else(|| AppError::Remote("store returned a document without an id".to_string()))?;
        Ok(Document {
            id,
            fields: self.fields,
        })
    }
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreStore {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreStore {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated
        // connection to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Remote(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Remote(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All operations return a Remote error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Remote("Database not connected (offline mode)".to_string()))
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError> {
        let doc: Option<StoredDoc> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Remote(e.to_string()))?;

        doc.map(|d| d.into_document(Some(id))).transpose()
    }

    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, AppError> {
        let field = field.to_string();
        let value = value.to_string();

        let docs: Vec<StoredDoc> = self
            .get_client()?
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| q.field(field.clone()).eq(value.clone()))
            .order_by([(
                doc_fields::CREATED_AT,
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Remote(e.to_string()))?;

        docs.into_iter()
            .map(|d| d.into_document(None))
            .collect()
    }

    async fn add(&self, collection: &str, mut fields: Fields) -> Result<Document, AppError> {
        fields.insert(
            doc_fields::CREATED_AT.to_string(),
            serde_json::Value::String(now_rfc3339()),
        );

        let created: StoredDoc = self
            .get_client()?
            .fluent()
            .insert()
            .into(collection)
            .generate_document_id()
            .object(&StoredDoc { id: None, fields })
            .execute()
            .await
            .map_err(|e| AppError::Remote(e.to_string()))?;

        let document = created.into_document(None)?;
        tracing::debug!(collection, id = %document.id, "Document created");
        Ok(document)
    }

    async fn set(&self, collection: &str, id: &str, mut fields: Fields) -> Result<(), AppError> {
        fields.insert(
            doc_fields::CREATED_AT.to_string(),
            serde_json::Value::String(now_rfc3339()),
        );

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(&StoredDoc { id: None, fields })
            .execute()
            .await
            .map_err(|e| AppError::Remote(e.to_string()))?;
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, mut fields: Fields) -> Result<(), AppError> {
        // Fluent update replaces the document, so merge with the current
        // fields first to keep unlisted ones (owner, creation stamp).
        let existing = self
            .get(collection, id)
            .await?
            .ok_or_else(|| AppError::Remote(format!("document {}/{} not found", collection, id)))?;

        let mut merged = existing.fields;
        merged.append(&mut fields);
        merged.insert(
            doc_fields::UPDATED_AT.to_string(),
            serde_json::Value::String(now_rfc3339()),
        );

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(&StoredDoc {
                id: None,
                fields: merged,
            })
            .execute()
            .await
            .map_err(|e| AppError::Remote(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collection)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Remote(e.to_string()))?;
        Ok(())
    }
}

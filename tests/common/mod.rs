// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared in-memory fakes for integration tests.
//!
//! `MemoryDocumentStore` mirrors the Firestore-backed store's contract
//! (store-assigned ids, `created_at` on add/set, `updated_at` on update)
//! and supports failure injection so tests can exercise the degraded
//! paths without a live backend.

// Each test binary uses its own subset of these helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use taskbook::db::{doc_fields, Document, DocumentStore, Fields};
use taskbook::error::AppError;
use taskbook::models::AuthIdentity;
use taskbook::provider::{AuthProvider, SessionChange};
use taskbook::storage::KeyValueStore;
use taskbook::time_utils::now_rfc3339;
use tokio::sync::mpsc;

/// In-memory document store with switchable failure injection.
#[derive(Default)]
pub struct MemoryDocumentStore {
    // Vec keeps insertion order so queries return documents in creation
    // order, like the real store ordered by created_at.
    collections: Mutex<HashMap<String, Vec<(String, Fields)>>>,
    next_id: AtomicU64,
    fail_remote: AtomicBool,
    calls: AtomicUsize,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with a Remote error.
    pub fn set_fail_remote(&self, fail: bool) {
        self.fail_remote.store(fail, Ordering::SeqCst);
    }

    /// Number of store operations attempted (including failed ones).
    pub fn remote_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Seed a document directly, bypassing the trait surface.
    pub fn insert_raw(&self, collection: &str, id: &str, fields: Fields) {
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .push((id.to_string(), fields));
    }

    fn check(&self) -> Result<(), AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_remote.load(Ordering::SeqCst) {
            return Err(AppError::Remote("injected store failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, AppError> {
        self.check()?;
        let collections = self.collections.lock().unwrap();
        Ok(collections.get(collection).and_then(|docs| {
            docs.iter()
                .find(|(doc_id, _)| doc_id == id)
                .map(|(doc_id, fields)| Document {
                    id: doc_id.clone(),
                    fields: fields.clone(),
                })
        }))
    }

    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, AppError> {
        self.check()?;
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, fields)| {
                        fields.get(field).and_then(|v| v.as_str()) == Some(value)
                    })
                    .map(|(doc_id, fields)| Document {
                        id: doc_id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn add(&self, collection: &str, mut fields: Fields) -> Result<Document, AppError> {
        self.check()?;
        let id = format!("doc-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        fields.insert(
            doc_fields::CREATED_AT.to_string(),
            serde_json::Value::String(now_rfc3339()),
        );
        self.insert_raw(collection, &id, fields.clone());
        Ok(Document { id, fields })
    }

    async fn set(&self, collection: &str, id: &str, mut fields: Fields) -> Result<(), AppError> {
        self.check()?;
        fields.insert(
            doc_fields::CREATED_AT.to_string(),
            serde_json::Value::String(now_rfc3339()),
        );
        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(collection.to_string()).or_default();
        if let Some(entry) = docs.iter_mut().find(|(doc_id, _)| doc_id == id) {
            entry.1 = fields;
        } else {
            docs.push((id.to_string(), fields));
        }
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, mut fields: Fields) -> Result<(), AppError> {
        self.check()?;
        fields.insert(
            doc_fields::UPDATED_AT.to_string(),
            serde_json::Value::String(now_rfc3339()),
        );
        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|(doc_id, _)| doc_id == id) {
            Some(entry) => {
                entry.1.append(&mut fields);
                Ok(())
            }
            None => Err(AppError::Remote(format!(
                "document {}/{} not found",
                collection, id
            ))),
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), AppError> {
        self.check()?;
        let mut collections = self.collections.lock().unwrap();
        if let Some(docs) = collections.get_mut(collection) {
            docs.retain(|(doc_id, _)| doc_id != id);
        }
        Ok(())
    }
}

/// Key-value store with switchable read/write failures.
#[derive(Default)]
pub struct FlakyKvStore {
    items: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw stored value, bypassing the trait surface.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.lock().unwrap().get(key).cloned()
    }

    /// Seed a raw value.
    pub fn seed(&self, key: &str, value: &str) {
        self.items
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl KeyValueStore for FlakyKvStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Storage("injected read failure".to_string()));
        }
        Ok(self.items.lock().unwrap().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Storage("injected write failure".to_string()));
        }
        self.items
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Auth provider fake: no network, identities derived from the email.
pub struct FakeAuthProvider {
    changes_tx: mpsc::UnboundedSender<SessionChange>,
    changes_rx: Mutex<Option<mpsc::UnboundedReceiver<SessionChange>>>,
    fail_sign_up: AtomicBool,
    provider_calls: AtomicUsize,
}

impl FakeAuthProvider {
    pub fn new() -> Self {
        let (changes_tx, changes_rx) = mpsc::unbounded_channel();
        Self {
            changes_tx,
            changes_rx: Mutex::new(Some(changes_rx)),
            fail_sign_up: AtomicBool::new(false),
            provider_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_fail_sign_up(&self, fail: bool) {
        self.fail_sign_up.store(fail, Ordering::SeqCst);
    }

    pub fn provider_calls(&self) -> usize {
        self.provider_calls.load(Ordering::SeqCst)
    }

    /// Drive the session stream directly, like a provider callback would.
    pub fn emit(&self, change: SessionChange) {
        let _ = self.changes_tx.send(change);
    }

    fn identity_for(email: &str) -> AuthIdentity {
        let local = email.split('@').next().unwrap_or("user");
        AuthIdentity {
            uid: format!("uid-{}", local),
            email: Some(email.to_string()),
        }
    }
}

#[async_trait]
impl AuthProvider for FakeAuthProvider {
    async fn sign_up(&self, email: &str, _password: &str) -> Result<AuthIdentity, AppError> {
        self.provider_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign_up.load(Ordering::SeqCst) {
            return Err(AppError::Provider("EMAIL_EXISTS".to_string()));
        }
        let identity = Self::identity_for(email);
        self.emit(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<AuthIdentity, AppError> {
        self.provider_calls.fetch_add(1, Ordering::SeqCst);
        let identity = Self::identity_for(email);
        self.emit(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AppError> {
        self.provider_calls.fetch_add(1, Ordering::SeqCst);
        self.emit(None);
        Ok(())
    }

    async fn send_password_reset(&self, _email: &str) -> Result<(), AppError> {
        self.provider_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn session_changes(&self) -> Option<mpsc::UnboundedReceiver<SessionChange>> {
        self.changes_rx.lock().unwrap().take()
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local snapshot cache for task lists.
//!
//! The cache holds a JSON array of task snapshots under a single key in
//! the key-value store. It is never authoritative: the remote store wins
//! on every successful fetch, and the cache only mirrors confirmed
//! writes.
//!
//! The storage layer has no compare-and-swap, so every read-modify-write
//! runs under a per-key lock. Two mutations for the same key never
//! interleave; without this, concurrent appends lose entries.

use crate::error::AppError;
use crate::models::{Task, TaskInput};
use crate::storage::KeyValueStore;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Storage key holding the serialized task list.
pub const TASKS_CACHE_KEY: &str = "tasks";

/// Per-key write locks, shared across clones of the cache.
type KeyLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

/// Snapshot cache over a key-value store.
#[derive(Clone)]
pub struct TaskCache {
    storage: Arc<dyn KeyValueStore>,
    locks: KeyLocks,
}

impl TaskCache {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            locks: Arc::new(DashMap::new()),
        }
    }

    /// Acquire the write lock for a cache key. Other mutations for the
    /// same key wait here until the current one completes.
    async fn lock_key(&self, key: &str) -> tokio::sync::OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        lock.lock_owned().await
    }

    /// Read the cached snapshot list.
    ///
    /// `None` when the key is absent or the payload does not parse; a
    /// corrupt cache is treated as no cache and rewritten on the next
    /// successful load.
    pub async fn read(&self) -> Result<Option<Vec<Task>>, AppError> {
        let Some(raw) = self.storage.get_item(TASKS_CACHE_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => Ok(Some(tasks)),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unparseable task cache");
                Ok(None)
            }
        }
    }

    async fn write(&self, tasks: &[Task]) -> Result<(), AppError> {
        let payload =
            serde_json::to_string(tasks).map_err(|e| AppError::Storage(e.to_string()))?;
        self.storage.set_item(TASKS_CACHE_KEY, &payload).await
    }

    /// Replace the cached entries for `owner_id` with `tasks`, preserving
    /// entries cached for other owners.
    pub async fn replace_owner(&self, owner_id: &str, tasks: &[Task]) -> Result<(), AppError> {
        let _guard = self.lock_key(TASKS_CACHE_KEY).await;

        let mut merged: Vec<Task> = self
            .read()
            .await?
            .unwrap_or_default()
            .into_iter()
            .filter(|t| t.owner_id != owner_id)
            .collect();
        merged.extend_from_slice(tasks);

        self.write(&merged).await
    }

    /// Append one task to whatever is currently cached.
    pub async fn append(&self, task: &Task) -> Result<(), AppError> {
        let _guard = self.lock_key(TASKS_CACHE_KEY).await;

        let mut tasks = self.read().await?.unwrap_or_default();
        tasks.push(task.clone());

        self.write(&tasks).await
    }

    /// Replace the entry whose id matches, leaving all others in place.
    /// An id with no cached entry is a no-op on the list.
    pub async fn apply_update(&self, task_id: &str, input: &TaskInput) -> Result<(), AppError> {
        let _guard = self.lock_key(TASKS_CACHE_KEY).await;

        let mut tasks = self.read().await?.unwrap_or_default();
        for task in tasks.iter_mut() {
            if task.id == task_id {
                *task = input.apply_to(task);
            }
        }

        self.write(&tasks).await
    }

    /// Remove the entry with the given id.
    pub async fn remove(&self, task_id: &str) -> Result<(), AppError> {
        let _guard = self.lock_key(TASKS_CACHE_KEY).await;

        let mut tasks = self.read().await?.unwrap_or_default();
        tasks.retain(|t| t.id != task_id);

        self.write(&tasks).await
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Task CRUD with a remote-first commit and a local snapshot mirror.
//!
//! Every mutation writes to the document store first; the cache is only
//! touched after the remote write is confirmed, so the cache never
//! reflects a write the store rejected. Storage failures while mirroring
//! are logged and swallowed; the store stays authoritative and the
//! confirmed result is always returned.

use crate::db::{collections, doc_fields, to_fields, Document, DocumentStore};
use crate::error::AppError;
use crate::models::{Task, TaskInput};
use crate::services::cache::TaskCache;
use crate::storage::KeyValueStore;
use std::sync::Arc;
use validator::Validate;

/// Task synchronizer over the remote store and the local cache.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn DocumentStore>,
    cache: TaskCache,
}

impl TaskService {
    pub fn new(store: Arc<dyn DocumentStore>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            cache: TaskCache::new(storage),
        }
    }

    /// Load all tasks owned by `owner_id`.
    ///
    /// Serves the remote result when the fetch succeeds (refreshing the
    /// cache for this owner); falls back to the cached snapshot when it
    /// fails. Only when neither is available does the load fail.
    pub async fn load_tasks(&self, owner_id: &str) -> Result<Vec<Task>, AppError> {
        let provisional = match self.cache.read().await {
            Ok(cached) => cached.map(|tasks| {
                tasks
                    .into_iter()
                    .filter(|t| t.owner_id == owner_id)
                    .collect::<Vec<_>>()
            }),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read task cache");
                None
            }
        };

        match self.fetch_remote(owner_id).await {
            Ok(tasks) => {
                if let Err(e) = self.cache.replace_owner(owner_id, &tasks).await {
                    tracing::warn!(owner_id, error = %e, "Failed to refresh task cache");
                }
                Ok(tasks)
            }
            Err(e) => match provisional {
                Some(tasks) => {
                    tracing::warn!(
                        owner_id,
                        error = %e,
                        count = tasks.len(),
                        "Remote fetch failed, serving cached snapshot"
                    );
                    Ok(tasks)
                }
                None => Err(e),
            },
        }
    }

    async fn fetch_remote(&self, owner_id: &str) -> Result<Vec<Task>, AppError> {
        let docs = self
            .store
            .query(collections::TASKS, doc_fields::OWNER_ID, owner_id)
            .await?;

        docs.iter().map(Task::from_document).collect()
    }

    /// Create a task owned by `owner_id` and return the stored snapshot.
    pub async fn create_task(&self, owner_id: &str, input: &TaskInput) -> Result<Task, AppError> {
        let input = input.sanitized();
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let mut fields = to_fields(&input)?;
        fields.insert(
            doc_fields::OWNER_ID.to_string(),
            serde_json::Value::String(owner_id.to_string()),
        );

        let doc: Document = self.store.add(collections::TASKS, fields).await?;

        let task = Task {
            id: doc.id,
            owner_id: owner_id.to_string(),
            title: input.title,
            description: input.description,
            start_date: input.start_date,
            end_date: input.end_date,
        };

        if let Err(e) = self.cache.append(&task).await {
            tracing::warn!(task_id = %task.id, error = %e, "Task created but cache append failed");
        }

        tracing::debug!(task_id = %task.id, owner_id, "Task created");
        Ok(task)
    }

    /// Replace all mutable fields of the task with `task_id`.
    pub async fn update_task(&self, task_id: &str, input: &TaskInput) -> Result<(), AppError> {
        let input = input.sanitized();
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let fields = to_fields(&input)?;
        self.store
            .update(collections::TASKS, task_id, fields)
            .await?;

        if let Err(e) = self.cache.apply_update(task_id, &input).await {
            tracing::warn!(task_id, error = %e, "Task updated but cache refresh failed");
        }

        tracing::debug!(task_id, "Task updated");
        Ok(())
    }

    /// Delete the task with `task_id`.
    pub async fn delete_task(&self, task_id: &str) -> Result<(), AppError> {
        self.store.delete(collections::TASKS, task_id).await?;

        if let Err(e) = self.cache.remove(task_id).await {
            tracing::warn!(task_id, error = %e, "Task deleted but cache removal failed");
        }

        tracing::debug!(task_id, "Task deleted");
        Ok(())
    }
}

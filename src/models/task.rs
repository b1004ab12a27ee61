// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Task model for storage and the local snapshot cache.

use crate::db::Document;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A task snapshot as cached locally and returned to the host.
///
/// Timestamps live only on the stored document; the snapshot carries the
/// fields the host renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned document ID (immutable)
    pub id: String,
    /// Owning user's uid (immutable)
    pub owner_id: String,
    pub title: String,
    pub description: String,
    /// Free-form date strings; no ordering is enforced between them
    pub start_date: String,
    pub end_date: String,
}

impl Task {
    /// Build a snapshot from a stored document.
    ///
    /// Missing fields default to empty strings, matching what the store
    /// returns for documents written by older clients.
    pub fn from_document(doc: &Document) -> Result<Self, AppError> {
        #[derive(Deserialize)]
        struct Stored {
            #[serde(default)]
            owner_id: String,
            #[serde(default)]
            title: String,
            #[serde(default)]
            description: String,
            #[serde(default)]
            start_date: String,
            #[serde(default)]
            end_date: String,
        }

        let stored: Stored =
            serde_json::from_value(serde_json::Value::Object(doc.fields.clone()))
                .map_err(|e| AppError::Remote(format!("malformed task document {}: {}", doc.id, e)))?;

        Ok(Self {
            id: doc.id.clone(),
            owner_id: stored.owner_id,
            title: stored.title,
            description: stored.description,
            start_date: stored.start_date,
            end_date: stored.end_date,
        })
    }
}

/// Input fields for creating or updating a task.
///
/// All four fields must be non-empty after trimming.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "start date is required"))]
    pub start_date: String,
    #[validate(length(min = 1, message = "end date is required"))]
    pub end_date: String,
}

impl TaskInput {
    /// Trim all fields, mirroring form sanitization before submit.
    pub fn sanitized(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            start_date: self.start_date.trim().to_string(),
            end_date: self.end_date.trim().to_string(),
        }
    }

    /// Apply these fields to an existing snapshot, preserving id and
    /// owner.
    pub fn apply_to(&self, task: &Task) -> Task {
        Task {
            id: task.id.clone(),
            owner_id: task.owner_id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        }
    }
}

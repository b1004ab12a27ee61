// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Taskbook: the engine of a task-tracking client.
//!
//! This crate provides session management against an authentication
//! provider and snapshot-cached task CRUD against a remote document
//! store, for a host application (mobile shell, CLI) to drive. The host
//! owns presentation; this crate owns the data flow.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod provider;
pub mod services;
pub mod storage;
pub mod time_utils;

use config::Config;
use db::DocumentStore;
use provider::AuthProvider;
use services::{SessionManager, TaskService};
use std::sync::Arc;
use storage::KeyValueStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub provider: Arc<dyn AuthProvider>,
    pub session: SessionManager,
    pub tasks: TaskService,
}

impl AppState {
    /// Wire the services over the given collaborators.
    pub fn new(
        config: Config,
        provider: Arc<dyn AuthProvider>,
        store: Arc<dyn DocumentStore>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        let session = SessionManager::new(provider.clone(), store.clone());
        let tasks = TaskService::new(store, storage);
        Self {
            config,
            provider,
            session,
            tasks,
        }
    }
}

/// Initialize structured JSON logging.
///
/// The host calls this once at startup; calling it twice panics.
pub fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("taskbook=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}

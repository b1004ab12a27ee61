// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod cache;
pub mod session;
pub mod tasks;

pub use cache::{TaskCache, TASKS_CACHE_KEY};
pub use session::{SessionManager, SessionState};
pub use tasks::TaskService;

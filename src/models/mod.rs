// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod task;
pub mod user;

pub use task::{Task, TaskInput};
pub use user::{AuthIdentity, ProfileUpdate, SignUpInput, User, UserProfile};

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types shared across the crate.

/// Application error taxonomy.
///
/// Every fallible operation resolves into one of these buckets so the host
/// can decide what to show the user: bad input, a provider rejection, a
/// remote store failure, or a local storage failure.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Auth provider error: {0}")]
    Provider(String),

    #[error("Remote store error: {0}")]
    Remote(String),

    #[error("Local storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Canonical marker the Identity Toolkit API returns for a rejected
    /// email/password combination.
    pub const PROVIDER_BAD_CREDENTIALS: &'static str = "INVALID_LOGIN_CREDENTIALS";

    /// Whether this is a credential rejection from the auth provider, as
    /// opposed to a transport or quota failure.
    ///
    /// Matches the current marker plus the older split messages that
    /// pre-email-enumeration-protection projects still return.
    pub fn is_invalid_credentials(&self) -> bool {
        match self {
            AppError::Provider(msg) => {
                msg.contains(Self::PROVIDER_BAD_CREDENTIALS)
                    || msg.contains("EMAIL_NOT_FOUND")
                    || msg.contains("INVALID_PASSWORD")
            }
            _ => false,
        }
    }

    /// Whether the error came from the remote document store.
    pub fn is_remote(&self) -> bool {
        matches!(self, AppError::Remote(_))
    }

    /// Whether the error came from local key-value storage.
    ///
    /// Storage failures during cache mirroring are logged and swallowed by
    /// the services; this predicate is for callers that handle them
    /// directly.
    pub fn is_storage(&self) -> bool {
        matches!(self, AppError::Storage(_))
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;

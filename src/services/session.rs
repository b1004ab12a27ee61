// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session state machine over the auth provider's change stream.
//!
//! Consumers never see raw provider callbacks: the manager drives a
//! single task off the change stream and publishes
//! {Loading, Anonymous, Authenticated} transitions through a watch
//! channel. Changes are handled serially in arrival order: the profile
//! fetch for one notification completes before the next is processed.

use crate::db::{collections, to_fields, DocumentStore};
use crate::error::AppError;
use crate::models::{AuthIdentity, ProfileUpdate, SignUpInput, User, UserProfile};
use crate::provider::AuthProvider;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use validator::Validate;

/// Published session state.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Between subscription and the first provider notification.
    Loading,
    /// No identity present.
    Anonymous,
    /// Logged in, with the merged identity + profile.
    Authenticated(User),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    /// The current user, if authenticated.
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Maintains the current user across provider notifications.
pub struct SessionManager {
    provider: Arc<dyn AuthProvider>,
    store: Arc<dyn DocumentStore>,
    state_tx: watch::Sender<SessionState>,
    state_rx: watch::Receiver<SessionState>,
    subscribed: AtomicBool,
}

impl SessionManager {
    pub fn new(provider: Arc<dyn AuthProvider>, store: Arc<dyn DocumentStore>) -> Self {
        let (state_tx, state_rx) = watch::channel(SessionState::Loading);
        Self {
            provider,
            store,
            state_tx,
            state_rx,
            subscribed: AtomicBool::new(false),
        }
    }

    /// Start consuming the provider's session-change stream.
    ///
    /// Callable once per manager: the stream is single-consumer and the
    /// subscription lives for the rest of the process. Returns a receiver
    /// for state transitions.
    pub fn subscribe(&self) -> Result<watch::Receiver<SessionState>, AppError> {
        if self.subscribed.swap(true, Ordering::SeqCst) {
            return Err(AppError::Provider(
                "session change stream already subscribed".to_string(),
            ));
        }

        let mut changes = self.provider.session_changes().ok_or_else(|| {
            AppError::Provider("session change stream already consumed".to_string())
        })?;

        let store = self.store.clone();
        let state_tx = self.state_tx.clone();

        tokio::spawn(async move {
            while let Some(change) = changes.recv().await {
                let next = match change {
                    Some(identity) => {
                        let user = resolve_user(store.as_ref(), &identity).await;
                        tracing::debug!(uid = %user.uid, "Session authenticated");
                        SessionState::Authenticated(user)
                    }
                    None => {
                        tracing::debug!("Session anonymous");
                        SessionState::Anonymous
                    }
                };
                state_tx.send_replace(next);
            }
            tracing::debug!("Session change stream closed");
        });

        Ok(self.state_rx.clone())
    }

    /// Snapshot of the published state.
    pub fn current(&self) -> SessionState {
        self.state_rx.borrow().clone()
    }

    /// Watch for state transitions.
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }

    /// Create an account: provider identity first, then the profile
    /// document, then an explicit sign-out so the user logs in fresh.
    pub async fn register(&self, input: &SignUpInput) -> Result<(), AppError> {
        let input = input.sanitized();
        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let identity = self
            .provider
            .sign_up(&input.email, &input.password)
            .await?;

        let fields = to_fields(&input.profile)?;
        self.store
            .set(collections::USERS, &identity.uid, fields)
            .await?;

        self.provider.sign_out().await?;

        tracing::info!(uid = %identity.uid, "Account registered");
        Ok(())
    }

    /// Write profile fields for `uid` and publish the updated user.
    ///
    /// The published state is only touched after the remote write
    /// succeeds; a rejected write leaves it exactly as it was.
    pub async fn update_profile(&self, uid: &str, update: &ProfileUpdate) -> Result<(), AppError> {
        let update = update.sanitized();
        update
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let fields = to_fields(&update)?;
        self.store.update(collections::USERS, uid, fields).await?;

        self.state_tx.send_if_modified(|state| {
            if let SessionState::Authenticated(user) = state {
                if user.uid == uid {
                    user.name = Some(update.name.clone());
                    user.age = Some(update.age);
                    user.gender = Some(update.gender.clone());
                    return true;
                }
            }
            false
        });

        tracing::debug!(uid, "Profile updated");
        Ok(())
    }
}

/// Fetch and merge the profile document for a fresh identity.
///
/// A fetch failure never blocks the transition: the identity-only user is
/// published and the failure logged.
async fn resolve_user(store: &dyn DocumentStore, identity: &AuthIdentity) -> User {
    match store.get(collections::USERS, &identity.uid).await {
        Ok(doc) => {
            let profile = doc.and_then(|d| match UserProfile::from_fields(&d.fields) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    tracing::warn!(uid = %identity.uid, error = %e, "Malformed profile document");
                    None
                }
            });
            User::merge(identity, profile)
        }
        Err(e) => {
            tracing::warn!(
                uid = %identity.uid,
                error = %e,
                "Profile fetch failed, publishing identity only"
            );
            User::merge(identity, None)
        }
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase Auth REST client.
//!
//! Talks to the Identity Toolkit endpoints the mobile SDKs use:
//! - accounts:signUp
//! - accounts:signInWithPassword
//! - accounts:sendOobCode (password reset)
//!
//! Sign-out is a local operation: the REST API has no server session to
//! revoke, so the client drops its identity and emits a logout change.

use crate::config::Config;
use crate::error::AppError;
use crate::models::AuthIdentity;
use crate::provider::{AuthProvider, SessionChange};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc;

/// Credentials payload for signUp and signInWithPassword.
#[derive(Debug, Serialize)]
struct PasswordCredentials<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(rename = "returnSecureToken")]
    return_secure_token: bool,
}

/// Password-reset request for sendOobCode.
#[derive(Debug, Serialize)]
struct PasswordResetRequest<'a> {
    #[serde(rename = "requestType")]
    request_type: &'static str,
    email: &'a str,
}

/// Successful account response (signUp / signInWithPassword).
#[derive(Debug, Deserialize)]
struct AccountResponse {
    #[serde(rename = "localId")]
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Identity Toolkit error envelope: {"error": {"message": "..."}}.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Firebase Auth API client.
pub struct FirebaseAuthClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    current: Mutex<Option<AuthIdentity>>,
    changes_tx: mpsc::UnboundedSender<SessionChange>,
    changes_rx: Mutex<Option<mpsc::UnboundedReceiver<SessionChange>>>,
}

impl FirebaseAuthClient {
    /// Create a new client against the given Identity Toolkit base URL.
    pub fn new(api_key: String, base_url: String) -> Self {
        let (changes_tx, changes_rx) = mpsc::unbounded_channel();
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
            current: Mutex::new(None),
            changes_tx,
            changes_rx: Mutex::new(Some(changes_rx)),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.firebase_api_key.clone(),
            config.firebase_auth_url.clone(),
        )
    }

    /// The identity the client currently holds, if signed in.
    pub fn current_identity(&self) -> Option<AuthIdentity> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Record the identity and notify the session stream.
    fn publish(&self, identity: Option<AuthIdentity>) {
        *self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = identity.clone();
        // Send only fails when the receiver is gone; nothing left to notify.
        let _ = self.changes_tx.send(identity);
    }

    /// Generic POST with JSON request and response.
    async fn post_json<B: Serialize, T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let url = format!("{}/{}?key={}", self.base_url, endpoint, self.api_key);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Provider(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            // Surface the API's message (EMAIL_EXISTS, INVALID_LOGIN_CREDENTIALS, ...)
            // so callers can classify the rejection.
            if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(&body) {
                return Err(AppError::Provider(parsed.error.message));
            }

            return Err(AppError::Provider(format!("HTTP {}: {}", status, body)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Provider(e.to_string()))
    }
}

#[async_trait]
impl AuthProvider for FirebaseAuthClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthIdentity, AppError> {
        let account: AccountResponse = self
            .post_json(
                "accounts:signUp",
                &PasswordCredentials {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;

        let identity = AuthIdentity {
            uid: account.local_id,
            email: account.email.or_else(|| Some(email.to_string())),
        };

        tracing::info!(uid = %identity.uid, "Account created");

        // Like the SDK, a successful sign-up leaves the client signed in.
        self.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthIdentity, AppError> {
        let account: AccountResponse = self
            .post_json(
                "accounts:signInWithPassword",
                &PasswordCredentials {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;

        let identity = AuthIdentity {
            uid: account.local_id,
            email: account.email.or_else(|| Some(email.to_string())),
        };

        tracing::debug!(uid = %identity.uid, "Signed in");

        self.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AppError> {
        tracing::debug!("Signed out");
        self.publish(None);
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AppError> {
        let _: serde_json::Value = self
            .post_json(
                "accounts:sendOobCode",
                &PasswordResetRequest {
                    request_type: "PASSWORD_RESET",
                    email,
                },
            )
            .await?;
        Ok(())
    }

    fn session_changes(&self) -> Option<mpsc::UnboundedReceiver<SessionChange>> {
        self.changes_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

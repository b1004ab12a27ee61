//! Authentication provider abstraction.

pub mod firebase;

pub use firebase::FirebaseAuthClient;

use crate::error::AppError;
use crate::models::AuthIdentity;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// One session-change notification: `Some` on login, `None` on logout.
pub type SessionChange = Option<AuthIdentity>;

/// Authentication operations plus the session-change stream.
///
/// The stream is single-consumer: `session_changes` hands out the
/// receiver at most once, and the session manager owns it for the process
/// lifetime.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Create an account. On success the provider is signed in as the new
    /// identity and a change is emitted.
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthIdentity, AppError>;

    /// Sign in with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthIdentity, AppError>;

    /// Drop the current identity and emit a logout change.
    async fn sign_out(&self) -> Result<(), AppError>;

    /// Send a password-reset email.
    async fn send_password_reset(&self, email: &str) -> Result<(), AppError>;

    /// Take the session-change stream. Returns `None` once taken.
    fn session_changes(&self) -> Option<mpsc::UnboundedReceiver<SessionChange>>;
}

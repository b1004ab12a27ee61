//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup; the host passes the resulting
//! `Config` into `AppState::new`.

use std::env;

/// Default production endpoint for the Firebase Auth REST API.
pub const DEFAULT_AUTH_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Firebase web API key (sent as a query parameter to Auth endpoints)
    pub firebase_api_key: String,
    /// Base URL of the Auth REST API (overridable for the Auth emulator)
    pub firebase_auth_url: String,
    /// GCP project ID for Firestore
    pub gcp_project_id: String,
    /// Directory holding the on-device key-value cache
    pub cache_dir: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// For local development, set FIRESTORE_EMULATOR_HOST and point
    /// FIREBASE_AUTH_URL at the Auth emulator.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            firebase_api_key: env::var("FIREBASE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FIREBASE_API_KEY"))?,
            firebase_auth_url: env::var("FIREBASE_AUTH_URL")
                .unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            cache_dir: env::var("CACHE_DIR").unwrap_or_else(|_| ".cache".to_string()),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            firebase_api_key: "test_api_key".to_string(),
            firebase_auth_url: DEFAULT_AUTH_URL.to_string(),
            gcp_project_id: "test-project".to_string(),
            cache_dir: ".cache-test".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

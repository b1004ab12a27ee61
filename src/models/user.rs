//! User model and profile input validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Identity issued by the auth provider on sign-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthIdentity {
    /// Provider-issued user ID (immutable)
    pub uid: String,
    /// Email address as known to the provider
    pub email: Option<String>,
}

/// The current user: provider identity merged with the profile document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    /// When the profile document was created (RFC3339)
    pub created_at: Option<String>,
}

impl User {
    /// Merge a provider identity with the stored profile document.
    ///
    /// Profile fields take precedence when present; the identity only
    /// fills what the document does not carry.
    pub fn merge(identity: &AuthIdentity, profile: Option<UserProfile>) -> Self {
        let profile = profile.unwrap_or_default();
        Self {
            uid: identity.uid.clone(),
            email: profile.email.or_else(|| identity.email.clone()),
            name: profile.name,
            age: profile.age,
            gender: profile.gender,
            created_at: profile.created_at,
        }
    }
}

/// Profile fields as stored in the `users` collection document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl UserProfile {
    /// Deserialize a profile from raw document fields.
    pub fn from_fields(
        fields: &crate::db::Fields,
    ) -> Result<Self, crate::error::AppError> {
        serde_json::from_value(serde_json::Value::Object(fields.clone()))
            .map_err(|e| crate::error::AppError::Remote(format!("malformed profile document: {}", e)))
    }
}

/// Profile update input: all fields required, age a positive integer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "age must be a positive integer"))]
    pub age: u32,
    #[validate(length(min = 1, message = "gender is required"))]
    pub gender: String,
}

impl ProfileUpdate {
    /// Trim text fields before validation, mirroring form sanitization.
    pub fn sanitized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            age: self.age,
            gender: self.gender.trim().to_string(),
        }
    }
}

/// Sign-up form input.
#[derive(Debug, Clone, Validate)]
pub struct SignUpInput {
    #[validate(email(message = "invalid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "password too short"))]
    pub password: String,
    #[validate(nested)]
    pub profile: ProfileUpdate,
}

impl SignUpInput {
    /// Trim the email and profile text fields. The password is taken
    /// verbatim.
    pub fn sanitized(&self) -> Self {
        Self {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            profile: self.profile.sanitized(),
        }
    }
}

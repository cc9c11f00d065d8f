use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Flat user row as delivered by a storage client.
///
/// Every column is optional so the mapper can tell "absent" apart from
/// "present but wrong"; see [`crate::mapper::record_to_domain`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
    /// ISO-8601 timestamp string.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl UserRecord {
    /// Parse a single JSON object into a record.
    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        serde_json::from_str(raw).map_err(|e| ModelError::Malformed(e.to_string()))
    }
}

/// Canonical in-process user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// `"Name <email>"`
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// Creation date in long form, e.g. `March 5, 2024`.
    pub fn member_since(&self) -> String {
        self.created_at.format("%B %-d, %Y").to_string()
    }

    /// Returns a new value with the patch applied; `id` and `created_at` are kept.
    pub fn merged(&self, patch: &UserPatch) -> User {
        User {
            id: self.id.clone(),
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            email: patch.email.clone().unwrap_or_else(|| self.email.clone()),
            created_at: self.created_at,
        }
    }
}

/// Input for creating a user; id and timestamp are assigned by the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self { name: name.into(), email: email.into() }
    }
}

/// Partial update. `None` leaves the field untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), email: None }
    }

    pub fn email(email: impl Into<String>) -> Self {
        Self { name: None, email: Some(email.into()) }
    }

    pub fn is_empty(&self) -> bool { self.name.is_none() && self.email.is_none() }
}

/// API-facing projection of a [`User`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub member_since: String,
}

/// Minimal claim set for credentials: identifier and email only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub email: String,
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    Ok(())
}

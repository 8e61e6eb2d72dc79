//! User account types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gift_grove_core::{Email, StoredCredential, UserId};

/// A storefront user account.
///
/// The credential is deliberately skipped by serde: the persisted user file
/// never contains passwords, so rehydrated accounts carry no credential and
/// cannot log in until a password is set again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name, unique across all users.
    pub username: String,
    /// Login credential; `None` for accounts rehydrated from disk.
    #[serde(skip)]
    pub credential: Option<StoredCredential>,
    /// Contact email, if the user provided one.
    pub email: Option<Email>,
    /// Whether this account may use admin operations.
    pub is_admin: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub credential: StoredCredential,
    pub email: Option<Email>,
    pub is_admin: bool,
}

/// Partial update applied to an existing user.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<Email>,
    pub credential: Option<StoredCredential>,
    pub is_admin: Option<bool>,
}

/// Public view of a user, safe to return from the API.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: Option<Email>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

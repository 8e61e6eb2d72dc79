//! Authentication error types.

use thiserror::Error;

use gift_grove_core::EmailError;

use crate::store::StoreError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username/password combination is wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The referenced user does not exist.
    #[error("user not found")]
    UserNotFound,

    /// Registration attempted with a taken username.
    #[error("username already exists")]
    UsernameTaken,

    /// The username does not meet requirements.
    #[error("invalid username: {0}")]
    InvalidUsername(String),

    /// The password does not meet requirements.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// The email address is malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password hashing failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// The account has no stored credential (rehydrated from disk, where
    /// credentials are stripped) and cannot authenticate until a password
    /// is set again.
    #[error("no stored credential for this account")]
    CredentialUnavailable,

    /// Underlying store operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

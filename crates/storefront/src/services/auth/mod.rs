//! Authentication service.
//!
//! Registration, login, password changes, and the admin seed account.
//!
//! Verification is dual-path over the stored credential variant: `Hashed`
//! verifies through argon2, `LegacyPlaintext` compares directly. The legacy
//! path exists so the pre-migration admin seed keeps working; every write
//! made by this service uses the hashed path unless hashing itself fails.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use gift_grove_core::{Email, StoredCredential, UserId};

use crate::models::{NewUser, User, UserUpdate};
use crate::store::{Store, StoreError};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum username length.
const MAX_USERNAME_LENGTH: usize = 32;

/// Reserved username for the seeded administrator account.
pub const ADMIN_USERNAME: &str = "admin";

/// Authentication service.
///
/// Borrows the store; handlers construct one per request.
pub struct AuthService<'a> {
    store: &'a Store,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Register a new user with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` or `AuthError::WeakPassword` if
    /// the inputs don't meet requirements, `AuthError::InvalidEmail` for a
    /// malformed email, and `AuthError::UsernameTaken` if the name exists.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<User, AuthError> {
        validate_username(username)?;
        validate_password(password)?;

        let email = email.map(Email::parse).transpose()?;
        let credential = StoredCredential::Hashed(hash_password(password)?);

        let user = self
            .store
            .create_user(NewUser {
                username: username.to_owned(),
                credential,
                email,
                is_admin: false,
            })
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::UsernameTaken,
                other => AuthError::Store(other),
            })?;

        Ok(user)
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the pair is wrong, and
    /// `AuthError::CredentialUnavailable` for accounts whose credential was
    /// stripped on persistence.
    pub fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .store
            .user_by_username(username)
            .ok_or(AuthError::InvalidCredentials)?;

        let credential = user
            .credential
            .as_ref()
            .ok_or(AuthError::CredentialUnavailable)?;

        verify_credential(credential, password)?;
        Ok(user)
    }

    /// Change a user's password, verifying the current one first.
    ///
    /// The new credential always uses the hashed path, upgrading legacy
    /// plaintext records as a side effect.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` for an unknown ID,
    /// `AuthError::InvalidCredentials` if the current password is wrong,
    /// and `AuthError::WeakPassword` if the new one doesn't qualify.
    pub fn change_password(
        &self,
        user_id: UserId,
        current: &str,
        new: &str,
    ) -> Result<User, AuthError> {
        let user = self.store.user(user_id).ok_or(AuthError::UserNotFound)?;
        let credential = user
            .credential
            .as_ref()
            .ok_or(AuthError::CredentialUnavailable)?;

        verify_credential(credential, current)?;
        validate_password(new)?;

        let updated = self.store.update_user(
            user_id,
            UserUpdate {
                credential: Some(StoredCredential::Hashed(hash_password(new)?)),
                ..UserUpdate::default()
            },
        )?;

        Ok(updated)
    }

    /// Make sure the reserved admin account exists and can log in.
    ///
    /// Synthesizes the account with the configured default password when it
    /// is missing, and restores a credential when the account was
    /// rehydrated from disk without one. If hashing fails the password is
    /// stored as plaintext - an explicit degraded mode, logged loudly
    /// rather than masked.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the underlying write fails.
    pub fn ensure_admin(&self, default_password: &str) -> Result<User, AuthError> {
        match self.store.user_by_username(ADMIN_USERNAME) {
            Some(user) if user.credential.is_some() => Ok(user),
            Some(user) => {
                tracing::warn!(
                    username = ADMIN_USERNAME,
                    "admin account has no stored credential; resetting to configured default"
                );
                let updated = self.store.update_user(
                    user.id,
                    UserUpdate {
                        credential: Some(hash_or_plaintext(default_password)),
                        ..UserUpdate::default()
                    },
                )?;
                Ok(updated)
            }
            None => {
                tracing::info!(username = ADMIN_USERNAME, "seeding admin account");
                let user = self.store.create_user(NewUser {
                    username: ADMIN_USERNAME.to_owned(),
                    credential: hash_or_plaintext(default_password),
                    email: None,
                    is_admin: true,
                })?;
                Ok(user)
            }
        }
    }
}

/// Validate username meets requirements.
fn validate_username(username: &str) -> Result<(), AuthError> {
    if username.is_empty() {
        return Err(AuthError::InvalidUsername(
            "username cannot be empty".to_owned(),
        ));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(AuthError::InvalidUsername(format!(
            "username must be at most {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(AuthError::InvalidUsername(
            "username may only contain letters, digits, '-', '_' and '.'".to_owned(),
        ));
    }
    Ok(())
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Verify a password against either credential variant.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch.
pub fn verify_credential(credential: &StoredCredential, password: &str) -> Result<(), AuthError> {
    match credential {
        StoredCredential::Hashed(hash) => verify_password(password, hash),
        StoredCredential::LegacyPlaintext(stored) => {
            if stored == password {
                Ok(())
            } else {
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}

/// Hash a password, falling back to plaintext storage when hashing fails.
fn hash_or_plaintext(password: &str) -> StoredCredential {
    hash_password(password).map_or_else(
        |_| {
            tracing::warn!("password hashing unavailable; storing admin password as plaintext");
            StoredCredential::LegacyPlaintext(password.to_owned())
        },
        StoredCredential::Hashed,
    )
}

//! User operations.

use chrono::Utc;

use gift_grove_core::UserId;

use crate::models::{NewUser, User, UserUpdate};

use super::{Store, StoreError};

impl Store {
    /// Create a new user with an empty wishlist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the username is already taken.
    pub fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut guard = self.write();
        let inner = &mut *guard;

        if inner.users.values().any(|u| u.username == new.username) {
            return Err(StoreError::Conflict(format!(
                "username {} already exists",
                new.username
            )));
        }

        let user = inner
            .users
            .insert_with(|id| User {
                id,
                username: new.username,
                credential: Some(new.credential),
                email: new.email,
                is_admin: new.is_admin,
                created_at: Utc::now(),
            })
            .clone();

        inner.wishlists.entry(user.id).or_default();

        self.persist_users(inner);
        self.persist_wishlists(inner);
        Ok(user)
    }

    /// Get a user by ID.
    #[must_use]
    pub fn user(&self, id: UserId) -> Option<User> {
        self.read().users.get(id).cloned()
    }

    /// Get a user by username.
    #[must_use]
    pub fn user_by_username(&self, username: &str) -> Option<User> {
        self.read()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    /// All users in ID order.
    #[must_use]
    pub fn users(&self) -> Vec<User> {
        self.read().users.values().cloned().collect()
    }

    /// Merge a partial update into an existing user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user does not exist.
    pub fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User, StoreError> {
        let mut guard = self.write();
        let inner = &mut *guard;

        let user = inner.users.get_mut(id).ok_or(StoreError::NotFound)?;

        if let Some(email) = update.email {
            user.email = Some(email);
        }
        if let Some(credential) = update.credential {
            user.credential = Some(credential);
        }
        if let Some(is_admin) = update.is_admin {
            user.is_admin = is_admin;
        }

        let updated = user.clone();
        self.persist_users(inner);
        Ok(updated)
    }
}

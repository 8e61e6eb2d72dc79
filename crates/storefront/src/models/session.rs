//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use gift_grove_core::UserId;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user. The
/// admin flag is a snapshot taken at login; demoting an admin takes effect
/// on their next login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's store ID.
    pub id: UserId,
    /// User's login name.
    pub username: String,
    /// Whether the user may use admin operations.
    pub is_admin: bool,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}

//! Admin account management.

use std::path::Path;

use gift_grove_core::UserId;
use gift_grove_storefront::models::UserUpdate;
use gift_grove_storefront::services::AuthService;
use gift_grove_storefront::store::Store;

/// Create a new user and grant the admin flag.
///
/// # Errors
///
/// Returns an error if the store cannot be opened, the inputs fail
/// validation, or the username is taken.
pub fn create_admin(
    data_dir: &Path,
    username: &str,
    password: &str,
    email: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open(data_dir)?;

    let user = AuthService::new(&store).register(username, password, email)?;
    promote_user(&store, user.id)?;

    tracing::info!(username = %username, id = %user.id, "admin user created");
    Ok(())
}

/// Promote an existing user to admin.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the user is unknown.
pub fn promote(data_dir: &Path, username: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open(data_dir)?;

    let user = store
        .user_by_username(username)
        .ok_or_else(|| format!("no user named {username}"))?;

    if user.is_admin {
        tracing::info!(username = %username, "user is already an admin");
        return Ok(());
    }

    promote_user(&store, user.id)?;
    tracing::info!(username = %username, id = %user.id, "user promoted to admin");
    Ok(())
}

fn promote_user(store: &Store, id: UserId) -> Result<(), Box<dyn std::error::Error>> {
    store.update_user(
        id,
        UserUpdate {
            is_admin: Some(true),
            ..UserUpdate::default()
        },
    )?;
    Ok(())
}

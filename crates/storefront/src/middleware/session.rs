//! Session middleware configuration.
//!
//! Sets up tower-sessions over the JSON-file-backed store.

use secrecy::ExposeSecret;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};

use crate::config::StorefrontConfig;
use crate::store::JsonSessionStore;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "gg_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with the JSON-file store.
///
/// Cookies are signed with a key derived from the configured session
/// secret.
///
/// # Panics
///
/// Panics if the session secret is shorter than 32 bytes; configuration
/// loading enforces the minimum before this is reached.
#[must_use]
pub fn create_session_layer(
    store: JsonSessionStore,
    config: &StorefrontConfig,
) -> SessionManagerLayer<JsonSessionStore, SignedCookie> {
    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    let key = Key::derive_from(config.session_secret.expose_secret().as_bytes());

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key)
}

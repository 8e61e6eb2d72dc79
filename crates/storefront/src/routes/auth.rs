//! Authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, UserProfile};
use crate::services::AuthService;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Registration body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
}

/// Login body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Password change body.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new account and log it in.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>)> {
    let user = AuthService::new(state.store()).register(
        &body.username,
        &body.password,
        body.email.as_deref(),
    )?;

    set_current_user(
        &session,
        &CurrentUser {
            id: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(UserProfile::from(&user))))
}

/// Log in with username and password.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<UserProfile>> {
    let user = AuthService::new(state.store()).login(&body.username, &body.password)?;

    // Rotate the session id on privilege change
    session.cycle_id().await?;
    set_current_user(
        &session,
        &CurrentUser {
            id: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin,
        },
    )
    .await?;

    Ok(Json(UserProfile::from(&user)))
}

/// Log out and destroy the session.
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    session.flush().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Current user's profile.
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<UserProfile>> {
    let user = state
        .store()
        .user(current.id)
        .ok_or_else(|| AppError::NotFound(format!("user {}", current.id)))?;

    Ok(Json(UserProfile::from(&user)))
}

/// Change the current user's password.
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<StatusCode> {
    AuthService::new(state.store()).change_password(
        current.id,
        &body.current_password,
        &body.new_password,
    )?;

    Ok(StatusCode::NO_CONTENT)
}

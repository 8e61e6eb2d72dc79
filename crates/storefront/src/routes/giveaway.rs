//! Giveaway funnel route handlers.
//!
//! Entry creation enforces the domain rate limit (5 entries per IP per
//! rolling hour) against the store's window-counting query, then fires the
//! confirmation email best-effort: a failed send is logged and never fails
//! the submission that triggered it.

use std::path::Path as FsPath;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use gift_grove_core::{Email, GiveawayEntryId};

use crate::error::{AppError, Result};
use crate::middleware::{ClientIp, RequireAdmin};
use crate::models::{GiveawayEntry, NewGiveawayEntry, OrderReference};
use crate::state::AppState;

/// Rolling window length for the per-IP entry limit.
pub const WINDOW_MINUTES: i64 = 60;

/// Maximum entries per IP within the window.
pub const MAX_ENTRIES_PER_WINDOW: usize = 5;

/// Subdirectory of the data dir where order screenshots land.
const SCREENSHOT_DIR: &str = "screenshots";

// =============================================================================
// Request / Response Types
// =============================================================================

/// Giveaway submission body.
///
/// Exactly one proof of purchase is required: an order ID, or a screenshot
/// as a base64 data URL.
#[derive(Debug, Deserialize)]
pub struct GiveawayRequest {
    pub email: String,
    pub order_id: Option<String>,
    pub screenshot: Option<String>,
    pub product_link: String,
}

/// Giveaway submission acknowledgement.
#[derive(Debug, Serialize)]
pub struct GiveawayResponse {
    pub id: GiveawayEntryId,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Submit a giveaway entry.
pub async fn submit(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(body): Json<GiveawayRequest>,
) -> Result<(StatusCode, Json<GiveawayResponse>)> {
    let email =
        Email::parse(body.email.trim()).map_err(|e| AppError::BadRequest(e.to_string()))?;

    if body.product_link.trim().is_empty() {
        return Err(AppError::BadRequest("product_link is required".to_owned()));
    }

    let window_start = Utc::now() - Duration::minutes(WINDOW_MINUTES);
    if state.store().giveaway_entries_from_ip_since(ip, window_start) >= MAX_ENTRIES_PER_WINDOW {
        return Err(AppError::RateLimited);
    }

    let reference = match (
        body.order_id.as_deref().map(str::trim).filter(|s| !s.is_empty()),
        body.screenshot.as_deref(),
    ) {
        (Some(order_id), _) => OrderReference::OrderId(order_id.to_owned()),
        (None, Some(data_url)) => {
            let file_name = save_screenshot(state.store().data_dir(), data_url).await?;
            OrderReference::Screenshot(file_name)
        }
        (None, None) => {
            return Err(AppError::BadRequest(
                "an order_id or screenshot is required".to_owned(),
            ));
        }
    };

    let entry = state.store().create_giveaway_entry(NewGiveawayEntry {
        email,
        reference,
        product_link: body.product_link,
        ip_address: ip,
    });

    send_confirmation(&state, &entry);

    Ok((
        StatusCode::CREATED,
        Json(GiveawayResponse {
            id: entry.id,
            created_at: entry.created_at,
        }),
    ))
}

/// All giveaway entries, for the admin dashboard.
pub async fn entries(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Json<Vec<GiveawayEntry>> {
    Json(state.store().giveaway_entries())
}

// =============================================================================
// Helpers
// =============================================================================

/// Fire the confirmation email in the background.
///
/// Success flips the entry's `email_sent` flag; failure is logged and
/// swallowed so the submission itself never rolls back.
fn send_confirmation(state: &AppState, entry: &GiveawayEntry) {
    let Some(email_service) = state.email().cloned() else {
        tracing::info!(entry = %entry.id, "email not configured; skipping giveaway confirmation");
        return;
    };

    let state = state.clone();
    let entry_id = entry.id;
    let to = entry.email.clone();
    let product_link = entry.product_link.clone();

    tokio::spawn(async move {
        match email_service
            .send_giveaway_confirmation(&to, &product_link)
            .await
        {
            Ok(()) => {
                if let Err(e) = state.store().mark_giveaway_email_sent(entry_id) {
                    tracing::warn!(entry = %entry_id, error = %e, "entry vanished before email flag update");
                }
            }
            Err(e) => {
                tracing::warn!(entry = %entry_id, error = %e, "failed to send giveaway confirmation");
            }
        }
    });
}

/// Decode a `data:image/...;base64,` upload and write it under the data
/// directory; returns the stored file name.
async fn save_screenshot(data_dir: &FsPath, data_url: &str) -> Result<String> {
    let (header, payload) = data_url
        .split_once(";base64,")
        .ok_or_else(|| AppError::BadRequest("screenshot must be a base64 data URL".to_owned()))?;

    let extension = match header {
        "data:image/png" => "png",
        "data:image/jpeg" | "data:image/jpg" => "jpg",
        "data:image/webp" => "webp",
        other => {
            return Err(AppError::BadRequest(format!(
                "unsupported screenshot type: {other}"
            )));
        }
    };

    let bytes = BASE64
        .decode(payload)
        .map_err(|_| AppError::BadRequest("screenshot is not valid base64".to_owned()))?;

    let dir = data_dir.join(SCREENSHOT_DIR);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::Internal(format!("failed to create screenshot dir: {e}")))?;

    let file_name = format!("entry-{}.{extension}", uuid::Uuid::new_v4());
    tokio::fs::write(dir.join(&file_name), &bytes)
        .await
        .map_err(|e| AppError::Internal(format!("failed to store screenshot: {e}")))?;

    Ok(file_name)
}

//! Rating route handlers.
//!
//! Submitting a rating is a user action; changing or deleting an arbitrary
//! rating by ID is an admin correction.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use gift_grove_core::{ProductId, RatingId};

use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{Product, Rating};
use crate::state::AppState;

/// Body carrying a star value.
#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub rating: u8,
}

fn validate_stars(value: u8) -> Result<()> {
    if (1..=5).contains(&value) {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "rating must be between 1 and 5".to_owned(),
        ))
    }
}

/// Rate a product as the current user; re-rating overwrites.
pub async fn rate(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(product_id): Path<i64>,
    Json(body): Json<RateRequest>,
) -> Result<Json<Product>> {
    validate_stars(body.rating)?;

    let product = state
        .store()
        .rate_product(current.id, ProductId::new(product_id), body.rating)?;
    Ok(Json(product))
}

/// Current ratings for a product.
pub async fn list(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<Json<Vec<Rating>>> {
    let product_id = ProductId::new(product_id);
    if state.store().product(product_id).is_none() {
        return Err(AppError::NotFound(format!("product {product_id}")));
    }
    Ok(Json(state.store().ratings_for(product_id)))
}

/// Admin correction: change a rating's value.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(rating_id): Path<i64>,
    Json(body): Json<RateRequest>,
) -> Result<Json<Product>> {
    validate_stars(body.rating)?;

    let product = state
        .store()
        .update_rating(RatingId::new(rating_id), body.rating)?;
    Ok(Json(product))
}

/// Admin correction: delete a rating.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(rating_id): Path<i64>,
) -> Result<Json<Product>> {
    let product = state.store().delete_rating(RatingId::new(rating_id))?;
    Ok(Json(product))
}

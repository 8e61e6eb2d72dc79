//! Wishlist route handlers.

use std::collections::BTreeSet;

use axum::{
    Json,
    extract::{Path, State},
};

use gift_grove_core::ProductId;

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::Product;
use crate::state::AppState;

/// The current user's wishlist, resolved to products.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<Vec<Product>>> {
    state
        .store()
        .wishlist_products(current.id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("user {}", current.id)))
}

/// Add a product to the current user's wishlist; returns the updated set.
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(product_id): Path<i64>,
) -> Result<Json<BTreeSet<ProductId>>> {
    let wishlist = state
        .store()
        .add_to_wishlist(current.id, ProductId::new(product_id))?;
    Ok(Json(wishlist))
}

/// Remove a product from the current user's wishlist; returns the updated set.
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(product_id): Path<i64>,
) -> Result<Json<BTreeSet<ProductId>>> {
    let wishlist = state
        .store()
        .remove_from_wishlist(current.id, ProductId::new(product_id))?;
    Ok(Json(wishlist))
}

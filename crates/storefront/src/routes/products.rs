//! Product catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use gift_grove_core::{Price, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{NewProduct, Product, ProductUpdate};
use crate::services::ScrapedProduct;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Query parameters for the catalog listing.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub category: Option<String>,
}

/// Body for creating a product. Price is a decimal string ("12.50").
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub image_url: Option<String>,
    pub affiliate_link: String,
    pub category: String,
}

/// Body for updating a product; absent fields stay unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub image_url: Option<String>,
    pub affiliate_link: Option<String>,
    pub category: Option<String>,
}

/// Body for scraping a product draft from a URL.
#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
}

fn parse_price(raw: &str) -> Result<Price> {
    Price::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

// =============================================================================
// Public Handlers
// =============================================================================

/// Catalog listing, optionally filtered by category.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Json<Vec<Product>> {
    Json(state.store().products_in_category(query.category.as_deref()))
}

/// Product detail.
pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Product>> {
    state
        .store()
        .product(ProductId::new(id))
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

// =============================================================================
// Admin Handlers
// =============================================================================

/// Create a product.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    if body.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_owned()));
    }
    if body.affiliate_link.trim().is_empty() {
        return Err(AppError::BadRequest("affiliate_link is required".to_owned()));
    }

    let product = state.store().create_product(NewProduct {
        name: body.name,
        description: body.description.unwrap_or_default(),
        price: parse_price(&body.price)?,
        image_url: body.image_url,
        affiliate_link: body.affiliate_link,
        category: body.category,
    });

    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<Product>> {
    let price = body.price.as_deref().map(parse_price).transpose()?;

    let product = state.store().update_product(
        ProductId::new(id),
        ProductUpdate {
            name: body.name,
            description: body.description,
            price,
            image_url: body.image_url,
            affiliate_link: body.affiliate_link,
            category: body.category,
        },
    )?;

    Ok(Json(product))
}

/// Delete a product, cascading to wishlists and ratings.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.store().delete_product(ProductId::new(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Draft a product from a scraped URL.
pub async fn scrape(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<ScrapeRequest>,
) -> Result<Json<ScrapedProduct>> {
    let draft = state.scraper().scrape(&body.url).await?;
    Ok(Json(draft))
}

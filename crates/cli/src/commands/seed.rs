//! Seed the catalog with sample products.

use std::path::Path;

use gift_grove_core::Price;
use gift_grove_storefront::models::NewProduct;
use gift_grove_storefront::store::Store;

/// Sample catalog: (name, description, price, category, affiliate slug).
const SAMPLE_PRODUCTS: &[(&str, &str, &str, &str, &str)] = &[
    (
        "Enamel Camping Mug",
        "A sturdy two-tone enamel mug for trailside coffee and campfire cocoa.",
        "12.50",
        "outdoors",
        "enamel-camping-mug",
    ),
    (
        "Chunky Knit Throw",
        "Oversized hand-knit throw blanket in oat, sized for two on movie night.",
        "64.00",
        "home",
        "chunky-knit-throw",
    ),
    (
        "Pour-Over Coffee Kit",
        "Glass dripper, reusable filter, and a bag of single-origin beans.",
        "38.95",
        "kitchen",
        "pour-over-coffee-kit",
    ),
    (
        "Mini Bluetooth Turntable",
        "Palm-sized record player that actually spins 3-inch vinyl singles.",
        "89.99",
        "tech",
        "mini-bluetooth-turntable",
    ),
    (
        "Botanical Soy Candle Trio",
        "Fig, cedar, and sea salt candles poured into reusable glass jars.",
        "29.00",
        "home",
        "botanical-soy-candle-trio",
    ),
    (
        "Leather Passport Wallet",
        "Slim vegetable-tanned wallet with slots for a passport and two cards.",
        "45.00",
        "travel",
        "leather-passport-wallet",
    ),
];

/// Populate the catalog with the sample products.
///
/// Refuses to touch a non-empty catalog unless `force` is set.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or a sample price fails
/// to parse.
pub fn run(data_dir: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open(data_dir)?;

    if !store.products().is_empty() && !force {
        tracing::warn!(
            "catalog already has {} products; re-run with --force to seed anyway",
            store.products().len()
        );
        return Ok(());
    }

    for (name, description, price, category, slug) in SAMPLE_PRODUCTS {
        let product = store.create_product(NewProduct {
            name: (*name).to_owned(),
            description: (*description).to_owned(),
            price: Price::parse(price)?,
            image_url: Some(format!("https://cdn.giftgrove.app/products/{slug}.jpg")),
            affiliate_link: format!("https://shop.example.com/{slug}?tag=giftgrove-20"),
            category: (*category).to_owned(),
        });
        tracing::info!(id = %product.id, name = %product.name, "seeded product");
    }

    tracing::info!("seeded {} products", SAMPLE_PRODUCTS.len());
    Ok(())
}

//! Store persistence properties, run directly against the storefront
//! library with throwaway data directories.
//!
//! These tests are deliberately synchronous: without a runtime the store
//! writes its collection files inline, so every assertion about on-disk
//! state is deterministic.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use gift_grove_core::{Email, Price, StoredCredential};
use gift_grove_storefront::models::{NewGiveawayEntry, NewProduct, NewUser, OrderReference};
use gift_grove_storefront::store::Store;

fn fresh_data_dir() -> PathBuf {
    std::env::temp_dir().join(format!("gift-grove-it-{}", uuid::Uuid::new_v4()))
}

fn mug() -> NewProduct {
    NewProduct {
        name: "Mug".to_owned(),
        description: "An enamel mug".to_owned(),
        price: Price::parse("12.50").unwrap(),
        image_url: Some("https://cdn.example.com/mug.jpg".to_owned()),
        affiliate_link: "https://shop.example.com/mug?tag=giftgrove".to_owned(),
        category: "kitchen".to_owned(),
    }
}

fn casey() -> NewUser {
    NewUser {
        username: "casey".to_owned(),
        credential: StoredCredential::from_stored("$argon2id$v=19$m=19456,t=2,p=1$c$h"),
        email: Some(Email::parse("casey@example.com").unwrap()),
        is_admin: false,
    }
}

#[test]
fn price_is_stored_in_cents_and_rerating_overwrites() {
    // The worked example: create {name: "Mug", price: 12.50} -> 1250 cents;
    // rate 5 then 3 by the same user -> average 3.0, count 1.
    let store = Store::open(fresh_data_dir()).unwrap();

    let user = store.create_user(casey()).unwrap();
    let product = store.create_product(mug());
    assert_eq!(product.price.cents(), 1250);

    store.rate_product(user.id, product.id, 5).unwrap();
    let rated = store.rate_product(user.id, product.id, 3).unwrap();

    assert!((rated.average_rating - 3.0).abs() < f64::EPSILON);
    assert_eq!(rated.rating_count, 1);
    assert_eq!(store.ratings_for(product.id).len(), 1);
}

#[test]
fn full_state_survives_restart() {
    let dir = fresh_data_dir();

    let (user_id, mug_id) = {
        let store = Store::open(&dir).unwrap();
        let user = store.create_user(casey()).unwrap();
        let product = store.create_product(mug());

        store.add_to_wishlist(user.id, product.id).unwrap();
        store.rate_product(user.id, product.id, 4).unwrap();
        store.create_giveaway_entry(NewGiveawayEntry {
            email: Email::parse("fan@example.com").unwrap(),
            reference: OrderReference::OrderId("112-5551234-0001".to_owned()),
            product_link: "https://shop.example.com/mug".to_owned(),
            ip_address: "203.0.113.9".parse().unwrap(),
        });

        (user.id, product.id)
    };

    let store = Store::open(&dir).unwrap();

    let product = store.product(mug_id).unwrap();
    assert_eq!(product.name, "Mug");
    assert_eq!(product.price.cents(), 1250);
    assert!((product.average_rating - 4.0).abs() < f64::EPSILON);
    assert_eq!(product.rating_count, 1);

    let user = store.user(user_id).unwrap();
    assert_eq!(user.username, "casey");
    assert_eq!(user.email.unwrap().as_str(), "casey@example.com");
    // Credentials are stripped from the persisted user file by design.
    assert!(user.credential.is_none());

    assert!(store.wishlist(user_id).unwrap().contains(&mug_id));
    assert_eq!(store.ratings_for(mug_id).len(), 1);
    assert_eq!(store.giveaway_entries().len(), 1);
}

#[test]
fn deleted_products_never_reappear_in_wishlists_after_restart() {
    let dir = fresh_data_dir();

    let user_id = {
        let store = Store::open(&dir).unwrap();
        let user = store.create_user(casey()).unwrap();
        let doomed = store.create_product(mug());
        store.add_to_wishlist(user.id, doomed.id).unwrap();
        store.rate_product(user.id, doomed.id, 5).unwrap();
        store.delete_product(doomed.id).unwrap();
        user.id
    };

    let store = Store::open(&dir).unwrap();
    assert!(store.products().is_empty());
    assert!(store.wishlist(user_id).unwrap().is_empty());
}

#[test]
fn giveaway_window_counts_only_recent_entries_per_ip() {
    let store = Store::open(fresh_data_dir()).unwrap();
    let ip: std::net::IpAddr = "203.0.113.9".parse().unwrap();

    for _ in 0..5 {
        store.create_giveaway_entry(NewGiveawayEntry {
            email: Email::parse("fan@example.com").unwrap(),
            reference: OrderReference::OrderId("112-5551234-0001".to_owned()),
            product_link: "https://shop.example.com/mug".to_owned(),
            ip_address: ip,
        });
    }

    let window_start = chrono::Utc::now() - chrono::Duration::minutes(60);
    assert_eq!(store.giveaway_entries_from_ip_since(ip, window_start), 5);

    // Entries older than the window stop counting; a query window that
    // starts after the burst sees none.
    let after_burst = chrono::Utc::now() + chrono::Duration::seconds(1);
    assert_eq!(store.giveaway_entries_from_ip_since(ip, after_burst), 0);

    // Another IP is unaffected.
    let other: std::net::IpAddr = "198.51.100.4".parse().unwrap();
    assert_eq!(store.giveaway_entries_from_ip_since(other, window_start), 0);
}

#[test]
fn id_counters_never_reuse_ids_across_restart() {
    let dir = fresh_data_dir();

    {
        let store = Store::open(&dir).unwrap();
        let first = store.create_product(mug());
        store.create_product(mug());
        store.delete_product(first.id).unwrap();
    }

    let store = Store::open(&dir).unwrap();
    let third = store.create_product(mug());
    assert_eq!(third.id.as_i64(), 3);
}

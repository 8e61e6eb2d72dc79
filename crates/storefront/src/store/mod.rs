//! The entity store: in-memory collections with JSON-file persistence.
//!
//! A [`Store`] owns one keyed arena per entity type plus the wishlist and
//! rating maps, all behind a single `RwLock`. Every operation runs to
//! completion under the lock; there is no cross-request isolation beyond
//! that, and concurrent writers race with last-write-wins semantics. Each
//! mutation rewrites the affected collection's JSON file (see [`persist`]);
//! on startup the files are the rehydration source and the ID generators
//! resume past the highest persisted IDs.
//!
//! The store performs no authorization - it trusts its callers. The route
//! layer gates every mutating call through the extractors in
//! `middleware::auth`.

pub mod arena;
pub mod persist;
pub mod sessions;

mod giveaways;
mod products;
mod ratings;
mod users;
mod wishlists;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use gift_grove_core::{GiveawayEntryId, ProductId, RatingId, UserId};

use crate::models::{GiveawayEntry, Product, Rating, User};

use arena::{Arena, IdGen};
use persist::{
    GIVEAWAYS_FILE, PRODUCTS_FILE, RATINGS_FILE, USERS_FILE, WISHLISTS_FILE, encode,
    load_collection, write_collection,
};

pub use persist::PersistError;

pub use sessions::{JsonSessionStore, SESSION_FLUSH_INTERVAL, SessionFlushTask};

/// Errors reported by store operations.
///
/// NotFound signaling is uniform: every update or delete against a missing
/// ID reports `NotFound`, while plain lookups return `Option`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The referenced entity does not exist.
    #[error("not found")]
    NotFound,

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// In-memory entity collections.
///
/// Wishlists are per-user sets of product IDs; ratings are kept keyed by
/// product ID (the layout the ratings file uses) with their own ID
/// generator, since corrections look ratings up by rating ID across all
/// products.
#[derive(Debug, Default)]
struct StoreInner {
    users: Arena<UserId, User>,
    products: Arena<ProductId, Product>,
    wishlists: BTreeMap<UserId, BTreeSet<ProductId>>,
    ratings: BTreeMap<ProductId, Vec<Rating>>,
    rating_ids: IdGen<RatingId>,
    giveaways: Arena<GiveawayEntryId, GiveawayEntry>,
}

/// The entity store.
///
/// Constructed once at startup and shared through `AppState`; tests build
/// fresh instances against throwaway data directories.
#[derive(Debug)]
pub struct Store {
    data_dir: PathBuf,
    inner: RwLock<StoreInner>,
}

impl Store {
    /// Open the store, creating the data directory if needed and
    /// rehydrating every collection from its JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the data directory cannot be created or
    /// an existing data file is unreadable or corrupt.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;

        let users: Vec<User> = load_collection(&data_dir, USERS_FILE)?;
        let products: Vec<Product> = load_collection(&data_dir, PRODUCTS_FILE)?;
        let ratings: BTreeMap<ProductId, Vec<Rating>> =
            load_collection(&data_dir, RATINGS_FILE)?;
        let wishlists: BTreeMap<UserId, BTreeSet<ProductId>> =
            load_collection(&data_dir, WISHLISTS_FILE)?;
        let giveaways: Vec<GiveawayEntry> = load_collection(&data_dir, GIVEAWAYS_FILE)?;

        let rating_ids = IdGen::after(ratings.values().flatten().map(|r| r.id));

        let inner = StoreInner {
            users: Arena::from_entries(users.into_iter().map(|u| (u.id, u))),
            products: Arena::from_entries(products.into_iter().map(|p| (p.id, p))),
            wishlists,
            ratings,
            rating_ids,
            giveaways: Arena::from_entries(giveaways.into_iter().map(|g| (g.id, g))),
        };

        Ok(Self {
            data_dir,
            inner: RwLock::new(inner),
        })
    }

    /// The directory holding this store's data files.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    // Collection snapshots are serialized while the lock is held so a file
    // never mixes two states; the disk write itself settles asynchronously.

    fn persist_users(&self, inner: &StoreInner) {
        let snapshot: Vec<&User> = inner.users.values().collect();
        if let Some(bytes) = encode(USERS_FILE, &snapshot) {
            write_collection(&self.data_dir, USERS_FILE, bytes);
        }
    }

    fn persist_products(&self, inner: &StoreInner) {
        let snapshot: Vec<&Product> = inner.products.values().collect();
        if let Some(bytes) = encode(PRODUCTS_FILE, &snapshot) {
            write_collection(&self.data_dir, PRODUCTS_FILE, bytes);
        }
    }

    fn persist_ratings(&self, inner: &StoreInner) {
        if let Some(bytes) = encode(RATINGS_FILE, &inner.ratings) {
            write_collection(&self.data_dir, RATINGS_FILE, bytes);
        }
    }

    fn persist_wishlists(&self, inner: &StoreInner) {
        if let Some(bytes) = encode(WISHLISTS_FILE, &inner.wishlists) {
            write_collection(&self.data_dir, WISHLISTS_FILE, bytes);
        }
    }

    fn persist_giveaways(&self, inner: &StoreInner) {
        let snapshot: Vec<&GiveawayEntry> = inner.giveaways.values().collect();
        if let Some(bytes) = encode(GIVEAWAYS_FILE, &snapshot) {
            write_collection(&self.data_dir, GIVEAWAYS_FILE, bytes);
        }
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use gift_grove_core::{Price, StoredCredential};

    use crate::models::{NewProduct, NewUser};

    use super::test_support::{fresh_data_dir, fresh_store};
    use super::*;

    fn sample_product(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_owned(),
            description: "A very giftable thing".to_owned(),
            price: Price::parse("12.50").unwrap(),
            image_url: Some("https://cdn.example.com/mug.jpg".to_owned()),
            affiliate_link: "https://shop.example.com/mug?tag=giftgrove".to_owned(),
            category: "kitchen".to_owned(),
        }
    }

    fn sample_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_owned(),
            credential: StoredCredential::from_stored("$argon2id$v=19$m=19456,t=2,p=1$c$h"),
            email: None,
            is_admin: false,
        }
    }

    #[test]
    fn test_restart_reproduces_products_ratings_and_wishlists() {
        let dir = fresh_data_dir();

        {
            let store = Store::open(&dir).unwrap();
            let user = store.create_user(sample_user("casey")).unwrap();
            let product = store.create_product(sample_product("Mug"));
            store.create_product(sample_product("Scarf"));
            store.add_to_wishlist(user.id, product.id).unwrap();
            store.rate_product(user.id, product.id, 4).unwrap();
        }

        // Plain #[test] has no runtime, so every write above landed inline.
        let products = std::fs::read(dir.join(persist::PRODUCTS_FILE)).unwrap();
        let ratings = std::fs::read(dir.join(persist::RATINGS_FILE)).unwrap();
        let wishlists = std::fs::read(dir.join(persist::WISHLISTS_FILE)).unwrap();

        let reopened = Store::open(&dir).unwrap();
        let product = reopened.product(gift_grove_core::ProductId::new(1)).unwrap();
        assert_eq!(product.name, "Mug");
        assert_eq!(product.price.cents(), 1250);
        assert_eq!(product.average_rating, 4.0);
        assert_eq!(product.rating_count, 1);

        // A second save cycle must reproduce the files byte-for-byte.
        let casey = reopened.user_by_username("casey").unwrap();
        {
            let inner = reopened.read();
            reopened.persist_products(&inner);
            reopened.persist_ratings(&inner);
            reopened.persist_wishlists(&inner);
        }
        assert_eq!(std::fs::read(dir.join(persist::PRODUCTS_FILE)).unwrap(), products);
        assert_eq!(std::fs::read(dir.join(persist::RATINGS_FILE)).unwrap(), ratings);
        assert_eq!(std::fs::read(dir.join(persist::WISHLISTS_FILE)).unwrap(), wishlists);

        // Credentials are stripped from the user file by design.
        assert!(casey.credential.is_none());
    }

    #[test]
    fn test_restart_resumes_id_counters() {
        let dir = fresh_data_dir();

        {
            let store = Store::open(&dir).unwrap();
            store.create_product(sample_product("Mug"));
            store.create_product(sample_product("Scarf"));
        }

        let reopened = Store::open(&dir).unwrap();
        let third = reopened.create_product(sample_product("Candle"));
        assert_eq!(third.id.as_i64(), 3);
    }

    #[test]
    fn test_open_rejects_corrupt_collection() {
        let dir = fresh_data_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(persist::PRODUCTS_FILE), b"[{").unwrap();

        assert!(matches!(
            Store::open(&dir),
            Err(PersistError::Decode { .. })
        ));
    }

    #[test]
    fn test_fresh_store_is_empty() {
        let store = fresh_store();
        assert!(store.products().is_empty());
        assert!(store.users().is_empty());
        assert!(store.giveaway_entries().is_empty());
    }
}

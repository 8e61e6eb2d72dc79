//! Wishlist operations.
//!
//! A wishlist is a per-user set of product IDs, created empty alongside the
//! user. Membership is only ever written for existing users and products;
//! product deletion cascades members out (see `delete_product`).

use std::collections::BTreeSet;

use gift_grove_core::{ProductId, UserId};

use crate::models::Product;

use super::{Store, StoreError};

impl Store {
    /// The user's wishlist as a set of product IDs.
    #[must_use]
    pub fn wishlist(&self, user_id: UserId) -> Option<BTreeSet<ProductId>> {
        self.read().wishlists.get(&user_id).cloned()
    }

    /// The user's wishlist resolved to products, in ID order.
    #[must_use]
    pub fn wishlist_products(&self, user_id: UserId) -> Option<Vec<Product>> {
        let inner = self.read();
        let wishlist = inner.wishlists.get(&user_id)?;
        Some(
            wishlist
                .iter()
                .filter_map(|id| inner.products.get(*id).cloned())
                .collect(),
        )
    }

    /// Add a product to a user's wishlist.
    ///
    /// Adding an already-present product is a no-op (set semantics).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user or product does not exist.
    pub fn add_to_wishlist(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<BTreeSet<ProductId>, StoreError> {
        let mut guard = self.write();
        let inner = &mut *guard;

        if !inner.users.contains(user_id) || !inner.products.contains(product_id) {
            return Err(StoreError::NotFound);
        }

        let wishlist = inner.wishlists.entry(user_id).or_default();
        wishlist.insert(product_id);
        let snapshot = wishlist.clone();

        self.persist_wishlists(inner);
        Ok(snapshot)
    }

    /// Remove a product from a user's wishlist.
    ///
    /// Removing an absent product is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user does not exist.
    pub fn remove_from_wishlist(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<BTreeSet<ProductId>, StoreError> {
        let mut guard = self.write();
        let inner = &mut *guard;

        if !inner.users.contains(user_id) {
            return Err(StoreError::NotFound);
        }

        let wishlist = inner.wishlists.entry(user_id).or_default();
        wishlist.remove(&product_id);
        let snapshot = wishlist.clone();

        self.persist_wishlists(inner);
        Ok(snapshot)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gift_grove_core::{Price, StoredCredential};

    use crate::models::{NewProduct, NewUser};

    use super::super::test_support::fresh_store;
    use super::*;

    fn seeded() -> (Store, UserId, ProductId) {
        let store = fresh_store();
        let user = store
            .create_user(NewUser {
                username: "casey".to_owned(),
                credential: StoredCredential::from_stored("$argon2id$v=19$m=19456,t=2,p=1$c$h"),
                email: None,
                is_admin: false,
            })
            .unwrap();
        let product = store.create_product(NewProduct {
            name: "Mug".to_owned(),
            description: "A mug".to_owned(),
            price: Price::parse("12.50").unwrap(),
            image_url: None,
            affiliate_link: "https://shop.example.com/mug".to_owned(),
            category: "kitchen".to_owned(),
        });
        (store, user.id, product.id)
    }

    #[test]
    fn test_add_is_idempotent() {
        let (store, user, product) = seeded();

        store.add_to_wishlist(user, product).unwrap();
        let wishlist = store.add_to_wishlist(user, product).unwrap();

        assert_eq!(wishlist.len(), 1);
        assert!(wishlist.contains(&product));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (store, user, product) = seeded();

        let wishlist = store.remove_from_wishlist(user, product).unwrap();
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_membership_requires_existing_user_and_product() {
        let (store, user, product) = seeded();

        assert!(matches!(
            store.add_to_wishlist(UserId::new(99), product),
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.add_to_wishlist(user, ProductId::new(99)),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn test_wishlist_products_resolves_in_id_order() {
        let (store, user, first) = seeded();
        let second = store.create_product(NewProduct {
            name: "Scarf".to_owned(),
            description: "A scarf".to_owned(),
            price: Price::parse("25.00").unwrap(),
            image_url: None,
            affiliate_link: "https://shop.example.com/scarf".to_owned(),
            category: "fashion".to_owned(),
        });

        store.add_to_wishlist(user, second.id).unwrap();
        store.add_to_wishlist(user, first).unwrap();

        let products = store.wishlist_products(user).unwrap();
        let ids: Vec<i64> = products.iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_wishlist_for_unknown_user_is_none() {
        let (store, _, _) = seeded();
        assert!(store.wishlist(UserId::new(99)).is_none());
        assert!(store.wishlist_products(UserId::new(99)).is_none());
    }
}

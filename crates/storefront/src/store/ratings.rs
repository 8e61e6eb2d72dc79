//! Star ratings and the rating aggregator.
//!
//! Every mutation here recomputes the owning product's `average_rating` and
//! `rating_count` from the full rating list, so the derived fields can never
//! drift from the rating set.

use chrono::Utc;

use gift_grove_core::{ProductId, RatingId, UserId};

use crate::models::{Product, Rating};

use super::{Store, StoreError, StoreInner};

/// Recompute a product's aggregate from its current rating list.
///
/// The mean is rounded half-up on the scaled value (tenths), using integer
/// arithmetic so the result is deterministic: `tenths = (sum * 20 + n) / 2n`.
/// An empty list yields exactly `0.0`, never NaN.
fn apply_aggregate(product: &mut Product, ratings: &[Rating]) {
    let Ok(count) = i64::try_from(ratings.len()) else {
        return;
    };

    if count == 0 {
        product.average_rating = 0.0;
        product.rating_count = 0;
        return;
    }

    let sum: i64 = ratings.iter().map(|r| i64::from(r.rating)).sum();
    let tenths = (sum * 20 + count) / (2 * count);

    #[allow(clippy::cast_precision_loss)] // tenths is at most 50
    {
        product.average_rating = tenths as f64 / 10.0;
    }
    product.rating_count = u32::try_from(count).unwrap_or(u32::MAX);
}

fn recompute(inner: &mut StoreInner, product_id: ProductId) -> Result<Product, StoreError> {
    let product = inner
        .products
        .get_mut(product_id)
        .ok_or(StoreError::NotFound)?;
    let ratings = inner.ratings.get(&product_id).map_or(&[][..], Vec::as_slice);
    apply_aggregate(product, ratings);
    Ok(product.clone())
}

impl Store {
    /// Submit a rating for a product.
    ///
    /// If the user already rated this product, the existing record's value
    /// and timestamp are replaced in place; otherwise a fresh record is
    /// appended. Returns the product with its recomputed aggregate.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user or product does not exist.
    pub fn rate_product(
        &self,
        user_id: UserId,
        product_id: ProductId,
        value: u8,
    ) -> Result<Product, StoreError> {
        let mut guard = self.write();
        let inner = &mut *guard;

        if !inner.users.contains(user_id) || !inner.products.contains(product_id) {
            return Err(StoreError::NotFound);
        }

        let now = Utc::now();
        let list = inner.ratings.entry(product_id).or_default();

        if let Some(existing) = list.iter_mut().find(|r| r.user_id == user_id) {
            existing.rating = value;
            existing.created_at = now;
        } else {
            let id = inner.rating_ids.next_id();
            list.push(Rating {
                id,
                user_id,
                product_id,
                rating: value,
                created_at: now,
            });
        }

        let product = recompute(inner, product_id)?;
        self.persist_ratings(inner);
        self.persist_products(inner);
        Ok(product)
    }

    /// Admin correction: change an existing rating's value.
    ///
    /// The rating is located by ID with a linear scan across the per-product
    /// lists, which is fine at catalog scale.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no rating has this ID.
    pub fn update_rating(&self, id: RatingId, value: u8) -> Result<Product, StoreError> {
        let mut guard = self.write();
        let inner = &mut *guard;

        let product_id = {
            let rating = inner
                .ratings
                .values_mut()
                .flatten()
                .find(|r| r.id == id)
                .ok_or(StoreError::NotFound)?;
            rating.rating = value;
            rating.created_at = Utc::now();
            rating.product_id
        };

        let product = recompute(inner, product_id)?;
        self.persist_ratings(inner);
        self.persist_products(inner);
        Ok(product)
    }

    /// Admin correction: delete a rating.
    ///
    /// Deleting the last rating of a product resets its aggregate to zero.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no rating has this ID.
    pub fn delete_rating(&self, id: RatingId) -> Result<Product, StoreError> {
        let mut guard = self.write();
        let inner = &mut *guard;

        let mut product_id = None;
        for (pid, list) in &mut inner.ratings {
            if let Some(pos) = list.iter().position(|r| r.id == id) {
                list.remove(pos);
                product_id = Some(*pid);
                break;
            }
        }
        let product_id = product_id.ok_or(StoreError::NotFound)?;

        let product = recompute(inner, product_id)?;
        self.persist_ratings(inner);
        self.persist_products(inner);
        Ok(product)
    }

    /// Current ratings for a product, in submission order.
    #[must_use]
    pub fn ratings_for(&self, product_id: ProductId) -> Vec<Rating> {
        self.read()
            .ratings
            .get(&product_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
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

    fn add_user(store: &Store, username: &str) -> UserId {
        store
            .create_user(NewUser {
                username: username.to_owned(),
                credential: StoredCredential::from_stored("$argon2id$v=19$m=19456,t=2,p=1$c$h"),
                email: None,
                is_admin: false,
            })
            .unwrap()
            .id
    }

    #[test]
    fn test_re_rating_keeps_one_record_with_latest_value() {
        let (store, user, product) = seeded();

        store.rate_product(user, product, 5).unwrap();
        let updated = store.rate_product(user, product, 3).unwrap();

        assert_eq!(updated.rating_count, 1);
        assert_eq!(updated.average_rating, 3.0);

        let ratings = store.ratings_for(product);
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings.first().unwrap().rating, 3);
    }

    #[test]
    fn test_average_is_rounded_half_up_on_tenths() {
        let (store, user, product) = seeded();
        let second = add_user(&store, "jordan");
        let third = add_user(&store, "riley");

        // 4 + 5 + 5 = 14 over 3 -> 4.666... -> 4.7
        store.rate_product(user, product, 4).unwrap();
        store.rate_product(second, product, 5).unwrap();
        let updated = store.rate_product(third, product, 5).unwrap();
        assert_eq!(updated.average_rating, 4.7);

        // 1 + 2 + 2 = 5 over 3 -> 1.666... -> 1.7
        store.rate_product(user, product, 1).unwrap();
        store.rate_product(second, product, 2).unwrap();
        let updated = store.rate_product(third, product, 2).unwrap();
        assert_eq!(updated.average_rating, 1.7);

        // 3 + 4 = 7 over 2 -> 3.5 exactly (half stays up)
        let scarf = store.create_product(NewProduct {
            name: "Scarf".to_owned(),
            description: "A scarf".to_owned(),
            price: Price::parse("25.00").unwrap(),
            image_url: None,
            affiliate_link: "https://shop.example.com/scarf".to_owned(),
            category: "fashion".to_owned(),
        });
        store.rate_product(user, scarf.id, 3).unwrap();
        let updated = store.rate_product(second, scarf.id, 4).unwrap();
        assert_eq!(updated.average_rating, 3.5);
    }

    #[test]
    fn test_update_rating_recomputes_aggregate() {
        let (store, user, product) = seeded();
        let second = add_user(&store, "jordan");

        store.rate_product(user, product, 1).unwrap();
        store.rate_product(second, product, 2).unwrap();

        let rating_id = store.ratings_for(product).first().unwrap().id;
        let updated = store.update_rating(rating_id, 5).unwrap();

        // (5 + 2) / 2 = 3.5
        assert_eq!(updated.average_rating, 3.5);
        assert_eq!(updated.rating_count, 2);
    }

    #[test]
    fn test_delete_last_rating_resets_aggregate_to_zero() {
        let (store, user, product) = seeded();

        store.rate_product(user, product, 5).unwrap();
        let rating_id = store.ratings_for(product).first().unwrap().id;
        let updated = store.delete_rating(rating_id).unwrap();

        assert_eq!(updated.average_rating, 0.0);
        assert_eq!(updated.rating_count, 0);
        assert!(store.ratings_for(product).is_empty());
    }

    #[test]
    fn test_rating_unknown_user_or_product_is_not_found() {
        let (store, user, product) = seeded();

        assert!(matches!(
            store.rate_product(UserId::new(99), product, 4),
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.rate_product(user, ProductId::new(99), 4),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn test_correcting_unknown_rating_is_not_found() {
        let (store, _, _) = seeded();
        assert!(matches!(
            store.update_rating(RatingId::new(42), 3),
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.delete_rating(RatingId::new(42)),
            Err(StoreError::NotFound)
        ));
    }
}

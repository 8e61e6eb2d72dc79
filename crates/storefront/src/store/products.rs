//! Product catalog operations.

use chrono::Utc;

use gift_grove_core::ProductId;

use crate::models::{NewProduct, Product, ProductUpdate};

use super::{Store, StoreError};

impl Store {
    /// Add a product to the catalog.
    ///
    /// The rating aggregate starts at zero; input validation (price sign,
    /// required fields) happens upstream at the route boundary.
    pub fn create_product(&self, new: NewProduct) -> Product {
        let mut guard = self.write();
        let inner = &mut *guard;

        let product = inner
            .products
            .insert_with(|id| Product {
                id,
                name: new.name,
                description: new.description,
                price: new.price,
                image_url: new.image_url,
                affiliate_link: new.affiliate_link,
                category: new.category,
                average_rating: 0.0,
                rating_count: 0,
                created_at: Utc::now(),
            })
            .clone();

        self.persist_products(inner);
        product
    }

    /// Get a product by ID.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.read().products.get(id).cloned()
    }

    /// All products in ID order, optionally filtered by category.
    #[must_use]
    pub fn products_in_category(&self, category: Option<&str>) -> Vec<Product> {
        self.read()
            .products
            .values()
            .filter(|p| category.is_none_or(|c| p.category == c))
            .cloned()
            .collect()
    }

    /// All products in ID order.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.products_in_category(None)
    }

    /// Merge a partial update into an existing product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the product does not exist.
    pub fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, StoreError> {
        let mut guard = self.write();
        let inner = &mut *guard;

        let product = inner.products.get_mut(id).ok_or(StoreError::NotFound)?;

        if let Some(name) = update.name {
            product.name = name;
        }
        if let Some(description) = update.description {
            product.description = description;
        }
        if let Some(price) = update.price {
            product.price = price;
        }
        if let Some(image_url) = update.image_url {
            product.image_url = Some(image_url);
        }
        if let Some(affiliate_link) = update.affiliate_link {
            product.affiliate_link = affiliate_link;
        }
        if let Some(category) = update.category {
            product.category = category;
        }

        let updated = product.clone();
        self.persist_products(inner);
        Ok(updated)
    }

    /// Delete a product, cascading to every wishlist and its rating set.
    ///
    /// The cascade is not transactional: a crash mid-way can leave partial
    /// removal, which the rehydration path tolerates.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the product does not exist.
    pub fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        let mut guard = self.write();
        let inner = &mut *guard;

        inner.products.remove(id).ok_or(StoreError::NotFound)?;

        for wishlist in inner.wishlists.values_mut() {
            wishlist.remove(&id);
        }
        inner.ratings.remove(&id);

        self.persist_products(inner);
        self.persist_wishlists(inner);
        self.persist_ratings(inner);
        Ok(())
    }
}

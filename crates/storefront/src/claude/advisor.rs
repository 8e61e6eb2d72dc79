//! The gift advisor.
//!
//! Grounds Claude in the current catalog and asks for a recommendation. The
//! caller decides what to do when the model is unreachable; by contract the
//! recommendation endpoints answer with a friendly fallback instead of an
//! error page.

use crate::config::ClaudeConfig;
use crate::models::Product;

use super::client::ClaudeClient;
use super::error::ClaudeError;
use super::types::Message;

/// Most catalog items included in the system prompt.
const MAX_CATALOG_ITEMS: usize = 50;

/// Longest description excerpt per item.
const MAX_DESCRIPTION_CHARS: usize = 140;

/// Catalog-grounded gift recommendation service.
#[derive(Clone)]
pub struct GiftAdvisor {
    client: ClaudeClient,
}

impl GiftAdvisor {
    /// Create a new advisor.
    ///
    /// # Panics
    ///
    /// Panics if the API key contains invalid header characters (see
    /// [`ClaudeClient::new`]).
    #[must_use]
    pub fn new(config: &ClaudeConfig) -> Self {
        Self {
            client: ClaudeClient::new(config),
        }
    }

    /// Ask for a gift suggestion for a free-text request.
    ///
    /// # Errors
    ///
    /// Returns [`ClaudeError`] when the API call fails or returns no text;
    /// callers surface a fallback suggestion instead of the error.
    pub async fn recommend(
        &self,
        catalog: &[Product],
        request: &str,
    ) -> Result<String, ClaudeError> {
        let system = system_prompt(catalog);
        let response = self
            .client
            .chat(vec![Message::user(request)], Some(system))
            .await?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(ClaudeError::Parse("empty completion".to_owned()));
        }
        Ok(text)
    }
}

/// Build the catalog-grounded system prompt.
fn system_prompt(catalog: &[Product]) -> String {
    let mut prompt = String::from(
        "You are the gift advisor for Gift Grove, a curated gift shop. \
         Recommend one to three products from the catalog below that best \
         fit the shopper's request. Mention each pick by name with a short \
         reason, and stay warm and concise. If nothing fits, say so and \
         suggest the closest match.\n\nCatalog:\n",
    );

    for product in catalog.iter().take(MAX_CATALOG_ITEMS) {
        let mut description = product.description.clone();
        if description.len() > MAX_DESCRIPTION_CHARS {
            let cut = description
                .char_indices()
                .take_while(|(i, _)| *i < MAX_DESCRIPTION_CHARS)
                .map(|(i, c)| i + c.len_utf8())
                .last()
                .unwrap_or(0);
            description.truncate(cut);
            description.push('…');
        }

        prompt.push_str(&format!(
            "- {} ({}, {}): {}\n",
            product.name, product.category, product.price, description
        ));
    }

    if catalog.len() > MAX_CATALOG_ITEMS {
        prompt.push_str(&format!(
            "…and {} more products not listed.\n",
            catalog.len() - MAX_CATALOG_ITEMS
        ));
    }

    prompt
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use gift_grove_core::{Price, ProductId};

    use super::*;

    fn product(id: i64, name: &str, description: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            description: description.to_owned(),
            price: Price::from_cents(1250).expect("non-negative"),
            image_url: None,
            affiliate_link: "https://shop.example.com".to_owned(),
            category: "kitchen".to_owned(),
            average_rating: 0.0,
            rating_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_system_prompt_lists_products_with_prices() {
        let catalog = vec![product(1, "Enamel Mug", "Sturdy trailside coffee mug")];
        let prompt = system_prompt(&catalog);

        assert!(prompt.contains("Enamel Mug"));
        assert!(prompt.contains("$12.50"));
        assert!(prompt.contains("kitchen"));
    }

    #[test]
    fn test_system_prompt_truncates_long_descriptions() {
        let long = "x".repeat(400);
        let catalog = vec![product(1, "Mug", &long)];
        let prompt = system_prompt(&catalog);

        assert!(!prompt.contains(&long));
        assert!(prompt.contains('…'));
    }

    #[test]
    fn test_system_prompt_caps_catalog_size() {
        let catalog: Vec<Product> = (0..60)
            .map(|i| product(i, &format!("Item {i}"), "A thing"))
            .collect();
        let prompt = system_prompt(&catalog);

        assert!(prompt.contains("Item 0"));
        assert!(!prompt.contains("Item 55"));
        assert!(prompt.contains("10 more products"));
    }
}

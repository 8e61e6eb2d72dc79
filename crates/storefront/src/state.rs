//! Application state shared across handlers.

use std::sync::Arc;

use crate::claude::GiftAdvisor;
use crate::config::StorefrontConfig;
use crate::services::{EmailService, ProductScraper};
use crate::store::{PersistError, Store};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum AppInitError {
    #[error("store error: {0}")]
    Store(#[from] PersistError),
    #[error("email transport error: {0}")]
    Email(#[from] lettre::transport::smtp::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// entity store, the gift advisor, and the optional email service.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Store,
    advisor: GiftAdvisor,
    email: Option<EmailService>,
    scraper: ProductScraper,
}

impl AppState {
    /// Create a new application state, opening the store from the
    /// configured data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened or the SMTP relay
    /// cannot be configured.
    pub fn new(config: StorefrontConfig) -> Result<Self, AppInitError> {
        let store = Store::open(&config.data_dir)?;
        let advisor = GiftAdvisor::new(&config.claude);
        let email = config.email.as_ref().map(EmailService::new).transpose()?;
        let scraper = ProductScraper::new();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                advisor,
                email,
                scraper,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the entity store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    /// Get a reference to the gift advisor.
    #[must_use]
    pub fn advisor(&self) -> &GiftAdvisor {
        &self.inner.advisor
    }

    /// Get the email service, if SMTP is configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }

    /// Get a reference to the product scraper.
    #[must_use]
    pub fn scraper(&self) -> &ProductScraper {
        &self.inner.scraper
    }
}

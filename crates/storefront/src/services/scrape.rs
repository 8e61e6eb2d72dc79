//! Product drafts scraped from affiliate URLs.
//!
//! Admins paste a product page URL and get a pre-filled draft back: Open
//! Graph title/description/image plus the first dollar amount on the page
//! as a price candidate. Extraction is best-effort - every field is
//! optional and the admin reviews the draft before it becomes a product.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use gift_grove_core::Price;

/// Fetch timeout for scraped pages.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Browser-ish user agent; several storefronts return stripped-down pages
/// to unknown clients.
const USER_AGENT: &str = "Mozilla/5.0 (compatible; GiftGroveBot/1.0; +https://giftgrove.app)";

static TITLE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title pattern is valid")
});

static PRICE_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\s*([0-9][0-9,]*(?:\.[0-9]{2})?)").expect("price pattern is valid")
});

/// Errors that can occur while scraping a product page.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The URL does not parse.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Only http(s) pages can be scraped.
    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    /// The page could not be fetched.
    #[error("fetch error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A product draft extracted from a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScrapedProduct {
    /// Page or Open Graph title.
    pub name: Option<String>,
    /// Open Graph description.
    pub description: Option<String>,
    /// Open Graph image URL.
    pub image_url: Option<String>,
    /// First dollar amount found on the page.
    pub price: Option<Price>,
}

/// HTTP client wrapper for scraping product pages.
#[derive(Clone)]
pub struct ProductScraper {
    client: reqwest::Client,
}

impl ProductScraper {
    /// Create a new scraper.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be constructed, which only happens
    /// when the TLS backend fails to initialize.
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }

    /// Fetch a product page and extract a draft from it.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] if the URL is invalid, has a non-http(s)
    /// scheme, or the page cannot be fetched.
    pub async fn scrape(&self, raw_url: &str) -> Result<ScrapedProduct, ScrapeError> {
        let url = Url::parse(raw_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ScrapeError::UnsupportedScheme(url.scheme().to_owned()));
        }

        let html = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(extract_draft(&html))
    }
}

impl Default for ProductScraper {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract a draft from page HTML.
fn extract_draft(html: &str) -> ScrapedProduct {
    let name = meta_content(html, "og:title").or_else(|| {
        TITLE_TAG
            .captures(html)
            .and_then(|c| c.get(1))
            .map(|m| decode_entities(m.as_str().trim()))
    });

    let price = PRICE_CANDIDATE
        .captures(html)
        .and_then(|c| c.get(1))
        .and_then(|m| Price::parse(&m.as_str().replace(',', "")).ok());

    ScrapedProduct {
        name,
        description: meta_content(html, "og:description"),
        image_url: meta_content(html, "og:image"),
        price,
    }
}

/// Pull the `content` attribute of a `<meta>` tag by property/name,
/// tolerating either attribute order.
fn meta_content(html: &str, property: &str) -> Option<String> {
    let prop = regex::escape(property);
    let patterns = [
        format!(r#"(?i)<meta[^>]*(?:property|name)=["']{prop}["'][^>]*content=["']([^"']*)["']"#),
        format!(r#"(?i)<meta[^>]*content=["']([^"']*)["'][^>]*(?:property|name)=["']{prop}["']"#),
    ];

    patterns.iter().find_map(|pattern| {
        Regex::new(pattern)
            .ok()?
            .captures(html)?
            .get(1)
            .map(|m| decode_entities(m.as_str()))
    })
}

/// Decode the handful of HTML entities that show up in meta content.
fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Fallback Title &amp; More</title>
  <meta property="og:title" content="Enamel Camping Mug" />
  <meta property="og:description" content="A sturdy mug for trailside coffee" />
  <meta content="https://cdn.example.com/mug.jpg" property="og:image" />
</head>
<body>
  <span class="price">$12.50</span>
  <span class="was">$19.99</span>
</body>
</html>"#;

    #[test]
    fn test_extract_og_fields() {
        let draft = extract_draft(PAGE);
        assert_eq!(draft.name.as_deref(), Some("Enamel Camping Mug"));
        assert_eq!(
            draft.description.as_deref(),
            Some("A sturdy mug for trailside coffee")
        );
        assert_eq!(
            draft.image_url.as_deref(),
            Some("https://cdn.example.com/mug.jpg")
        );
    }

    #[test]
    fn test_extract_first_price_candidate() {
        let draft = extract_draft(PAGE);
        assert_eq!(draft.price.unwrap().cents(), 1250);
    }

    #[test]
    fn test_title_fallback_decodes_entities() {
        let html = "<html><head><title>Mug &amp; Spoon</title></head></html>";
        let draft = extract_draft(html);
        assert_eq!(draft.name.as_deref(), Some("Mug & Spoon"));
    }

    #[test]
    fn test_price_with_thousands_separator() {
        let html = "<html><body>$1,299.00</body></html>";
        let draft = extract_draft(html);
        assert_eq!(draft.price.unwrap().cents(), 129_900);
    }

    #[test]
    fn test_empty_page_yields_empty_draft() {
        assert_eq!(extract_draft(""), ScrapedProduct::default());
    }

    #[tokio::test]
    async fn test_scrape_rejects_non_http_schemes() {
        let scraper = ProductScraper::new();
        assert!(matches!(
            scraper.scrape("ftp://example.com/mug").await,
            Err(ScrapeError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            scraper.scrape("not a url").await,
            Err(ScrapeError::InvalidUrl(_))
        ));
    }
}

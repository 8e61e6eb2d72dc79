//! Integration tests for Gift Grove.
//!
//! # Test Categories
//!
//! - `store_roundtrip` - Store persistence and restart properties, run
//!   directly against the storefront library. These always run.
//! - `storefront_api` - HTTP tests against a running server. These are
//!   `#[ignore]`d; start the server first:
//!
//! ```bash
//! STOREFRONT_DATA_DIR=$(mktemp -d) cargo run -p gift-grove-storefront &
//! cargo test -p gift-grove-integration-tests -- --ignored
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

//! Gift Grove Core - Shared types library.
//!
//! This crate provides common types used across all Gift Grove components:
//! - `storefront` - Public-facing gift storefront and JSON API
//! - `cli` - Command-line tools for seeding and account management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no file access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and credentials

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

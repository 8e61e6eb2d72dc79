//! Core types for Gift Grove.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credential;
pub mod email;
pub mod id;
pub mod price;

pub use credential::StoredCredential;
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};

//! Claude-backed gift recommendations.
//!
//! A thin Messages API client plus the [`GiftAdvisor`] that grounds the
//! model in the current catalog and turns chat or quiz input into a gift
//! suggestion.

mod advisor;
mod client;
mod error;
mod types;

pub use advisor::GiftAdvisor;
pub use client::ClaudeClient;
pub use error::ClaudeError;
pub use types::{ChatRequest, ChatResponse, ContentBlock, Message, Role, StopReason, Usage};

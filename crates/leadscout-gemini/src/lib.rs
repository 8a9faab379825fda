//! Gemini-backed lead discovery.
//!
//! [`GeminiClient`] sends one grounded `generateContent` request per search,
//! validates the structured reply against the five-field listing shape and
//! turns it into fresh [`leadscout_core::Lead`]s. Every failure surfaces to
//! callers as [`leadscout_core::SearchFailed`]; the detailed [`GeminiError`]
//! is logged and also available through [`GeminiClient::fetch_listings`].

pub mod client;
pub mod error;
pub mod prompt;
pub mod types;

pub use client::{parse_listings, GeminiClient};
pub use error::GeminiError;
pub use prompt::{build_prompt, listing_response_schema};

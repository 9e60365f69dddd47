//! banter-api: Client for a single-turn text completion endpoint
//!
//! This crate sends a prompt to `<base>/completions` and folds whatever comes
//! back (JSON, plain text, error payloads, transport failures) into a
//! [`CompletionOutcome`].

pub mod client;
pub mod error;
pub mod response;
pub mod types;

pub use client::{CompletionClient, DEFAULT_BASE_URL, HttpCompletionClient};
pub use error::{Error, Result};
pub use types::*;

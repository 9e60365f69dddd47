//! Error types for banter-chat

use thiserror::Error;

/// Result type alias using banter-chat Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up a chat session
#[derive(Error, Debug)]
pub enum Error {
    /// An error from the completion client layer
    #[error(transparent)]
    Api(#[from] banter_api::Error),
}

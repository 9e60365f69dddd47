//! banter-chat: Conversation state and chat session
//!
//! This crate owns the message list state machine: a submission appends the
//! user's message and a placeholder, and settling the request fills or fails
//! that placeholder.

pub mod conversation;
pub mod error;
pub mod events;
pub mod message;
pub mod session;

pub use conversation::{Conversation, PendingTurn, Reconciled};
pub use error::{Error, Result};
pub use events::ChatEvent;
pub use message::{ERROR_MARKER, GREETING, Message, PLACEHOLDER_TEXT, Role};
pub use session::ChatSession;

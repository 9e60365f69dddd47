//! Chat messages

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Greeting seeded into every new conversation
pub const GREETING: &str = "Ask me something about Azure OpenAI.";

/// Content of the assistant message shown while a request is pending
pub const PLACEHOLDER_TEXT: &str = "Thinking... 🤔";

/// Prefix of an assistant message that carries an error
pub const ERROR_MARKER: &str = "Error: ";

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Label shown above a message
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "AI",
        }
    }
}

/// A single message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Placeholder still waiting for its request to settle
    #[serde(default)]
    pub pending: bool,
    /// Content is an error report
    #[serde(default)]
    pub is_error: bool,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            pending: false,
            is_error: false,
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create an assistant message carrying an error
    pub fn assistant_error(error: &str) -> Self {
        Self {
            is_error: true,
            ..Self::new(Role::Assistant, format!("{}{}", ERROR_MARKER, error))
        }
    }

    /// Create the placeholder shown while a request is in flight
    pub fn placeholder() -> Self {
        Self {
            pending: true,
            ..Self::new(Role::Assistant, PLACEHOLDER_TEXT)
        }
    }

    /// Whether this is an unsettled assistant placeholder
    pub fn is_placeholder(&self) -> bool {
        self.role == Role::Assistant && self.pending
    }

    /// Creation time as local `HH:MM`
    pub fn time_label(&self) -> String {
        self.timestamp.with_timezone(&Local).format("%H:%M").to_string()
    }
}

//! Chat session event types

use banter_api::CompletionOutcome;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events emitted after each committed change to the conversation.
///
/// Views subscribe to these to know when to re-render and scroll.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// User message and placeholder were appended
    TurnStarted { slot: Uuid, prompt: String },

    /// The placeholder was filled (or a response appended)
    TurnSettled { slot: Uuid, outcome: CompletionOutcome },
}

impl ChatEvent {
    /// Check if this event ends a turn
    pub fn is_terminal(&self) -> bool {
        matches!(self, ChatEvent::TurnSettled { .. })
    }

    /// Slot the event refers to
    pub fn slot(&self) -> Uuid {
        match self {
            ChatEvent::TurnStarted { slot, .. } | ChatEvent::TurnSettled { slot, .. } => *slot,
        }
    }
}

//! Conversation state: messages, in-flight flag, last error and usage.

use banter_api::{CompletionOutcome, Usage};
use uuid::Uuid;

use crate::message::{GREETING, Message};

/// Reservation for one submitted prompt.
///
/// Returned by [`Conversation::begin`]; names the placeholder slot that
/// [`Conversation::settle`] will fill. Consumed on settlement, so a slot can
/// only be settled once.
#[derive(Debug)]
pub struct PendingTurn {
    slot: Uuid,
    prompt: String,
}

impl PendingTurn {
    /// Id of the placeholder message reserved for the response
    pub fn slot(&self) -> Uuid {
        self.slot
    }

    /// Prompt text as submitted
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// How a settled outcome was folded into the message list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// The reserved placeholder was overwritten in place
    Replaced,
    /// The placeholder was gone, so a new assistant message was appended
    Appended,
}

/// Conversation state.
///
/// Messages keep insertion order. The only mutation after insertion is the
/// one-time fill of a placeholder.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    in_flight: bool,
    last_error: Option<String>,
    last_usage: Option<Usage>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// New conversation seeded with the standard greeting
    pub fn new() -> Self {
        Self::with_greeting(GREETING)
    }

    /// New conversation seeded with a custom greeting
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::assistant(greeting)],
            in_flight: false,
            last_error: None,
            last_usage: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether a request is outstanding
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Error text of the most recent failed request, until the next submission
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Usage counters of the most recent successful request
    pub fn last_usage(&self) -> Option<Usage> {
        self.last_usage
    }

    /// Start a submission.
    ///
    /// Returns `None` without touching state when the trimmed draft is empty
    /// or a request is already in flight.
    pub fn begin(&mut self, draft: &str) -> Option<PendingTurn> {
        if draft.trim().is_empty() || self.in_flight {
            return None;
        }

        self.last_error = None;
        self.messages.push(Message::user(draft));
        let placeholder = Message::placeholder();
        let slot = placeholder.id;
        self.messages.push(placeholder);
        self.in_flight = true;

        tracing::debug!("Reserved slot {} ({} messages)", slot, self.messages.len());

        Some(PendingTurn {
            slot,
            prompt: draft.to_string(),
        })
    }

    /// Fold a request's outcome into the conversation.
    pub fn settle(&mut self, turn: PendingTurn, outcome: CompletionOutcome) -> Reconciled {
        self.in_flight = false;

        let replacement = match outcome {
            CompletionOutcome::Success { response, usage } => {
                self.last_usage = usage;
                Message::assistant(response)
            }
            CompletionOutcome::Failure { error } => {
                let message = Message::assistant_error(&error);
                self.last_error = Some(error);
                message
            }
        };

        let slot = self
            .messages
            .iter_mut()
            .find(|m| m.id == turn.slot && m.is_placeholder());

        match slot {
            Some(existing) => {
                existing.content = replacement.content;
                existing.is_error = replacement.is_error;
                existing.pending = false;
                tracing::debug!("Filled slot {}", turn.slot);
                Reconciled::Replaced
            }
            None => {
                tracing::warn!("Slot {} not found, appending response", turn.slot);
                self.messages.push(replacement);
                Reconciled::Appended
            }
        }
    }
}

//! Chat session: a conversation bound to a completion client

use std::sync::Arc;

use banter_api::{CompletionClient, CompletionOutcome, HttpCompletionClient};
use tokio::sync::broadcast;

use crate::{
    conversation::{Conversation, PendingTurn, Reconciled},
    error::Result,
    events::ChatEvent,
};

/// Owns the conversation and dispatches prompts to the client.
pub struct ChatSession {
    conversation: Conversation,
    client: Arc<dyn CompletionClient>,
    event_tx: broadcast::Sender<ChatEvent>,
}

impl ChatSession {
    /// Create a session with a fresh, greeted conversation
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            conversation: Conversation::new(),
            client,
            event_tx,
        }
    }

    /// Create a session talking HTTP to `base_url`
    pub fn connect(base_url: &str) -> Result<Self> {
        let client = HttpCompletionClient::new(base_url)?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Replace the seeded greeting
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.conversation = Conversation::with_greeting(greeting);
        self
    }

    /// Subscribe to state-commit events
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.event_tx.subscribe()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Shared handle on the client, for driving a request without borrowing the session
    pub fn client(&self) -> Arc<dyn CompletionClient> {
        Arc::clone(&self.client)
    }

    /// First half of a submission: reserve the placeholder slot.
    pub fn begin(&mut self, draft: &str) -> Option<PendingTurn> {
        let turn = self.conversation.begin(draft)?;
        self.emit(ChatEvent::TurnStarted {
            slot: turn.slot(),
            prompt: turn.prompt().to_string(),
        });
        Some(turn)
    }

    /// Second half of a submission: fill or fail the reserved slot.
    pub fn settle(&mut self, turn: PendingTurn, outcome: CompletionOutcome) -> Reconciled {
        let slot = turn.slot();
        let how = self.conversation.settle(turn, outcome.clone());
        self.emit(ChatEvent::TurnSettled { slot, outcome });
        how
    }

    /// Submit a draft and wait for it to settle.
    ///
    /// Returns `None` if the draft was rejected (blank, or a request is in flight).
    pub async fn submit(&mut self, draft: &str) -> Option<CompletionOutcome> {
        let turn = self.begin(draft)?;
        let client = self.client();
        let outcome = client.complete(turn.prompt()).await;
        self.settle(turn, outcome.clone());
        Some(outcome)
    }

    fn emit(&self, event: ChatEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }
}

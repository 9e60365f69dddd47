//! Request, usage and outcome types

use serde::{Deserialize, Serialize};

/// Body of `POST <base>/completions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// Character counters reported by the endpoint (informational only)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_chars: u64,
    pub response_chars: u64,
}

/// Result of one completion request.
///
/// Every request resolves to exactly one of these; the client never surfaces a
/// failure any other way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompletionOutcome {
    /// The endpoint produced a response
    Success {
        response: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        usage: Option<Usage>,
    },
    /// Transport, status, payload or decoding failure
    Failure { error: String },
}

impl CompletionOutcome {
    /// Create a success outcome without usage counters
    pub fn success(response: impl Into<String>) -> Self {
        Self::Success {
            response: response.into(),
            usage: None,
        }
    }

    /// Create a failure outcome
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Error text, if this is a failure
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure { error } => Some(error),
            Self::Success { .. } => None,
        }
    }

    /// Usage counters, if the endpoint reported them
    pub fn usage(&self) -> Option<Usage> {
        match self {
            Self::Success { usage, .. } => *usage,
            Self::Failure { .. } => None,
        }
    }
}

impl From<crate::Error> for CompletionOutcome {
    fn from(err: crate::Error) -> Self {
        Self::failure(err.user_message())
    }
}

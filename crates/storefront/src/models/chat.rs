//! Chat transcript messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nebula_core::{ChatMessageId, ChatSender};

/// One message in the support chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: ChatMessageId,
    pub text: String,
    pub sender: ChatSender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// A message typed by the shopper.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, ChatSender::User)
    }

    /// A reply from the chatbot.
    #[must_use]
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, ChatSender::Bot)
    }

    fn new(text: impl Into<String>, sender: ChatSender) -> Self {
        Self {
            id: ChatMessageId::generate(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }
}

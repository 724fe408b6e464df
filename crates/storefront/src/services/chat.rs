//! Support chat backed by the chat transcript document.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::backend::DocumentDatabase;
use crate::models::ChatMessage;
use crate::services::chatbot;
use crate::services::database::{DatabaseError, DocumentPath};

/// Reads and extends the shared chat transcript.
#[derive(Clone)]
pub struct ChatService {
    database: Arc<dyn DocumentDatabase>,
}

impl ChatService {
    #[must_use]
    pub fn new(database: Arc<dyn DocumentDatabase>) -> Self {
        Self { database }
    }

    /// The whole transcript, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the transcript cannot be read.
    pub async fn history(&self) -> Result<Vec<ChatMessage>, DatabaseError> {
        let snapshot = self.database.read(DocumentPath::CHAT_TRANSCRIPT).await?;
        Ok(snapshot.deserialize()?.unwrap_or_default())
    }

    /// Send `text` and record the bot's reply.
    ///
    /// Returns the two new messages, or nothing for blank input.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the transcript cannot be read or written.
    #[instrument(skip_all)]
    pub async fn send(&self, text: &str) -> Result<Vec<ChatMessage>, DatabaseError> {
        if text.trim().is_empty() {
            debug!("Ignoring blank chat message");
            return Ok(Vec::new());
        }

        let question = ChatMessage::user(text);
        let answer = ChatMessage::bot(chatbot::reply(text));

        let mut transcript = self.history().await?;
        transcript.push(question.clone());
        transcript.push(answer.clone());

        let value = serde_json::to_value(&transcript).map_err(|source| {
            DatabaseError::InvalidPayload {
                path: DocumentPath::CHAT_TRANSCRIPT.to_string(),
                source,
            }
        })?;
        self.database
            .write(DocumentPath::CHAT_TRANSCRIPT, value)
            .await?;

        Ok(vec![question, answer])
    }
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService").finish_non_exhaustive()
    }
}

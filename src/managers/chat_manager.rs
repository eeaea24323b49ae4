//! Chat transcript manager.
//!
//! Holds the session-scoped conversation with the AI assistant: an ordered
//! message list with a pending bubble while a completion is in flight.
//! Nothing here is persisted; a restart starts an empty transcript.

use uuid::Uuid;

use crate::services::assistant::AssistantGateway;
use crate::types::chat::ChatMessage;

pub struct ChatManager {
    transcript: Vec<ChatMessage>,
}

impl ChatManager {
    pub fn new() -> Self {
        Self {
            transcript: Vec::new(),
        }
    }

    fn now_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn push_user_message(&mut self, text: &str) {
        self.transcript.push(ChatMessage {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            is_from_user: true,
            created_at_ms: Self::now_ms(),
            links: Vec::new(),
            is_pending: false,
            is_error: false,
        });
    }

    /// Appends the pending assistant bubble and returns its id.
    fn push_pending_reply(&mut self) -> String {
        let id = Uuid::new_v4().to_string();
        self.transcript.push(ChatMessage {
            id: id.clone(),
            text: String::new(),
            is_from_user: false,
            created_at_ms: Self::now_ms(),
            links: Vec::new(),
            is_pending: true,
            is_error: false,
        });
        id
    }

    /// Sends `text` to the assistant and resolves the pending bubble in
    /// place: with the reply on success, or with a message-level error
    /// bubble on failure. Failures never escape the transcript.
    pub async fn send(
        &mut self,
        text: &str,
        assistant: &AssistantGateway,
        api_key: &str,
        model: &str,
    ) -> ChatMessage {
        self.push_user_message(text);
        let pending_id = self.push_pending_reply();

        let outcome = assistant.send_message(api_key, model, text).await;

        let message = self
            .transcript
            .iter_mut()
            .find(|m| m.id == pending_id)
            .expect("pending bubble was just appended");

        match outcome {
            Ok(reply) => {
                message.text = reply.text;
                message.links = reply.links;
                message.is_pending = false;
            }
            Err(e) => {
                message.text = e.to_string();
                message.is_pending = false;
                message.is_error = true;
            }
        }
        message.clone()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn clear(&mut self) {
        self.transcript.clear();
    }
}

impl Default for ChatManager {
    fn default() -> Self {
        Self::new()
    }
}

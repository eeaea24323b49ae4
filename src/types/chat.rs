use serde::{Deserialize, Serialize};

/// Where a chat message link navigates to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LinkKind {
    Repository,
    User,
    External,
}

/// A tap-through navigation target attached to an assistant message.
///
/// Links are metadata derived from the resolved GitHub context, not parsed
/// out of the completion text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageLink {
    pub label: String,
    /// `owner/name` for repositories, `login` for users, a URL otherwise.
    pub target: String,
    pub kind: LinkKind,
}

/// One turn in the assistant conversation.
///
/// The transcript is session-scoped and never persisted across restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub is_from_user: bool,
    pub created_at_ms: i64,
    #[serde(default)]
    pub links: Vec<MessageLink>,
    /// True while the completion for this bubble is still in flight.
    #[serde(default)]
    pub is_pending: bool,
    /// True when this bubble carries a failure message instead of a reply.
    #[serde(default)]
    pub is_error: bool,
}

//! Conversation identity and participant roster

use serde::{Deserialize, Serialize};

use crate::message::{User, UserId};

/// Unique identifier for a conversation
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    /// Create a new conversation ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ConversationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A conversation as shown in the UI: its identity and who is in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation identifier
    pub id: ConversationId,
    /// Title shown in the sidebar and window header
    pub title: String,
    /// Everyone in the conversation, local user included
    pub participants: Vec<User>,
}

impl Conversation {
    /// Create a conversation with the given participants
    pub fn new(id: impl Into<ConversationId>, title: impl Into<String>, participants: Vec<User>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            participants,
        }
    }

    /// Look up a participant's display name
    pub fn participant_name(&self, user: &UserId) -> Option<&str> {
        self.participants
            .iter()
            .find(|p| &p.id == user)
            .map(|p| p.name.as_str())
    }
}

//! Messages, authors, and attachments as the UI sees them.
//!
//! [`ChatMessage`] is a display snapshot: the store owns the canonical
//! history and pushes updated snapshots through its event stream. The
//! mutators here (edit, delete, reaction toggles) return whether anything
//! changed so store implementations can skip redundant events.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conversation::ConversationId;

/// Unique identifier for a message
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    /// Create a new message ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MessageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Unique identifier for a user
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// Create a new user ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A chat participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,
    /// Display name shown next to messages
    pub name: String,
}

impl User {
    /// Create a user
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Metadata describing a message attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentMeta {
    /// Original file name
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// MIME type, guessed from the extension when staging
    pub mime_type: String,
}

/// A file staged on the composer, not yet sent.
///
/// Keeps the local path so the store can read the bytes at send time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingAttachment {
    /// Metadata shown on the pending chip and validated against policy
    pub meta: AttachmentMeta,
    /// Where the file lives on disk
    pub path: PathBuf,
}

/// A message in a conversation.
///
/// Deleted messages stay in the list as tombstones: `deleted` is set and
/// the body is cleared, so the UI can render a placeholder in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message identifier
    pub id: MessageId,
    /// Conversation this message belongs to
    pub conversation_id: ConversationId,
    /// Who sent it (only this user can edit or delete)
    pub author: User,
    /// Latest body text (empty if deleted)
    pub body: String,
    /// When the message was sent
    pub sent_at: DateTime<Utc>,
    /// Whether the body has been edited since sending
    pub edited: bool,
    /// Whether this message has been deleted
    pub deleted: bool,
    /// Reactions by emoji: who reacted with what
    pub reactions: BTreeMap<String, BTreeSet<UserId>>,
    /// Files attached to the message
    pub attachments: Vec<AttachmentMeta>,
}

impl ChatMessage {
    /// Create a new message with no reactions or attachments
    pub fn new(
        id: impl Into<MessageId>,
        conversation_id: impl Into<ConversationId>,
        author: User,
        body: impl Into<String>,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            conversation_id: conversation_id.into(),
            author,
            body: body.into(),
            sent_at,
            edited: false,
            deleted: false,
            reactions: BTreeMap::new(),
            attachments: Vec::new(),
        }
    }

    /// Attach files to the message
    pub fn with_attachments(mut self, attachments: Vec<AttachmentMeta>) -> Self {
        self.attachments = attachments;
        self
    }

    /// Check if the given user can edit or delete this message
    pub fn can_edit(&self, user: &UserId) -> bool {
        self.author.id == *user && !self.deleted
    }

    /// Replace the body text.
    ///
    /// Returns true if the edit was applied, false if the message is
    /// deleted or nothing changed.
    pub fn edit(&mut self, new_body: &str) -> bool {
        if self.deleted || self.body == new_body {
            return false;
        }
        self.body = new_body.to_string();
        self.edited = true;
        true
    }

    /// Delete the message (soft delete, body cleared).
    ///
    /// Returns true if the delete was applied, false if already deleted.
    pub fn delete(&mut self) -> bool {
        if self.deleted {
            return false;
        }
        self.body = String::new();
        self.deleted = true;
        true
    }

    /// Add a reaction from a user.
    ///
    /// Returns true if added, false if this user already reacted with
    /// this emoji.
    pub fn add_reaction(&mut self, user: &UserId, emoji: &str) -> bool {
        self.reactions
            .entry(emoji.to_string())
            .or_default()
            .insert(user.clone())
    }

    /// Remove a user's reaction.
    ///
    /// Returns true if removed, false if there was nothing to remove.
    /// Emojis with no remaining reactors disappear from the map.
    pub fn remove_reaction(&mut self, user: &UserId, emoji: &str) -> bool {
        let Some(reactors) = self.reactions.get_mut(emoji) else {
            return false;
        };
        let removed = reactors.remove(user);
        if reactors.is_empty() {
            self.reactions.remove(emoji);
        }
        removed
    }

    /// Whether the given user has reacted with this emoji
    pub fn has_reaction(&self, user: &UserId, emoji: &str) -> bool {
        self.reactions
            .get(emoji)
            .is_some_and(|reactors| reactors.contains(user))
    }

    /// Reaction pills for display: (emoji, reactor count), emoji-ordered
    pub fn reaction_counts(&self) -> Vec<(String, usize)> {
        self.reactions
            .iter()
            .map(|(emoji, reactors)| (emoji.clone(), reactors.len()))
            .collect()
    }
}

//! The store contract the chat UI talks to.
//!
//! A `ChatStore` is whatever actually moves messages: a REST client, a
//! websocket session, a sync engine. The UI only needs the operations
//! named here plus the event stream to keep mounted views current.
//! Every write is best-effort from the UI's point of view: failures are
//! surfaced once and never retried.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::conversation::{Conversation, ConversationId};
use crate::message::{ChatMessage, MessageId, OutgoingAttachment};
use crate::report::ReportReason;
use crate::typing::TypingIndicator;

/// Errors that can occur in store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Conversation not found
    #[error("conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    /// Message not found
    #[error("message not found: {0}")]
    MessageNotFound(MessageId),

    /// Only the author may edit or delete a message
    #[error("not the author of message {0}")]
    NotAuthor(MessageId),

    /// Could not reach the backend
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend refused the request
    #[error("rejected: {0}")]
    Rejected(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Events pushed by the store as conversations change.
///
/// Message events carry a full updated snapshot so subscribers can
/// replace their copy without a follow-up fetch.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// A message arrived, the local user's own sends included
    MessageAdded(ChatMessage),
    /// A message body was edited
    MessageEdited(ChatMessage),
    /// A message was deleted (it remains as a tombstone)
    MessageDeleted {
        /// Conversation the message was in
        conversation_id: ConversationId,
        /// Which message was deleted
        message_id: MessageId,
    },
    /// The reaction set of a message changed
    ReactionsChanged(ChatMessage),
    /// A participant started or stopped composing
    Typing(TypingIndicator),
}

/// Operations the chat presentation layer consumes.
///
/// Implementations are shared behind an `Arc` and must be safe to call
/// from spawned tasks.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// List the conversations visible to the local user
    async fn conversations(&self) -> StoreResult<Vec<Conversation>>;

    /// Snapshot of a conversation's messages in display order
    async fn messages(&self, conversation: &ConversationId) -> StoreResult<Vec<ChatMessage>>;

    /// Subscribe to store events
    fn subscribe(&self) -> broadcast::Receiver<ChatEvent>;

    /// Send a message with optional attachments.
    ///
    /// Attachments are assumed to have passed policy validation; the
    /// store reads their bytes from the staged paths.
    async fn send_message(
        &self,
        conversation: &ConversationId,
        text: &str,
        attachments: Vec<OutgoingAttachment>,
    ) -> StoreResult<MessageId>;

    /// Signal that the local user started or stopped composing.
    ///
    /// Purely advisory; other participants render it as a typing
    /// indicator.
    async fn set_typing(&self, conversation: &ConversationId, is_typing: bool) -> StoreResult<()>;

    /// Move the local user's read cursor to the end of the conversation
    async fn mark_as_read(&self, conversation: &ConversationId) -> StoreResult<()>;

    /// How many messages the local user has not read yet
    async fn unread_count(&self, conversation: &ConversationId) -> StoreResult<u32>;

    /// Add the local user's reaction to a message
    async fn add_reaction(&self, message: &MessageId, emoji: &str) -> StoreResult<()>;

    /// Remove the local user's reaction from a message
    async fn remove_reaction(&self, message: &MessageId, emoji: &str) -> StoreResult<()>;

    /// Replace a message body. Author only.
    async fn edit_message(&self, message: &MessageId, new_body: &str) -> StoreResult<()>;

    /// Delete a message (soft delete). Author only.
    async fn delete_message(&self, message: &MessageId) -> StoreResult<()>;

    /// File a content report about a conversation, or about one message
    /// in it when `message` is set.
    async fn report_conversation(
        &self,
        conversation: &ConversationId,
        reason: ReportReason,
        description: &str,
        message: Option<MessageId>,
    ) -> StoreResult<()>;
}

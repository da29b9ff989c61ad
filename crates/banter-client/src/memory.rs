//! In-memory chat store for demos and tests.
//!
//! Behaves like a connected backend from the UI's side: sends become
//! visible messages immediately and every change fans out on the event
//! stream. Remote traffic (other participants' messages and typing
//! signals) is injected through the `push_*` helpers.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::conversation::{Conversation, ConversationId};
use crate::message::{ChatMessage, MessageId, OutgoingAttachment, User};
use crate::report::ReportReason;
use crate::store::{ChatEvent, ChatStore, StoreError, StoreResult};
use crate::typing::TypingIndicator;

/// Capacity of the event fan-out channel
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// A content report captured by the store
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRecord {
    /// Conversation the report is about
    pub conversation_id: ConversationId,
    /// Selected reason
    pub reason: ReportReason,
    /// Trimmed description text
    pub description: String,
    /// Specific message, if the report targeted one
    pub message_id: Option<MessageId>,
}

/// In-memory [`ChatStore`] backed by process-local state
pub struct MemoryStore {
    local_user: User,
    conversations: DashMap<ConversationId, Conversation>,
    messages: DashMap<ConversationId, Vec<ChatMessage>>,
    /// Read cursor per conversation: how many messages the local user
    /// has seen from the front of the list
    read_cursors: DashMap<ConversationId, usize>,
    /// Last typing signal sent per conversation, for inspection
    typing_outbound: DashMap<ConversationId, bool>,
    reports: Mutex<Vec<ReportRecord>>,
    next_id: AtomicU64,
    events: broadcast::Sender<ChatEvent>,
}

impl MemoryStore {
    /// Create an empty store for the given local user
    pub fn new(local_user: User) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            local_user,
            conversations: DashMap::new(),
            messages: DashMap::new(),
            read_cursors: DashMap::new(),
            typing_outbound: DashMap::new(),
            reports: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            events,
        }
    }

    /// The user this store acts as
    pub fn local_user(&self) -> &User {
        &self.local_user
    }

    /// Seed a conversation
    pub fn add_conversation(&self, conversation: Conversation) {
        self.messages
            .entry(conversation.id.clone())
            .or_default();
        self.read_cursors.entry(conversation.id.clone()).or_insert(0);
        self.conversations
            .insert(conversation.id.clone(), conversation);
    }

    /// Inject a message from a remote participant.
    ///
    /// Counts as unread until the local user marks the conversation read.
    pub fn push_incoming(
        &self,
        conversation: &ConversationId,
        author: User,
        body: &str,
    ) -> StoreResult<MessageId> {
        let message = self.append(conversation, author, body, Vec::new())?;
        let id = message.id.clone();
        let _ = self.events.send(ChatEvent::MessageAdded(message));
        Ok(id)
    }

    /// Inject a remote typing signal
    pub fn push_typing(&self, indicator: TypingIndicator) {
        let _ = self.events.send(ChatEvent::Typing(indicator));
    }

    /// Reports filed so far, oldest first
    pub fn reports(&self) -> Vec<ReportRecord> {
        self.reports.lock().unwrap().clone()
    }

    /// Last typing signal sent for a conversation, if any
    pub fn last_typing_signal(&self, conversation: &ConversationId) -> Option<bool> {
        self.typing_outbound.get(conversation).map(|v| *v)
    }

    fn next_message_id(&self) -> MessageId {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        MessageId::new(format!("m-{n}"))
    }

    /// Append a message to a conversation and return a snapshot of it
    fn append(
        &self,
        conversation: &ConversationId,
        author: User,
        body: &str,
        attachments: Vec<crate::message::AttachmentMeta>,
    ) -> StoreResult<ChatMessage> {
        let mut list = self
            .messages
            .get_mut(conversation)
            .ok_or_else(|| StoreError::ConversationNotFound(conversation.clone()))?;
        let message = ChatMessage::new(
            self.next_message_id(),
            conversation.clone(),
            author,
            body,
            Utc::now(),
        )
        .with_attachments(attachments);
        list.push(message.clone());
        Ok(message)
    }

    /// Which conversation holds this message
    fn locate(&self, message: &MessageId) -> Option<ConversationId> {
        self.messages.iter().find_map(|entry| {
            entry
                .value()
                .iter()
                .any(|m| &m.id == message)
                .then(|| entry.key().clone())
        })
    }

    /// Run a mutation against one message and return its updated snapshot.
    ///
    /// The closure returns whether it changed anything; unchanged
    /// messages produce no snapshot so callers can skip the event.
    fn with_message<F>(&self, message: &MessageId, mutate: F) -> StoreResult<Option<ChatMessage>>
    where
        F: FnOnce(&mut ChatMessage) -> StoreResult<bool>,
    {
        let conversation = self
            .locate(message)
            .ok_or_else(|| StoreError::MessageNotFound(message.clone()))?;
        let mut list = self
            .messages
            .get_mut(&conversation)
            .ok_or_else(|| StoreError::ConversationNotFound(conversation.clone()))?;
        let slot = list
            .iter_mut()
            .find(|m| &m.id == message)
            .ok_or_else(|| StoreError::MessageNotFound(message.clone()))?;
        let changed = mutate(slot)?;
        Ok(changed.then(|| slot.clone()))
    }
}

#[async_trait]
impl ChatStore for MemoryStore {
    async fn conversations(&self) -> StoreResult<Vec<Conversation>> {
        let mut list: Vec<Conversation> = self
            .conversations
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(list)
    }

    async fn messages(&self, conversation: &ConversationId) -> StoreResult<Vec<ChatMessage>> {
        self.messages
            .get(conversation)
            .map(|list| list.clone())
            .ok_or_else(|| StoreError::ConversationNotFound(conversation.clone()))
    }

    fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    async fn send_message(
        &self,
        conversation: &ConversationId,
        text: &str,
        attachments: Vec<OutgoingAttachment>,
    ) -> StoreResult<MessageId> {
        let metas = attachments.into_iter().map(|a| a.meta).collect();
        let message = self.append(conversation, self.local_user.clone(), text, metas)?;

        // Your own sends never count as unread
        if let Some(list) = self.messages.get(conversation) {
            self.read_cursors.insert(conversation.clone(), list.len());
        }

        let id = message.id.clone();
        debug!(%conversation, message = %id, "message sent");
        let _ = self.events.send(ChatEvent::MessageAdded(message));
        Ok(id)
    }

    async fn set_typing(&self, conversation: &ConversationId, is_typing: bool) -> StoreResult<()> {
        if !self.conversations.contains_key(conversation) {
            return Err(StoreError::ConversationNotFound(conversation.clone()));
        }
        // A backend forwards this to the other participants; nothing
        // comes back on the local event stream.
        self.typing_outbound.insert(conversation.clone(), is_typing);
        debug!(%conversation, is_typing, "typing signal");
        Ok(())
    }

    async fn mark_as_read(&self, conversation: &ConversationId) -> StoreResult<()> {
        let list = self
            .messages
            .get(conversation)
            .ok_or_else(|| StoreError::ConversationNotFound(conversation.clone()))?;
        self.read_cursors.insert(conversation.clone(), list.len());
        Ok(())
    }

    async fn unread_count(&self, conversation: &ConversationId) -> StoreResult<u32> {
        let list = self
            .messages
            .get(conversation)
            .ok_or_else(|| StoreError::ConversationNotFound(conversation.clone()))?;
        let seen = self
            .read_cursors
            .get(conversation)
            .map(|c| *c)
            .unwrap_or(0);
        Ok(list.len().saturating_sub(seen) as u32)
    }

    async fn add_reaction(&self, message: &MessageId, emoji: &str) -> StoreResult<()> {
        let user = self.local_user.id.clone();
        let updated = self.with_message(message, |m| Ok(m.add_reaction(&user, emoji)))?;
        if let Some(snapshot) = updated {
            let _ = self.events.send(ChatEvent::ReactionsChanged(snapshot));
        }
        Ok(())
    }

    async fn remove_reaction(&self, message: &MessageId, emoji: &str) -> StoreResult<()> {
        let user = self.local_user.id.clone();
        let updated = self.with_message(message, |m| Ok(m.remove_reaction(&user, emoji)))?;
        if let Some(snapshot) = updated {
            let _ = self.events.send(ChatEvent::ReactionsChanged(snapshot));
        }
        Ok(())
    }

    async fn edit_message(&self, message: &MessageId, new_body: &str) -> StoreResult<()> {
        let user = self.local_user.id.clone();
        let updated = self.with_message(message, |m| {
            if m.author.id != user {
                return Err(StoreError::NotAuthor(m.id.clone()));
            }
            Ok(m.edit(new_body))
        })?;
        if let Some(snapshot) = updated {
            let _ = self.events.send(ChatEvent::MessageEdited(snapshot));
        }
        Ok(())
    }

    async fn delete_message(&self, message: &MessageId) -> StoreResult<()> {
        let user = self.local_user.id.clone();
        let updated = self.with_message(message, |m| {
            if m.author.id != user {
                return Err(StoreError::NotAuthor(m.id.clone()));
            }
            Ok(m.delete())
        })?;
        if let Some(snapshot) = updated {
            let _ = self.events.send(ChatEvent::MessageDeleted {
                conversation_id: snapshot.conversation_id,
                message_id: snapshot.id,
            });
        }
        Ok(())
    }

    async fn report_conversation(
        &self,
        conversation: &ConversationId,
        reason: ReportReason,
        description: &str,
        message: Option<MessageId>,
    ) -> StoreResult<()> {
        if !self.conversations.contains_key(conversation) {
            return Err(StoreError::ConversationNotFound(conversation.clone()));
        }
        info!(%conversation, %reason, "content report filed");
        self.reports.lock().unwrap().push(ReportRecord {
            conversation_id: conversation.clone(),
            reason,
            description: description.trim().to_string(),
            message_id: message,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::UserId;
    use tokio::sync::broadcast::error::TryRecvError;

    fn make_store() -> MemoryStore {
        let store = MemoryStore::new(User::new("u-local", "Ada"));
        store.add_conversation(Conversation::new(
            "conv-1",
            "Team channel",
            vec![
                User::new("u-local", "Ada"),
                User::new("u-bob", "Bob"),
            ],
        ));
        store
    }

    fn conv() -> ConversationId {
        ConversationId::from("conv-1")
    }

    #[tokio::test]
    async fn test_send_appends_and_emits() {
        let store = make_store();
        let mut events = store.subscribe();

        let id = store
            .send_message(&conv(), "hello", Vec::new())
            .await
            .unwrap();

        let messages = store.messages(&conv()).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, id);
        assert_eq!(messages[0].body, "hello");
        assert_eq!(messages[0].author.id, UserId::from("u-local"));

        match events.try_recv().unwrap() {
            ChatEvent::MessageAdded(msg) => assert_eq!(msg.id, id),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unread_and_mark_as_read() {
        let store = make_store();
        let bob = User::new("u-bob", "Bob");

        store.push_incoming(&conv(), bob.clone(), "one").unwrap();
        store.push_incoming(&conv(), bob, "two").unwrap();
        assert_eq!(store.unread_count(&conv()).await.unwrap(), 2);

        store.mark_as_read(&conv()).await.unwrap();
        assert_eq!(store.unread_count(&conv()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_own_sends_are_already_read() {
        let store = make_store();

        store
            .send_message(&conv(), "from me", Vec::new())
            .await
            .unwrap();
        assert_eq!(store.unread_count(&conv()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reaction_toggle_emits_once() {
        let store = make_store();
        let id = store
            .send_message(&conv(), "react to me", Vec::new())
            .await
            .unwrap();
        let mut events = store.subscribe();

        store.add_reaction(&id, "👍").await.unwrap();
        match events.try_recv().unwrap() {
            ChatEvent::ReactionsChanged(msg) => {
                assert!(msg.has_reaction(&UserId::from("u-local"), "👍"));
            }
            other => panic!("unexpected event: {other:?}"),
        }

        // Duplicate reaction changes nothing and emits nothing
        store.add_reaction(&id, "👍").await.unwrap();
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

        store.remove_reaction(&id, "👍").await.unwrap();
        match events.try_recv().unwrap() {
            ChatEvent::ReactionsChanged(msg) => assert!(msg.reactions.is_empty()),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_edit_requires_author() {
        let store = make_store();
        let theirs = store
            .push_incoming(&conv(), User::new("u-bob", "Bob"), "their message")
            .unwrap();

        let err = store.edit_message(&theirs, "hijacked").await.unwrap_err();
        assert!(matches!(err, StoreError::NotAuthor(_)));

        let mine = store
            .send_message(&conv(), "my message", Vec::new())
            .await
            .unwrap();
        store.edit_message(&mine, "my message, fixed").await.unwrap();

        let messages = store.messages(&conv()).await.unwrap();
        let edited = messages.iter().find(|m| m.id == mine).unwrap();
        assert_eq!(edited.body, "my message, fixed");
        assert!(edited.edited);
    }

    #[tokio::test]
    async fn test_delete_leaves_tombstone() {
        let store = make_store();
        let mine = store
            .send_message(&conv(), "delete me", Vec::new())
            .await
            .unwrap();
        let mut events = store.subscribe();

        store.delete_message(&mine).await.unwrap();

        let messages = store.messages(&conv()).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].deleted);
        assert!(messages[0].body.is_empty());

        match events.try_recv().unwrap() {
            ChatEvent::MessageDeleted { message_id, .. } => assert_eq!(message_id, mine),
            other => panic!("unexpected event: {other:?}"),
        }

        // Cannot delete someone else's message
        let theirs = store
            .push_incoming(&conv(), User::new("u-bob", "Bob"), "not yours")
            .unwrap();
        let err = store.delete_message(&theirs).await.unwrap_err();
        assert!(matches!(err, StoreError::NotAuthor(_)));
    }

    #[tokio::test]
    async fn test_set_typing_does_not_echo_locally() {
        let store = make_store();
        let mut events = store.subscribe();

        store.set_typing(&conv(), true).await.unwrap();
        assert_eq!(store.last_typing_signal(&conv()), Some(true));
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

        store.set_typing(&conv(), false).await.unwrap();
        assert_eq!(store.last_typing_signal(&conv()), Some(false));
    }

    #[tokio::test]
    async fn test_push_typing_reaches_subscribers() {
        let store = make_store();
        let mut events = store.subscribe();

        store.push_typing(TypingIndicator::started("conv-1", "u-bob", "Bob"));

        match events.try_recv().unwrap() {
            ChatEvent::Typing(indicator) => {
                assert_eq!(indicator.user_name, "Bob");
                assert!(indicator.is_typing);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_report_recorded() {
        let store = make_store();
        let id = store
            .send_message(&conv(), "questionable", Vec::new())
            .await
            .unwrap();

        store
            .report_conversation(&conv(), ReportReason::Spam, "  same link, ten times  ", Some(id.clone()))
            .await
            .unwrap();

        let reports = store.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].reason, ReportReason::Spam);
        assert_eq!(reports[0].description, "same link, ten times");
        assert_eq!(reports[0].message_id, Some(id));
    }

    #[tokio::test]
    async fn test_unknown_conversation() {
        let store = make_store();
        let missing = ConversationId::from("conv-404");

        assert!(matches!(
            store.messages(&missing).await.unwrap_err(),
            StoreError::ConversationNotFound(_)
        ));
        assert!(matches!(
            store.send_message(&missing, "hi", Vec::new()).await.unwrap_err(),
            StoreError::ConversationNotFound(_)
        ));
        assert!(matches!(
            store.set_typing(&missing, true).await.unwrap_err(),
            StoreError::ConversationNotFound(_)
        ));
    }
}

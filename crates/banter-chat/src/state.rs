//! Shared chat state using Dioxus signals.

use std::sync::Arc;

use banter_client::{AttachmentPolicy, ChatStore, ConversationId, MessageId, User};
use chrono::{DateTime, Utc};
use dioxus::prelude::*;

/// Shareable handle to the chat store.
///
/// Trait objects don't compare, but signal and prop types must, so
/// equality here is pointer identity: two handles are equal when they
/// wrap the same store.
#[derive(Clone)]
pub struct StoreHandle(pub Arc<dyn ChatStore>);

impl StoreHandle {
    /// Wrap a store for use in signals and props
    pub fn new(store: Arc<dyn ChatStore>) -> Self {
        Self(store)
    }
}

impl PartialEq for StoreHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle").finish_non_exhaustive()
    }
}

/// What the open report dialog is about
#[derive(Clone, Debug, PartialEq)]
pub struct ReportTarget {
    /// Conversation being reported
    pub conversation_id: ConversationId,
    /// Specific message, when the report started from a bubble action
    pub message_id: Option<MessageId>,
}

/// Shared chat state provided via Dioxus context.
#[derive(Clone, Copy)]
pub struct ChatContext {
    pub store: Signal<StoreHandle>,
    pub local_user: Signal<User>,
    pub attachment_policy: Signal<AttachmentPolicy>,
    pub active_conversation: Signal<Option<ConversationId>>,
    pub conversations: Signal<Vec<ConversationSummary>>,
    /// Open report dialog target, if any.
    pub report_target: Signal<Option<ReportTarget>>,
}

/// Summary of a conversation for the sidebar.
#[derive(Clone, Debug, PartialEq)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub title: String,
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub unread_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use banter_client::MemoryStore;

    #[test]
    fn test_store_handle_equality_is_pointer_identity() {
        let a = StoreHandle::new(Arc::new(MemoryStore::new(User::new("u-1", "Ada"))));
        let b = a.clone();
        let c = StoreHandle::new(Arc::new(MemoryStore::new(User::new("u-1", "Ada"))));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}

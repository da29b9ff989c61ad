//! Remote typing indicator payload

use serde::{Deserialize, Serialize};

use crate::conversation::ConversationId;
use crate::message::UserId;

/// A participant starting or stopping composing in a conversation.
///
/// Delivered through the store's event stream and consumed for display
/// only. Stop signals can go missing (crashed client, dropped
/// connection), so the UI also ages indicators out on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypingIndicator {
    /// Conversation being composed in
    pub conversation_id: ConversationId,
    /// Who is composing
    pub user_id: UserId,
    /// Display name for the indicator line
    pub user_name: String,
    /// True when composing started, false when it stopped
    pub is_typing: bool,
}

impl TypingIndicator {
    /// A started-composing signal
    pub fn started(
        conversation_id: impl Into<ConversationId>,
        user_id: impl Into<UserId>,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            user_id: user_id.into(),
            user_name: user_name.into(),
            is_typing: true,
        }
    }

    /// A stopped-composing signal
    pub fn stopped(
        conversation_id: impl Into<ConversationId>,
        user_id: impl Into<UserId>,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            user_id: user_id.into(),
            user_name: user_name.into(),
            is_typing: false,
        }
    }
}

//! Content report drafts and client-side validation.
//!
//! A report is composed in the report dialog and checked here before it
//! goes anywhere near the store. Reports target a conversation, and
//! optionally a single message within it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conversation::ConversationId;
use crate::message::MessageId;

/// Longest accepted description, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 1000;

/// Why a conversation or message is being reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    /// Unsolicited or repetitive content
    Spam,
    /// Targeted abuse of a participant
    Harassment,
    /// Content that violates the rules
    InappropriateContent,
    /// Anything else; requires a description
    Other,
}

impl ReportReason {
    /// All reasons, in the order the dialog lists them
    pub const ALL: [ReportReason; 4] = [
        ReportReason::Spam,
        ReportReason::Harassment,
        ReportReason::InappropriateContent,
        ReportReason::Other,
    ];

    /// Stable wire name for the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportReason::Spam => "spam",
            ReportReason::Harassment => "harassment",
            ReportReason::InappropriateContent => "inappropriate_content",
            ReportReason::Other => "other",
        }
    }

    /// Human-readable label for the dialog
    pub fn label(&self) -> &'static str {
        match self {
            ReportReason::Spam => "Spam",
            ReportReason::Harassment => "Harassment",
            ReportReason::InappropriateContent => "Inappropriate content",
            ReportReason::Other => "Something else",
        }
    }

    /// Parse a wire name back into a reason
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == s)
    }

    /// Whether this reason is too vague to stand on its own
    pub fn requires_description(&self) -> bool {
        matches!(self, ReportReason::Other)
    }
}

impl std::fmt::Display for ReportReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validation failures for a report draft
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// "Something else" reports must say what happened
    #[error("please describe what happened")]
    DescriptionRequired,
    /// Description over the length cap
    #[error("description is too long: {len} characters (max {max})")]
    DescriptionTooLong { len: usize, max: usize },
}

/// A report being composed in the dialog
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    /// Conversation the report is about
    pub conversation_id: ConversationId,
    /// Selected reason
    pub reason: ReportReason,
    /// Free-text description; required when the reason is `Other`
    pub description: String,
    /// Specific message, when the report started from a message action
    pub message_id: Option<MessageId>,
}

impl ReportDraft {
    /// Start a draft about a conversation
    pub fn new(conversation_id: impl Into<ConversationId>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            reason: ReportReason::Spam,
            description: String::new(),
            message_id: None,
        }
    }

    /// Start a draft about a single message
    pub fn for_message(
        conversation_id: impl Into<ConversationId>,
        message_id: impl Into<MessageId>,
    ) -> Self {
        Self {
            message_id: Some(message_id.into()),
            ..Self::new(conversation_id)
        }
    }

    /// Check the draft before submission.
    ///
    /// Whitespace-only descriptions count as empty. A draft that fails
    /// here never reaches the store.
    pub fn validate(&self) -> Result<(), ReportError> {
        let description = self.description.trim();
        if self.reason.requires_description() && description.is_empty() {
            return Err(ReportError::DescriptionRequired);
        }
        let len = description.chars().count();
        if len > MAX_DESCRIPTION_CHARS {
            return Err(ReportError::DescriptionTooLong {
                len,
                max: MAX_DESCRIPTION_CHARS,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_requires_description() {
        let mut draft = ReportDraft::new("conv-1");
        draft.reason = ReportReason::Other;

        assert_eq!(draft.validate(), Err(ReportError::DescriptionRequired));

        draft.description = "They keep posting the same link".to_string();
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn test_whitespace_description_counts_as_empty() {
        let mut draft = ReportDraft::new("conv-1");
        draft.reason = ReportReason::Other;
        draft.description = "   \n\t ".to_string();

        assert_eq!(draft.validate(), Err(ReportError::DescriptionRequired));
    }

    #[test]
    fn test_named_reasons_allow_empty_description() {
        for reason in [
            ReportReason::Spam,
            ReportReason::Harassment,
            ReportReason::InappropriateContent,
        ] {
            let mut draft = ReportDraft::new("conv-1");
            draft.reason = reason;
            assert_eq!(draft.validate(), Ok(()), "{reason} should not need text");
        }
    }

    #[test]
    fn test_description_length_cap() {
        let mut draft = ReportDraft::new("conv-1");
        draft.description = "x".repeat(MAX_DESCRIPTION_CHARS);
        assert_eq!(draft.validate(), Ok(()));

        draft.description.push('x');
        assert_eq!(
            draft.validate(),
            Err(ReportError::DescriptionTooLong {
                len: MAX_DESCRIPTION_CHARS + 1,
                max: MAX_DESCRIPTION_CHARS,
            })
        );
    }

    #[test]
    fn test_for_message_keeps_target() {
        let draft = ReportDraft::for_message("conv-1", "msg-9");
        assert_eq!(draft.message_id, Some(MessageId::from("msg-9")));
        assert_eq!(draft.conversation_id, ConversationId::from("conv-1"));
    }

    #[test]
    fn test_reason_wire_names_round_trip() {
        for reason in ReportReason::ALL {
            assert_eq!(ReportReason::parse(reason.as_str()), Some(reason));
        }
        assert_eq!(ReportReason::parse("bogus"), None);
    }
}

//! # Banter Client
//!
//! Store contract and domain types for the Banter chat UI.
//!
//! The crate defines what the presentation layer needs from a chat
//! backend without committing to one: a [`ChatStore`] trait covering
//! sends, typing signals, read cursors, reactions, edits, deletions,
//! and content reports, plus the value types those operations move
//! around. Client-side validation (attachment limits, report drafts)
//! lives here so the UI can reject bad input before it reaches the
//! store.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use banter_client::{ChatStore, MemoryStore, User};
//!
//! let store = Arc::new(MemoryStore::new(User::new("u-1", "Ada")));
//! let mut events = store.subscribe();
//!
//! let conversation = store.conversations().await?.remove(0).id;
//! store.send_message(&conversation, "Hello!", Vec::new()).await?;
//!
//! while let Ok(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! ```

pub mod attachment;
pub mod conversation;
pub mod memory;
pub mod message;
pub mod report;
pub mod store;
pub mod typing;

// Re-exports
pub use attachment::{AttachmentError, AttachmentPolicy};
pub use conversation::{Conversation, ConversationId};
pub use memory::MemoryStore;
pub use message::{
    AttachmentMeta, ChatMessage, MessageId, OutgoingAttachment, User, UserId,
};
pub use report::{ReportDraft, ReportError, ReportReason};
pub use store::{ChatEvent, ChatStore, StoreError, StoreResult};
pub use typing::TypingIndicator;

//! UI components for the chat feature.

pub mod app;
pub mod attachments;
pub mod composer;
pub mod conversation;
pub mod message_bubble;
pub mod report_dialog;
pub mod sidebar;
pub mod typing_indicator;

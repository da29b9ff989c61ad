//! Banter Chat — desktop chat UI library.
//!
//! Re-exports components, shared state, and the typing lifecycle for
//! embedding in host apps.

pub mod components;
pub mod format;
pub mod state;
pub mod typing;

/// Chat-specific CSS for embedding in host apps.
pub const CHAT_CSS: &str = include_str!("style.css");

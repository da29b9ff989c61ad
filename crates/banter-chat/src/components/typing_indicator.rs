//! Typing indicator line under the conversation title.

use dioxus::prelude::*;

/// Derive the indicator text from who is composing right now.
/// Returns `None` when nobody is.
pub fn typing_label(names: &[String]) -> Option<String> {
    match names {
        [] => None,
        [a] => Some(format!("{a} is typing...")),
        [a, b] => Some(format!("{a} and {b} are typing...")),
        _ => Some("Several people are typing...".to_string()),
    }
}

/// Typing indicator component.
#[component]
pub fn TypingIndicatorLine(names: Vec<String>) -> Element {
    match typing_label(&names) {
        Some(label) => rsx! {
            div { class: "typing-indicator", "{label}" }
        },
        None => rsx! {},
    }
}

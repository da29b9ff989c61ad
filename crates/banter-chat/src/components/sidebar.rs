//! Sidebar — conversation list with unread badges.

use dioxus::prelude::*;

use crate::format::format_time;
use crate::state::ChatContext;

/// Sidebar component showing conversations.
#[component]
pub fn Sidebar() -> Element {
    let mut ctx = use_context::<ChatContext>();
    let conversations = ctx.conversations.read().clone();
    let active = ctx.active_conversation.read().clone();
    let local_name = ctx.local_user.read().name.clone();

    rsx! {
        div { class: "sidebar",
            // Identity section
            div { class: "sidebar-identity",
                div { class: "sidebar-identity-name", "{local_name}" }
            }

            div { class: "sidebar-header",
                div { class: "sidebar-title", "Chats" }
            }

            // Conversation list
            div { class: "sidebar-conversations",
                if conversations.is_empty() {
                    div { class: "sidebar-empty", "No conversations yet." }
                } else {
                    for convo in conversations.iter() {
                        {
                            let id = convo.id.clone();
                            let is_active = active.as_ref() == Some(&id);
                            let item_class = if is_active {
                                "conversation-item active"
                            } else {
                                "conversation-item"
                            };
                            let initial = convo.title.chars().next()
                                .unwrap_or('?').to_uppercase().to_string();
                            let preview = convo.last_message.clone()
                                .unwrap_or_else(|| "No messages yet".to_string());
                            let time_str = convo.last_message_at
                                .map(format_time)
                                .unwrap_or_default();
                            let unread = convo.unread_count;
                            let title = convo.title.clone();

                            rsx! {
                                div {
                                    key: "{id}",
                                    class: "{item_class}",
                                    onclick: move |_| {
                                        ctx.active_conversation.set(Some(id.clone()));
                                    },
                                    div { class: "conversation-avatar", "{initial}" }
                                    div { class: "conversation-info",
                                        div { class: "conversation-name", "{title}" }
                                        div { class: "conversation-preview", "{preview}" }
                                    }
                                    div { class: "conversation-meta",
                                        div { class: "conversation-time", "{time_str}" }
                                        if unread > 0 {
                                            div { class: "unread-badge", "{unread}" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

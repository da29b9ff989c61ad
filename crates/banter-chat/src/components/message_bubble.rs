//! Individual message bubble: body, attachments, reactions, actions.

use banter_client::{ChatMessage, MessageId};
use dioxus::prelude::*;

use crate::format::{format_time, human_size};
use crate::state::ChatContext;

/// One-click reactions offered on every bubble
const QUICK_REACTIONS: [&str; 4] = ["👍", "❤", "😂", "🎉"];

/// Message bubble component.
///
/// Deleted messages render as a tombstone with no actions. While
/// `is_editing` is set the body is replaced by an edit box; the parent
/// decides which bubble (at most one) is in that state.
#[component]
pub fn MessageBubble(
    message: ChatMessage,
    is_mine: bool,
    #[props(default = false)] is_editing: bool,
    on_toggle_reaction: EventHandler<(MessageId, String)>,
    on_edit_start: EventHandler<MessageId>,
    on_edit_submit: EventHandler<(MessageId, String)>,
    on_edit_cancel: EventHandler<()>,
    on_delete: EventHandler<MessageId>,
    on_report: EventHandler<MessageId>,
) -> Element {
    let ctx = use_context::<ChatContext>();
    let local_user_id = ctx.local_user.read().id.clone();
    let mut edit_text = use_signal(String::new);

    let bubble_class = if is_mine {
        "message-bubble mine"
    } else {
        "message-bubble theirs"
    };

    if message.deleted {
        return rsx! {
            div { class: "{bubble_class}",
                div { class: "message-deleted", "This message was deleted" }
            }
        };
    }

    // Per-closure copies; the prop itself stays borrowed by the markup
    let edit_id = message.id.clone();
    let edit_body = message.body.clone();
    let submit_id = message.id.clone();
    let save_id = message.id.clone();
    let delete_id = message.id.clone();
    let report_id = message.id.clone();

    rsx! {
        div { class: "{bubble_class}",
            if !is_mine {
                div { class: "message-author", "{message.author.name}" }
            }

            // Body or edit box
            if is_editing {
                div { class: "message-edit",
                    textarea {
                        class: "message-edit-input",
                        value: "{edit_text}",
                        oninput: move |evt| edit_text.set(evt.value()),
                        onkeydown: move |evt: KeyboardEvent| {
                            if evt.key() == Key::Enter && !evt.modifiers().shift() {
                                evt.prevent_default();
                                let text = edit_text.read().trim().to_string();
                                if !text.is_empty() {
                                    on_edit_submit.call((submit_id.clone(), text));
                                }
                            } else if evt.key() == Key::Escape {
                                on_edit_cancel.call(());
                            }
                        },
                    }
                    div { class: "message-edit-buttons",
                        button {
                            class: "edit-save",
                            disabled: edit_text.read().trim().is_empty(),
                            onclick: move |_| {
                                let text = edit_text.read().trim().to_string();
                                if !text.is_empty() {
                                    on_edit_submit.call((save_id.clone(), text));
                                }
                            },
                            "Save"
                        }
                        button {
                            class: "edit-cancel",
                            onclick: move |_| on_edit_cancel.call(()),
                            "Cancel"
                        }
                    }
                }
            } else {
                div { class: "message-content", "{message.body}" }
            }

            // Attachments
            if !message.attachments.is_empty() {
                div { class: "message-attachments",
                    for meta in message.attachments.iter() {
                        div { class: "attachment-chip", key: "{meta.name}",
                            span { class: "attachment-name", "📎 {meta.name}" }
                            span { class: "attachment-size", {human_size(meta.size)} }
                        }
                    }
                }
            }

            // Reactions
            if !message.reactions.is_empty() {
                div { class: "message-reactions",
                    for (emoji, count) in message.reaction_counts() {
                        {
                            let mine = message.has_reaction(&local_user_id, &emoji);
                            let pill_class = if mine { "reaction-pill mine" } else { "reaction-pill" };
                            let pill_id = message.id.clone();
                            let pill_emoji = emoji.clone();
                            rsx! {
                                button {
                                    key: "{emoji}",
                                    class: "{pill_class}",
                                    onclick: move |_| {
                                        on_toggle_reaction.call((pill_id.clone(), pill_emoji.clone()));
                                    },
                                    "{emoji} {count}"
                                }
                            }
                        }
                    }
                }
            }

            // Meta: edited marker + time
            div { class: "message-meta",
                if message.edited {
                    span { class: "message-edited", "edited" }
                }
                span { class: "message-time", {format_time(message.sent_at)} }
            }

            // Hover actions
            if !is_editing {
                div { class: "message-actions",
                    for emoji in QUICK_REACTIONS {
                        {
                            let quick_id = message.id.clone();
                            rsx! {
                                button {
                                    key: "{emoji}",
                                    class: "action-button",
                                    title: "React",
                                    onclick: move |_| {
                                        on_toggle_reaction.call((quick_id.clone(), emoji.to_string()));
                                    },
                                    "{emoji}"
                                }
                            }
                        }
                    }
                    if is_mine {
                        button {
                            class: "action-button",
                            title: "Edit",
                            onclick: move |_| {
                                edit_text.set(edit_body.clone());
                                on_edit_start.call(edit_id.clone());
                            },
                            "✏"
                        }
                        button {
                            class: "action-button",
                            title: "Delete",
                            onclick: move |_| on_delete.call(delete_id.clone()),
                            "🗑"
                        }
                    } else {
                        button {
                            class: "action-button",
                            title: "Report",
                            onclick: move |_| on_report.call(report_id.clone()),
                            "⚑"
                        }
                    }
                }
            }
        }
    }
}

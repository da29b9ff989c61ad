//! Compose bar: draft text, staged attachments, send.

use banter_client::OutgoingAttachment;
use dioxus::prelude::*;

use crate::state::ChatContext;

/// Message composer component.
///
/// `on_typing` fires on every input event with the draft as it now
/// reads; the typing session upstream decides what that means. A send
/// needs text or at least one attachment.
#[component]
pub fn Composer(
    on_send: EventHandler<(String, Vec<OutgoingAttachment>)>,
    on_typing: EventHandler<String>,
) -> Element {
    let ctx = use_context::<ChatContext>();
    let mut text = use_signal(String::new);
    let mut pending = use_signal(Vec::<OutgoingAttachment>::new);
    let mut attach_error = use_signal(|| None::<String>);

    let can_send = !text.read().trim().is_empty() || !pending.read().is_empty();

    rsx! {
        div { class: "composer",
            if let Some(ref err) = *attach_error.read() {
                div { class: "attach-error", "{err}" }
            }

            super::attachments::AttachmentTray {
                pending: pending.read().clone(),
                on_remove: move |index: usize| {
                    pending.write().remove(index);
                    attach_error.set(None);
                },
            }

            div { class: "composer-bar",
                button {
                    class: "attach-button",
                    title: "Attach files",
                    onclick: move |_| {
                        let policy = ctx.attachment_policy.read().clone();
                        let staged = pending.read().len();
                        spawn(async move {
                            match super::attachments::pick_attachments(&policy, staged).await {
                                Ok(batch) if batch.is_empty() => {}
                                Ok(mut batch) => {
                                    pending.write().append(&mut batch);
                                    attach_error.set(None);
                                }
                                Err(err) => attach_error.set(Some(err.to_string())),
                            }
                        });
                    },
                    "📎"
                }
                textarea {
                    class: "composer-input",
                    placeholder: "Write a message...",
                    value: "{text}",
                    oninput: move |evt| {
                        let value = evt.value();
                        text.set(value.clone());
                        on_typing.call(value);
                    },
                    onkeydown: move |evt: KeyboardEvent| {
                        if evt.key() == Key::Enter && !evt.modifiers().shift() && can_send {
                            evt.prevent_default();
                            let body = text.read().trim().to_string();
                            let files = pending.read().clone();
                            text.set(String::new());
                            pending.set(Vec::new());
                            attach_error.set(None);
                            on_send.call((body, files));
                        }
                    },
                }
                button {
                    class: "send-button",
                    disabled: !can_send,
                    onclick: move |_| {
                        if can_send {
                            let body = text.read().trim().to_string();
                            let files = pending.read().clone();
                            text.set(String::new());
                            pending.set(Vec::new());
                            attach_error.set(None);
                            on_send.call((body, files));
                        }
                    },
                    "➤"
                }
            }
        }
    }
}

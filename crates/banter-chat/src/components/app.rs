//! Root chat layout with shared context.

use banter_client::{AttachmentPolicy, ChatEvent, ChatMessage, User};
use dioxus::prelude::*;
use tokio::sync::broadcast::error::RecvError;

use crate::format::preview;
use crate::state::{ChatContext, ConversationSummary, StoreHandle};

/// How many characters of the last message the sidebar shows
const PREVIEW_CHARS: usize = 50;

/// Embeddable chat layout: provides the shared context and renders the
/// sidebar, the conversation window, and the report dialog overlay.
#[component]
pub fn ChatLayout(store: StoreHandle, local_user: User) -> Element {
    let ctx = use_context_provider(|| ChatContext {
        store: Signal::new(store.clone()),
        local_user: Signal::new(local_user.clone()),
        attachment_policy: Signal::new(AttachmentPolicy::default()),
        active_conversation: Signal::new(None),
        conversations: Signal::new(Vec::new()),
        report_target: Signal::new(None),
    });

    // Populate the sidebar, then keep it fresh as message events arrive.
    let store_for_effect = store.clone();
    use_effect(move || {
        let store = store_for_effect.clone();
        spawn(async move {
            // Subscribe first so events during the initial load are not
            // missed; a refresh is a full rebuild anyway.
            let mut events = store.0.subscribe();
            refresh_summaries(&store, ctx.conversations).await;

            loop {
                match events.recv().await {
                    Ok(ChatEvent::Typing(_)) => {}
                    Ok(_) => refresh_summaries(&store, ctx.conversations).await,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "sidebar event stream lagged");
                        refresh_summaries(&store, ctx.conversations).await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
    });

    rsx! {
        div { class: "chat-layout",
            super::sidebar::Sidebar {}
            super::conversation::ConversationView {}

            if ctx.report_target.read().is_some() {
                super::report_dialog::ReportDialog {}
            }
        }
    }
}

/// Rebuild the sidebar summaries from the store.
pub(crate) async fn refresh_summaries(
    store: &StoreHandle,
    mut summaries: Signal<Vec<ConversationSummary>>,
) {
    let conversations = match store.0.conversations().await {
        Ok(list) => list,
        Err(err) => {
            tracing::warn!(%err, "failed to load conversations");
            return;
        }
    };

    let mut items = Vec::new();
    for conversation in conversations {
        let (last_message, last_message_at) = match store.0.messages(&conversation.id).await {
            Ok(messages) => match messages.iter().rev().find(|m| !m.deleted) {
                Some(msg) => (Some(describe_last(msg)), Some(msg.sent_at)),
                None => (None, None),
            },
            Err(_) => (None, None),
        };
        let unread_count = store.0.unread_count(&conversation.id).await.unwrap_or(0);

        items.push(ConversationSummary {
            id: conversation.id,
            title: conversation.title,
            last_message,
            last_message_at,
            unread_count,
        });
    }

    // Most recent activity first
    items.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
    summaries.set(items);
}

/// One-line preview of a message for the sidebar
fn describe_last(msg: &ChatMessage) -> String {
    if msg.body.is_empty() && !msg.attachments.is_empty() {
        return match msg.attachments.len() {
            1 => format!("📎 {}", msg.attachments[0].name),
            n => format!("📎 {n} files"),
        };
    }
    preview(&msg.body, PREVIEW_CHARS)
}

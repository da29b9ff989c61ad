//! Conversation window: header, message list, composer.

use std::sync::Arc;
use std::time::Duration;

use banter_client::{
    ChatEvent, ChatMessage, ConversationId, MessageId, OutgoingAttachment, TypingIndicator, UserId,
};
use dioxus::prelude::*;
use tokio::sync::broadcast::error::RecvError;

use crate::state::{ChatContext, ReportTarget, StoreHandle};
use crate::typing::TypingSession;

/// How long a remote typing indicator stays up without a stop signal
const TYPING_DISMISS: Duration = Duration::from_secs(5);

/// Conversation window — empty state or the active conversation.
#[component]
pub fn ConversationView() -> Element {
    let ctx = use_context::<ChatContext>();
    let active = ctx.active_conversation.read().clone();

    match active {
        None => rsx! {
            div { class: "conversation",
                div { class: "conversation-empty",
                    div { class: "conversation-empty-icon", "💬" }
                    div { class: "conversation-empty-text", "Select a conversation to start chatting" }
                }
            }
        },
        // A keyed list entry is replaced wholesale when the id changes:
        // fresh subscription and typing session, drop on the old one. A
        // lone keyed child would only re-render in place with the new
        // prop, keeping the old conversation's state alive.
        Some(id) => rsx! {
            for id in std::iter::once(id) {
                ActiveConversation { key: "{id}", conversation_id: id.clone() }
            }
        },
    }
}

/// The open conversation.
#[component]
fn ActiveConversation(conversation_id: ConversationId) -> Element {
    let mut ctx = use_context::<ChatContext>();
    let store = ctx.store.read().clone();
    let local_user_id = ctx.local_user.read().id.clone();

    let mut messages = use_signal(Vec::<ChatMessage>::new);
    let mut title = use_signal(|| "Conversation".to_string());
    let mut banner = use_signal(|| None::<String>);
    let mut editing = use_signal(|| None::<MessageId>);
    // Who is typing here right now. View-local: a conversation switch
    // replaces the scope, so the roster starts empty.
    let typing_users = use_signal(Vec::<TypingEntry>::new);

    // Typing lifecycle owned by this view. Unmount (switching away or
    // closing) must flush an owed stop signal.
    let session_store = store.0.clone();
    let session_conversation = conversation_id.clone();
    let typing = use_hook(move || {
        Arc::new(TypingSession::new(session_store, session_conversation))
    });
    {
        let typing = typing.clone();
        use_drop(move || typing.close());
    }

    // Load the snapshot, mark it read, then follow the event stream.
    let event_store = store.clone();
    let event_conversation = conversation_id.clone();
    let event_local = local_user_id.clone();
    use_effect(move || {
        let store = event_store.clone();
        let conversation_id = event_conversation.clone();
        let local_user_id = event_local.clone();
        let conversations = ctx.conversations;

        spawn(async move {
            // Subscribe before the snapshot so nothing lands between the
            // two; anything already in the snapshot is deduplicated on
            // arrival.
            let mut events = store.0.subscribe();

            match store.0.conversations().await {
                Ok(list) => {
                    if let Some(conversation) =
                        list.into_iter().find(|c| c.id == conversation_id)
                    {
                        title.set(conversation.title);
                    }
                }
                Err(err) => tracing::warn!(%err, "failed to load conversation list"),
            }

            match store.0.messages(&conversation_id).await {
                Ok(snapshot) => messages.set(snapshot),
                Err(err) => {
                    banner.set(Some(format!("Failed to load messages: {err}")));
                    return;
                }
            }

            // Opening the conversation reads everything in it
            if let Err(err) = store.0.mark_as_read(&conversation_id).await {
                tracing::debug!(%err, "mark_as_read failed");
            }
            super::app::refresh_summaries(&store, conversations).await;

            loop {
                match events.recv().await {
                    Ok(event) => {
                        apply_event(
                            event,
                            &store,
                            &conversation_id,
                            &local_user_id,
                            messages,
                            typing_users,
                        )
                        .await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event stream lagged; reloading snapshot");
                        if let Ok(snapshot) = store.0.messages(&conversation_id).await {
                            messages.set(snapshot);
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
    });

    let current_messages = messages.read().clone();
    let current_title = title.read().clone();
    let initial = current_title
        .chars()
        .next()
        .unwrap_or('?')
        .to_uppercase()
        .to_string();
    let editing_id = editing.read().clone();
    let typing_names: Vec<String> = typing_users
        .read()
        .iter()
        .map(|entry| entry.name.clone())
        .collect();

    let header_report_conversation = conversation_id.clone();
    let send_store = store.clone();
    let send_conversation = conversation_id.clone();
    let typing_for_send = typing.clone();
    let typing_for_input = typing.clone();

    rsx! {
        div { class: "conversation",
            // Header
            div { class: "conversation-header",
                div { class: "conversation-avatar", "{initial}" }
                div { class: "conversation-heading",
                    div { class: "conversation-title", "{current_title}" }
                    super::typing_indicator::TypingIndicatorLine { names: typing_names }
                }
                button {
                    class: "report-button",
                    title: "Report conversation",
                    onclick: move |_| {
                        ctx.report_target.set(Some(ReportTarget {
                            conversation_id: header_report_conversation.clone(),
                            message_id: None,
                        }));
                    },
                    "⚑"
                }
            }

            // Messages
            div { class: "conversation-messages",
                for msg in current_messages.iter() {
                    {
                        let is_mine = msg.author.id == local_user_id;
                        let is_editing = editing_id.as_ref() == Some(&msg.id);
                        let reaction_store = store.clone();
                        let reaction_local = local_user_id.clone();
                        let edit_store = store.clone();
                        let delete_store = store.clone();
                        let report_conversation = conversation_id.clone();

                        rsx! {
                            super::message_bubble::MessageBubble {
                                key: "{msg.id}",
                                message: msg.clone(),
                                is_mine,
                                is_editing,
                                on_toggle_reaction: move |(id, emoji): (MessageId, String)| {
                                    let store = reaction_store.clone();
                                    let local = reaction_local.clone();
                                    let has = messages.read().iter()
                                        .find(|m| m.id == id)
                                        .is_some_and(|m| m.has_reaction(&local, &emoji));
                                    spawn(async move {
                                        let result = if has {
                                            store.0.remove_reaction(&id, &emoji).await
                                        } else {
                                            store.0.add_reaction(&id, &emoji).await
                                        };
                                        if let Err(err) = result {
                                            banner.set(Some(format!("Reaction failed: {err}")));
                                        }
                                    });
                                },
                                on_edit_start: move |id: MessageId| {
                                    editing.set(Some(id));
                                },
                                on_edit_submit: move |(id, body): (MessageId, String)| {
                                    editing.set(None);
                                    let store = edit_store.clone();
                                    spawn(async move {
                                        if let Err(err) = store.0.edit_message(&id, &body).await {
                                            banner.set(Some(format!("Edit failed: {err}")));
                                        }
                                    });
                                },
                                on_edit_cancel: move |_| {
                                    editing.set(None);
                                },
                                on_delete: move |id: MessageId| {
                                    let store = delete_store.clone();
                                    spawn(async move {
                                        if let Err(err) = store.0.delete_message(&id).await {
                                            banner.set(Some(format!("Delete failed: {err}")));
                                        }
                                    });
                                },
                                on_report: move |id: MessageId| {
                                    ctx.report_target.set(Some(ReportTarget {
                                        conversation_id: report_conversation.clone(),
                                        message_id: Some(id),
                                    }));
                                },
                            }
                        }
                    }
                }
            }

            // Best-effort error line
            if let Some(ref err) = *banner.read() {
                div { class: "banner-error", "{err}" }
            }

            // Composer
            super::composer::Composer {
                on_send: move |(body, files): (String, Vec<OutgoingAttachment>)| {
                    // Sending ends composing on the spot
                    typing_for_send.message_sent();
                    banner.set(None);
                    let store = send_store.clone();
                    let conversation = send_conversation.clone();
                    spawn(async move {
                        if let Err(err) = store.0.send_message(&conversation, &body, files).await {
                            banner.set(Some(format!("Send failed: {err}")));
                        }
                    });
                },
                on_typing: move |draft: String| {
                    typing_for_input.keystroke(&draft);
                },
            }
        }
    }
}

/// Fold one store event into the view's signals.
async fn apply_event(
    event: ChatEvent,
    store: &StoreHandle,
    conversation: &ConversationId,
    local_user: &UserId,
    mut messages: Signal<Vec<ChatMessage>>,
    typing_users: Signal<Vec<TypingEntry>>,
) {
    match event {
        ChatEvent::MessageAdded(msg) if msg.conversation_id == *conversation => {
            {
                let mut list = messages.write();
                if list.iter().all(|m| m.id != msg.id) {
                    list.push(msg);
                }
            }
            // The window is open, so whatever just arrived is seen
            if let Err(err) = store.0.mark_as_read(conversation).await {
                tracing::debug!(%err, "mark_as_read failed");
            }
        }
        ChatEvent::MessageEdited(msg) | ChatEvent::ReactionsChanged(msg)
            if msg.conversation_id == *conversation =>
        {
            let mut list = messages.write();
            if let Some(slot) = list.iter_mut().find(|m| m.id == msg.id) {
                *slot = msg;
            }
        }
        ChatEvent::MessageDeleted {
            conversation_id,
            message_id,
        } if conversation_id == *conversation => {
            let mut list = messages.write();
            if let Some(slot) = list.iter_mut().find(|m| m.id == message_id) {
                slot.delete();
            }
        }
        ChatEvent::Typing(indicator) => {
            apply_typing(indicator, conversation, local_user, typing_users);
        }
        _ => {}
    }
}

/// One remote participant shown in the typing roster.
#[derive(Clone, Debug, PartialEq)]
struct TypingEntry {
    name: String,
    /// Bumped on every refreshing start signal. A dismiss timer fires
    /// only when its generation is still current.
    generation: u64,
}

/// Update the typing roster from a remote indicator.
fn apply_typing(
    indicator: TypingIndicator,
    conversation: &ConversationId,
    local_user: &UserId,
    mut typing_users: Signal<Vec<TypingEntry>>,
) {
    // Only the active conversation's roster, and never our own echo
    if indicator.conversation_id != *conversation || indicator.user_id == *local_user {
        return;
    }

    if indicator.is_typing {
        let name = indicator.user_name;
        let generation = roster_start(&mut typing_users.write(), &name);
        // Age the entry out if the stop signal never arrives. The timer
        // checks its generation first, so a refreshed entry is not
        // dropped by a timer armed before the refresh.
        spawn(async move {
            tokio::time::sleep(TYPING_DISMISS).await;
            roster_expire(&mut typing_users.write(), &name, generation);
        });
    } else {
        roster_stop(&mut typing_users.write(), &indicator.user_name);
    }
}

/// Record a typing start. Returns the generation the dismiss timer for
/// this signal has to match.
fn roster_start(roster: &mut Vec<TypingEntry>, name: &str) -> u64 {
    match roster.iter_mut().find(|entry| entry.name == name) {
        Some(entry) => {
            entry.generation += 1;
            entry.generation
        }
        None => {
            roster.push(TypingEntry {
                name: name.to_string(),
                generation: 0,
            });
            0
        }
    }
}

/// Drop a participant on an explicit stop signal.
fn roster_stop(roster: &mut Vec<TypingEntry>, name: &str) {
    roster.retain(|entry| entry.name != name);
}

/// Drop a participant whose dismiss timer fired, unless a newer start
/// signal refreshed the entry in the meantime.
fn roster_expire(roster: &mut Vec<TypingEntry>, name: &str, generation: u64) {
    roster.retain(|entry| entry.name != name || entry.generation != generation);
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use dioxus::dioxus_core::NoOpMutations;
    use dioxus::prelude::*;

    use super::{roster_expire, roster_start, roster_stop};

    #[test]
    fn test_typing_start_then_stop_updates_roster() {
        let mut roster = Vec::new();
        roster_start(&mut roster, "Bob");
        roster_start(&mut roster, "Carol");
        assert_eq!(roster.len(), 2);

        roster_stop(&mut roster, "Bob");
        let names: Vec<&str> = roster.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Carol"]);
    }

    #[test]
    fn test_repeated_start_refreshes_without_duplicating() {
        let mut roster = Vec::new();
        let first = roster_start(&mut roster, "Bob");
        let second = roster_start(&mut roster, "Bob");

        assert_eq!(roster.len(), 1);
        assert_ne!(first, second);
    }

    #[test]
    fn test_stale_timer_does_not_drop_refreshed_entry() {
        let mut roster = Vec::new();
        let first = roster_start(&mut roster, "Bob");
        let second = roster_start(&mut roster, "Bob");

        // The timer armed by the first signal fires after the refresh
        roster_expire(&mut roster, "Bob", first);
        assert_eq!(roster.len(), 1);

        roster_expire(&mut roster, "Bob", second);
        assert!(roster.is_empty());
    }

    #[test]
    fn test_expiry_leaves_other_participants_alone() {
        let mut roster = Vec::new();
        let bob = roster_start(&mut roster, "Bob");
        roster_start(&mut roster, "Carol");

        roster_expire(&mut roster, "Bob", bob);
        let names: Vec<&str> = roster.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Carol"]);
    }

    static STAGE: AtomicUsize = AtomicUsize::new(0);
    static LIFECYCLE: Mutex<Vec<String>> = Mutex::new(Vec::new());

    #[component]
    fn Panel(room: String) -> Element {
        use_hook({
            let room = room.clone();
            move || LIFECYCLE.lock().unwrap().push(format!("open {room}"))
        });
        use_drop({
            let room = room.clone();
            move || LIFECYCLE.lock().unwrap().push(format!("close {room}"))
        });
        rsx! {
            div { "{room}" }
        }
    }

    #[component]
    fn Host() -> Element {
        let rooms = ["conv-a", "conv-b"];
        let room = rooms[STAGE.load(Ordering::SeqCst)];
        rsx! {
            for room in std::iter::once(room) {
                Panel { key: "{room}", room: room.to_string() }
            }
        }
    }

    // Switching the key must tear down the old scope (running use_drop,
    // which is what closes the typing session) and build a fresh one,
    // not re-render the old scope in place with a new prop.
    #[test]
    fn test_key_switch_replaces_component_scope() {
        let mut dom = VirtualDom::new(Host);
        dom.rebuild_in_place();
        assert_eq!(*LIFECYCLE.lock().unwrap(), ["open conv-a"]);

        STAGE.store(1, Ordering::SeqCst);
        dom.mark_dirty(ScopeId::APP);
        dom.render_immediate(&mut NoOpMutations);

        let log = LIFECYCLE.lock().unwrap();
        assert!(
            log.contains(&"close conv-a".to_string()),
            "stale scope survived the switch: {log:?}"
        );
        assert!(
            log.contains(&"open conv-b".to_string()),
            "no fresh scope after the switch: {log:?}"
        );
    }
}

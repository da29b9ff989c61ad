//! Entry point for the Banter desktop app.

use std::sync::Arc;
use std::time::Duration;

use banter_client::{Conversation, ConversationId, MemoryStore, TypingIndicator, User};
use dioxus::desktop::{Config, LogicalPosition, LogicalSize, WindowBuilder};
use dioxus::prelude::*;

mod components;
mod format;
mod state;
mod typing;

const CHAT_CSS: &str = include_str!("style.css");

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("banter_chat=info,banter_client=info")
        .init();

    let name = std::env::var("BANTER_NAME").ok();

    let window_title = match &name {
        Some(n) => format!("Banter - {}", n),
        None => "Banter".to_string(),
    };

    tracing::info!("Starting {}", window_title);

    // Read optional window geometry from env (handy for tiling test windows)
    let win_x = std::env::var("BANTER_WIN_X").ok().and_then(|v| v.parse::<f64>().ok());
    let win_y = std::env::var("BANTER_WIN_Y").ok().and_then(|v| v.parse::<f64>().ok());
    let win_w = std::env::var("BANTER_WIN_W").ok().and_then(|v| v.parse::<f64>().ok());
    let win_h = std::env::var("BANTER_WIN_H").ok().and_then(|v| v.parse::<f64>().ok());

    let mut wb = WindowBuilder::new()
        .with_title(&window_title)
        .with_maximized(false);

    if let (Some(w), Some(h)) = (win_w, win_h) {
        wb = wb.with_inner_size(LogicalSize::new(w, h));
    } else {
        wb = wb.with_inner_size(LogicalSize::new(900.0, 600.0));
    }

    if let (Some(x), Some(y)) = (win_x, win_y) {
        wb = wb.with_position(LogicalPosition::new(x, y));
    }

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            Config::new()
                .with_window(wb)
                .with_custom_head(format!(
                    r#"<style>{}</style>"#,
                    CHAT_CSS,
                )),
        )
        .launch(App);
}

/// Demo app: the chat UI wired to an in-memory store with scripted
/// remote traffic.
#[component]
fn App() -> Element {
    let store = use_hook(demo_store);
    let local_user = store.local_user().clone();

    {
        let store = store.clone();
        use_hook(move || {
            spawn(async move {
                demo_traffic(store).await;
            });
        });
    }

    rsx! {
        components::app::ChatLayout {
            store: state::StoreHandle::new(store),
            local_user,
        }
    }
}

fn demo_store() -> Arc<MemoryStore> {
    let name = std::env::var("BANTER_NAME").unwrap_or_else(|_| "Ada".to_string());
    let local = User::new("u-local", name);
    let bob = User::new("u-bob", "Bob");
    let carol = User::new("u-carol", "Carol");

    let store = MemoryStore::new(local.clone());
    store.add_conversation(Conversation::new(
        "conv-bob",
        "Bob",
        vec![local.clone(), bob.clone()],
    ));
    store.add_conversation(Conversation::new(
        "conv-design",
        "Design team",
        vec![local, bob.clone(), carol.clone()],
    ));

    let design = ConversationId::from("conv-design");
    let _ = store.push_incoming(&design, bob.clone(), "Morning! New mockups are ready");
    let _ = store.push_incoming(&design, carol, "Nice, the dark palette works");
    let _ = store.push_incoming(&ConversationId::from("conv-bob"), bob, "Lunch later?");

    Arc::new(store)
}

/// Scripted remote activity so a fresh window has something moving.
async fn demo_traffic(store: Arc<MemoryStore>) {
    let design = ConversationId::from("conv-design");
    let bob = User::new("u-bob", "Bob");

    tokio::time::sleep(Duration::from_secs(4)).await;
    store.push_typing(TypingIndicator::started("conv-design", "u-bob", "Bob"));

    tokio::time::sleep(Duration::from_millis(2500)).await;
    store.push_typing(TypingIndicator::stopped("conv-design", "u-bob", "Bob"));
    let _ = store.push_incoming(&design, bob, "Uploading the final sketches now");
}

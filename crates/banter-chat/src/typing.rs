//! Local typing lifecycle for the active conversation.
//!
//! Tracks whether the local user is composing and turns raw keystrokes
//! into debounced store signals: one start when composing begins, one
//! stop when it ends. Ends are inactivity, sending a message, or the
//! view going away. Keystrokes while already composing only push the
//! inactivity deadline out; they never re-emit.
//!
//! Signals are fire-and-forget. A failed emission is logged and the
//! session keeps its local state, so a flaky store can never wedge the
//! composer.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use banter_client::{ChatStore, ConversationId};
use tokio::time::Instant;
use tracing::debug;

/// Inactivity window after the last keystroke before the stop signal fires
pub const TYPING_IDLE_TIMEOUT: Duration = Duration::from_millis(2000);

/// Composition state of the local user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingState {
    /// Not composing; nothing outstanding
    Idle,
    /// Composing; a stop signal is owed
    Typing,
}

/// State shared with the armed timer task
#[derive(Debug)]
struct SessionInner {
    state: TypingState,
    /// Bumped on every keystroke, send, and close. A timer task only
    /// fires if the generation it captured is still current, which is
    /// what "resetting the timer" means here.
    generation: u64,
    last_keystroke: Option<Instant>,
}

/// Typing lifecycle for one conversation.
///
/// Owned by the active conversation view: created on mount, fed from
/// the composer's input events, and closed when the view unmounts or
/// switches conversations. Cheap to share behind an `Arc`.
pub struct TypingSession {
    store: Arc<dyn ChatStore>,
    conversation: ConversationId,
    idle_timeout: Duration,
    inner: Arc<Mutex<SessionInner>>,
}

impl TypingSession {
    /// Create a session with the default inactivity window
    pub fn new(store: Arc<dyn ChatStore>, conversation: ConversationId) -> Self {
        Self::with_idle_timeout(store, conversation, TYPING_IDLE_TIMEOUT)
    }

    /// Create a session with a custom inactivity window
    pub fn with_idle_timeout(
        store: Arc<dyn ChatStore>,
        conversation: ConversationId,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            store,
            conversation,
            idle_timeout,
            inner: Arc::new(Mutex::new(SessionInner {
                state: TypingState::Idle,
                generation: 0,
                last_keystroke: None,
            })),
        }
    }

    /// The conversation this session signals for
    pub fn conversation(&self) -> &ConversationId {
        &self.conversation
    }

    /// Whether the session currently considers the local user typing
    pub fn is_typing(&self) -> bool {
        self.inner.lock().unwrap().state == TypingState::Typing
    }

    /// When the last counted keystroke happened, if composing
    pub fn last_keystroke(&self) -> Option<Instant> {
        self.inner.lock().unwrap().last_keystroke
    }

    /// Record a keystroke with the draft text as it now reads.
    ///
    /// An empty draft never starts composing. When composing starts,
    /// one start signal is emitted; further keystrokes only re-arm the
    /// inactivity timer.
    pub fn keystroke(&self, draft: &str) {
        let mut inner = self.inner.lock().unwrap();
        let started = match inner.state {
            TypingState::Idle => {
                if draft.is_empty() {
                    return;
                }
                inner.state = TypingState::Typing;
                true
            }
            TypingState::Typing => false,
        };
        inner.generation += 1;
        inner.last_keystroke = Some(Instant::now());
        let generation = inner.generation;
        drop(inner);

        if started {
            self.emit(true);
        }
        self.arm_timer(generation);
    }

    /// Note that a message was just sent.
    ///
    /// Sending ends composing on the spot: the pending timer is
    /// cancelled and the stop signal goes out immediately.
    pub fn message_sent(&self) {
        self.stop_now();
    }

    /// Close the session (view unmount or conversation switch).
    ///
    /// Emits the stop signal if one is owed; otherwise does nothing.
    pub fn close(&self) {
        self.stop_now();
    }

    fn stop_now(&self) {
        let mut inner = self.inner.lock().unwrap();
        // Invalidate any armed timer
        inner.generation += 1;
        inner.last_keystroke = None;
        let was_typing = inner.state == TypingState::Typing;
        inner.state = TypingState::Idle;
        drop(inner);

        if was_typing {
            self.emit(false);
        }
    }

    /// Arm the inactivity timer for the given generation. A newer
    /// generation at expiry means the timer was reset or cancelled.
    fn arm_timer(&self, generation: u64) {
        let inner = Arc::clone(&self.inner);
        let store = Arc::clone(&self.store);
        let conversation = self.conversation.clone();
        let idle_timeout = self.idle_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(idle_timeout).await;
            {
                let mut guard = inner.lock().unwrap();
                if guard.generation != generation || guard.state != TypingState::Typing {
                    return;
                }
                guard.state = TypingState::Idle;
                guard.last_keystroke = None;
            }
            if let Err(err) = store.set_typing(&conversation, false).await {
                debug!(%conversation, %err, "typing stop signal failed");
            }
        });
    }

    fn emit(&self, is_typing: bool) {
        let store = Arc::clone(&self.store);
        let conversation = self.conversation.clone();
        tokio::spawn(async move {
            if let Err(err) = store.set_typing(&conversation, is_typing).await {
                debug!(%conversation, is_typing, %err, "typing signal failed");
            }
        });
    }
}

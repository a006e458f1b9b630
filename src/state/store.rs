use std::collections::HashMap;
use std::sync::Mutex;

use super::session::SessionState;

/// Per-conversation session states keyed by chat id.
///
/// Each conversation's state is only mutated by that conversation's own
/// event handling, so a plain mutex around the map is enough; no state
/// crosses chat boundaries.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<i64, SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the chat's session, creating an empty one first
    /// if this is the chat's first interaction.
    pub fn update<R>(&self, chat_id: i64, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut sessions = self.sessions.lock().unwrap();
        f(sessions.entry(chat_id).or_default())
    }

    /// Clone of the chat's current session (empty if never seen).
    pub fn get(&self, chat_id: i64) -> SessionState {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.entry(chat_id).or_default().clone()
    }

    /// Full reset for one chat, as on /start.
    pub fn clear(&self, chat_id: i64) {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert(chat_id, SessionState::default());
    }
}

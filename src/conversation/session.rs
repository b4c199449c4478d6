use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;

use super::state::ConversationState;
use crate::db::UserId;

pub type SessionSlot = Arc<AsyncMutex<ConversationState>>;

/// Current dialog state per user.
///
/// The outer lock only guards the map; a turn holds the per-user slot for its
/// whole duration, so turns for one user never interleave.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<UserId, SessionSlot>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the user's slot and whether it was created by this call.
    pub fn get_or_create(&self, user: UserId) -> (SessionSlot, bool) {
        let mut sessions = self.sessions.lock();
        if let Some(slot) = sessions.get(&user) {
            return (Arc::clone(slot), false);
        }

        let slot = Arc::new(AsyncMutex::new(ConversationState::Default));
        sessions.insert(user, Arc::clone(&slot));
        (slot, true)
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

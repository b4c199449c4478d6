//! Conversation - per-user dialog driving the add-word and quiz flows
//!
//! Each inbound input is handled by the user's current [`ConversationState`],
//! which yields the next state; the next state renders the outbound prompt.

pub mod session;
pub mod state;

use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{RecordStore, UserId};
use crate::lexicon::WordCatalog;
use crate::services::scheduler::DEFAULT_HALF_LIFE_HOURS;
use crate::services::{Scheduler, SchedulerError, SequenceError};

pub use session::SessionStore;
pub use state::{ConversationState, Transition};

pub const START_COMMAND: &str = "/start";

/// What the transport should show the user after a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderDirective {
    pub prompt: String,
    pub choices: Vec<String>,
    pub notices: Vec<String>,
}

/// Faults that abort a turn. Bad input and catalog misses never end up here.
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

/// Collaborators available to a state while it handles one input.
pub struct TurnContext<'a, S> {
    pub scheduler: Scheduler<'a, S>,
    pub catalog: &'a dyn WordCatalog,
}

pub struct Conversation<S> {
    store: S,
    catalog: Arc<dyn WordCatalog>,
    sessions: SessionStore,
    default_half_life: Duration,
}

impl<S: RecordStore> Conversation<S> {
    pub fn new(store: S, catalog: Arc<dyn WordCatalog>) -> Self {
        Self {
            store,
            catalog,
            sessions: SessionStore::new(),
            default_half_life: Duration::hours(DEFAULT_HALF_LIFE_HOURS),
        }
    }

    pub fn with_default_half_life(mut self, half_life: Duration) -> Self {
        self.default_half_life = half_life;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Runs one turn for `user`.
    ///
    /// The first input from an unknown user and `/start` both land on the
    /// menu without being interpreted. A fatal error resets the user to the
    /// menu before it is returned.
    pub async fn advance(
        &self,
        user: UserId,
        raw_input: &str,
    ) -> Result<RenderDirective, ConversationError> {
        let input = raw_input.trim();
        let (slot, created) = self.sessions.get_or_create(user);
        let mut current = slot.lock().await;

        if created || input == START_COMMAND {
            *current = ConversationState::Default;
            return Ok(current.render(Vec::new()));
        }

        let ctx = TurnContext {
            scheduler: Scheduler::new(&self.store, user)
                .with_default_half_life(self.default_half_life),
            catalog: self.catalog.as_ref(),
        };

        let from = current.name();
        let state = std::mem::take(&mut *current);
        match state.handle(input, &ctx).await {
            Ok(Transition { next, notices }) => {
                tracing::debug!(user_id = user, from, to = next.name(), "conversation turn");
                let directive = next.render(notices);
                *current = next;
                Ok(directive)
            }
            Err(err) => {
                tracing::error!(user_id = user, from, error = %err, "conversation turn failed");
                Err(err)
            }
        }
    }

    /// Resets `user` to the menu.
    pub async fn start(&self, user: UserId) -> RenderDirective {
        let (slot, _) = self.sessions.get_or_create(user);
        let mut current = slot.lock().await;
        *current = ConversationState::Default;
        current.render(Vec::new())
    }
}

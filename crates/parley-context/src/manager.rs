use std::sync::Arc;

use tracing::{debug, warn};

use parley_core::types::Turn;

use crate::error::Result;
use crate::store::ContextStore;

/// Per-chat conversation history with a bounded replay buffer.
///
/// Persistence is enabled only when a store is present AND `depth > 0`;
/// otherwise every operation behaves as if the history were empty and
/// appended turns are discarded after use.
///
/// Concurrency note: there is deliberately no locking around the store.
/// Two commands racing on the same chat key interleave their
/// load/append/persist sequences with last-write-wins overwrite semantics,
/// so one of the user turns can be lost. Accepted behavior, not a bug.
pub struct ContextManager {
    store: Option<Arc<dyn ContextStore>>,
    depth: i64,
}

impl ContextManager {
    pub fn new(store: Option<Arc<dyn ContextStore>>, depth: i64) -> Self {
        Self { store, depth }
    }

    /// Whether histories survive past a single invocation.
    pub fn persistence_enabled(&self) -> bool {
        self.depth > 0 && self.store.is_some()
    }

    /// Upper bound on a loaded history: `max(1, 2 * depth)` turns.
    fn cap(&self) -> usize {
        std::cmp::max(1, self.depth.saturating_mul(2)) as usize
    }

    /// Load the history for a chat key, trimmed to the cap.
    ///
    /// Returns the empty sequence when persistence is disabled, when the key
    /// is absent, or when the stored record fails to decode.
    pub fn load(&self, chat_key: &str) -> Result<Vec<Turn>> {
        let Some(store) = self.enabled_store() else {
            return Ok(Vec::new());
        };

        let mut context: Vec<Turn> = match store.get(chat_key)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(turns) => turns,
                Err(e) => {
                    warn!(chat_key, error = %e, "stored context is undecodable, starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        // FIFO eviction: drop the oldest turns until the cap holds.
        let cap = self.cap();
        if context.len() > cap {
            let excess = context.len() - cap;
            context.drain(..excess);
            debug!(chat_key, dropped = excess, "trimmed context on load");
        }

        Ok(context)
    }

    /// Pure append. Bounding is enforced on `load`, NOT here: a single
    /// request may exceed the cap between the user-turn append and the
    /// assistant-turn append, and only the next load re-trims it.
    pub fn append(context: &mut Vec<Turn>, turn: Turn) {
        context.push(turn);
    }

    /// Full overwrite of the stored history. No-op when persistence is
    /// disabled.
    pub fn persist(&self, chat_key: &str, context: &[Turn]) -> Result<()> {
        let Some(store) = self.enabled_store() else {
            return Ok(());
        };
        store.put(chat_key, &serde_json::to_string(context)?)
    }

    /// Overwrite the stored history with the empty sequence, whether or not
    /// one previously existed. No-op when persistence is disabled.
    pub fn clear(&self, chat_key: &str) -> Result<()> {
        let Some(store) = self.enabled_store() else {
            return Ok(());
        };
        store.put(chat_key, "[]")
    }

    fn enabled_store(&self) -> Option<&dyn ContextStore> {
        if self.depth > 0 {
            self.store.as_deref()
        } else {
            None
        }
    }
}

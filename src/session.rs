//! Sans-IO conversation session state machine.
//!
//! All asynchronous work lives in the engine driver; this type only holds
//! state and decides what to do with results when they arrive. Every
//! asynchronous load is tagged with the generation current when it began,
//! and a completion whose tag no longer matches is discarded
//! unconditionally, so a slow response for an old session can never corrupt
//! the new session's state.

use tracing::{debug, info, warn};

use crate::history::{HistoryOutcome, HistorySource};
use crate::message::{DeliveryState, Message, MessageId, MessageStore};
use crate::resolver::{resolve, DocumentKey, SessionKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Tag issued by `begin_history_load`; checked at apply time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTag {
    generation: u64,
}

/// Whether `apply_route` changed the active identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityChange {
    Unchanged,
    Changed,
}

#[derive(Debug, Default)]
pub struct ConversationSession {
    session_key: Option<SessionKey>,
    document_key: Option<DocumentKey>,
    generation: u64,
    load_state: LoadState,
    store: MessageStore,
    migrated: bool,
    degraded_reason: Option<String>,
}

impl ConversationSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-resolve identity from routing inputs.
    ///
    /// When either key changes the session restarts: the generation bumps
    /// (killing in-flight loads), the message log resets, and load state
    /// returns to Idle so the driver re-fetches history and resources.
    pub fn apply_route(
        &mut self,
        route_param: Option<&str>,
        query_param: Option<&str>,
    ) -> IdentityChange {
        let resolved = resolve(route_param, query_param);
        if resolved.session_key == self.session_key
            && resolved.document_key == self.document_key
        {
            return IdentityChange::Unchanged;
        }

        self.session_key = resolved.session_key;
        self.document_key = resolved.document_key;
        self.generation += 1;
        self.load_state = LoadState::Idle;
        self.store.reset_for_session();
        self.migrated = false;
        self.degraded_reason = None;
        IdentityChange::Changed
    }

    #[must_use]
    pub fn session_key(&self) -> Option<&SessionKey> {
        self.session_key.as_ref()
    }

    #[must_use]
    pub fn document_key(&self) -> Option<&DocumentKey> {
        self.document_key.as_ref()
    }

    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// True when a question can be sent (a session key is active).
    #[must_use]
    pub fn can_send(&self) -> bool {
        self.session_key.is_some()
    }

    /// Reason the last history load degraded, for display.
    #[must_use]
    pub fn degraded_reason(&self) -> Option<&str> {
        self.degraded_reason.as_deref()
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        self.store.all()
    }

    /// Mark a history load as started and tag it with the current
    /// generation.
    pub fn begin_history_load(&mut self) -> LoadTag {
        self.load_state = LoadState::Loading;
        LoadTag {
            generation: self.generation,
        }
    }

    /// Apply a finished history load. Returns false when the result was
    /// discarded (stale tag, or live messages already superseded it).
    pub fn apply_history(&mut self, tag: LoadTag, outcome: HistoryOutcome) -> bool {
        if tag.generation != self.generation {
            debug!(
                stale_generation = tag.generation,
                active_generation = self.generation,
                "discarding stale history result"
            );
            return false;
        }

        if let Err(error) = self.store.seed(outcome.entries) {
            // The user started chatting before the (re)load finished; the
            // live log wins over the fetched history.
            warn!(%error, "history result arrived after live appends; keeping live log");
            return false;
        }

        match outcome.source {
            HistorySource::Unavailable { reason } => {
                self.degraded_reason = Some(reason);
                self.load_state = LoadState::Failed;
            }
            _ => {
                self.degraded_reason = None;
                self.load_state = LoadState::Loaded;
            }
        }
        true
    }

    /// Adopt an alternate session key after a successful dispatch fallback.
    ///
    /// One-time and one-directional: repeat requests are ignored, and the
    /// generation bump discards any loads still in flight for the old key.
    pub fn migrate_to(&mut self, alternate: SessionKey) {
        if self.migrated {
            debug!(requested = %alternate, "session already migrated once; ignoring");
            return;
        }
        if self.session_key.as_ref() == Some(&alternate) {
            return;
        }

        info!(
            from = ?self.session_key,
            to = %alternate,
            "migrating session to derived key"
        );
        self.session_key = Some(alternate);
        self.generation += 1;
        self.migrated = true;
    }

    pub fn append_user(&mut self, content: impl Into<String>) -> MessageId {
        self.store.append_user(content).id
    }

    pub fn append_assistant(&mut self, content: impl Into<String>) -> MessageId {
        self.store.append_assistant(content).id
    }

    pub fn append_assistant_failed(&mut self, content: impl Into<String>) -> MessageId {
        self.store.append_assistant_failed(content).id
    }

    pub fn mark_delivery(&mut self, id: MessageId, delivery: DeliveryState) -> bool {
        self.store.mark_delivery(id, delivery)
    }
}

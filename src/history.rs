//! History synchronization for a conversation session.
//!
//! Loading never fails: every backend outcome collapses into an outcome the
//! caller can seed the message store from. The three synthesized states use
//! distinct texts on purpose: "no session yet", "session exists but is
//! empty", and "history unreachable" are different situations and tests
//! tell them apart by content.

use std::sync::Arc;

use tracing::warn;

use crate::backend::DocumentBackend;
use crate::message::{display_timestamp, MessageSeed};
use crate::resolver::SessionKey;

/// Greeting shown when no session key is resolvable yet.
pub const WELCOME_TEXT: &str =
    "Hello! Upload a document or open an existing chat, and I'll answer questions about it.";

/// Shown for a session with zero persisted interactions.
pub const EMPTY_HISTORY_TEXT: &str =
    "This conversation is empty so far. Ask a question below to get started.";

/// Shown when the backend could not deliver saved history.
pub const HISTORY_UNAVAILABLE_TEXT: &str =
    "I couldn't load your saved conversation, but I'm ready for new questions.";

/// Where the initial message list came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistorySource {
    /// No session key; nothing was fetched.
    NoSession,
    /// Persisted interactions were loaded.
    Loaded,
    /// The session exists but holds no interactions yet.
    Empty,
    /// The backend call failed; degraded but usable.
    Unavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryOutcome {
    pub source: HistorySource,
    pub entries: Vec<MessageSeed>,
}

/// Fetches persisted history and produces the initial message list.
pub struct HistorySynchronizer {
    backend: Arc<dyn DocumentBackend>,
}

impl HistorySynchronizer {
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self { backend }
    }

    /// Load history for a session key.
    ///
    /// `None` short-circuits to a welcome entry without touching the
    /// backend. Each fetched interaction expands to exactly one user entry
    /// followed by one assistant entry, in server order.
    pub async fn load(&self, session_key: Option<&SessionKey>) -> HistoryOutcome {
        let Some(session_key) = session_key else {
            return HistoryOutcome {
                source: HistorySource::NoSession,
                entries: vec![MessageSeed::assistant(WELCOME_TEXT, display_timestamp())],
            };
        };

        match self.backend.chat_history(session_key).await {
            Ok(interactions) if interactions.is_empty() => HistoryOutcome {
                source: HistorySource::Empty,
                entries: vec![MessageSeed::assistant(
                    EMPTY_HISTORY_TEXT,
                    display_timestamp(),
                )],
            },
            Ok(interactions) => {
                let mut entries = Vec::with_capacity(interactions.len() * 2);
                for interaction in interactions {
                    entries.push(MessageSeed::user(
                        interaction.question,
                        interaction.asked_at.clone(),
                    ));
                    entries.push(MessageSeed::assistant(
                        interaction.answer,
                        interaction.asked_at,
                    ));
                }
                HistoryOutcome {
                    source: HistorySource::Loaded,
                    entries,
                }
            }
            Err(error) => {
                warn!(session_key = %session_key, %error, "history load degraded to placeholder");
                HistoryOutcome {
                    source: HistorySource::Unavailable {
                        reason: error.to_string(),
                    },
                    entries: vec![MessageSeed::assistant(
                        HISTORY_UNAVAILABLE_TEXT,
                        display_timestamp(),
                    )],
                }
            }
        }
    }
}

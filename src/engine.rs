//! Async driver for one conversation session.
//!
//! The engine owns every await; the session state machine stays sans-IO.
//! All mutation is serialized through `&mut self`, which is the whole
//! cooperative-concurrency story: a document fetch and a history fetch may
//! run concurrently (they touch disjoint state), but no two completions
//! ever interleave partially.

use std::sync::Arc;

use docchat_api::ApiConfig;
use tracing::warn;

use crate::backend::{DocumentBackend, HttpBackend};
use crate::dispatch::{DispatchOutcome, QuestionDispatcher};
use crate::error::ChatError;
use crate::history::HistorySynchronizer;
use crate::message::DeliveryState;
use crate::resource::ResourceLifecycleManager;
use crate::session::{ConversationSession, IdentityChange};

/// Prefix of the assistant placeholder appended when a question fails.
pub const ANSWER_FAILED_PREFIX: &str = "Sorry, I couldn't answer that";

pub struct ChatEngine {
    backend: Arc<dyn DocumentBackend>,
    session: ConversationSession,
    resources: ResourceLifecycleManager,
    history: HistorySynchronizer,
    dispatcher: QuestionDispatcher,
}

impl ChatEngine {
    /// Build an engine over any backend. Context is explicit: there is no
    /// process-wide configuration, each engine carries its own.
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            session: ConversationSession::new(),
            resources: ResourceLifecycleManager::new(),
            history: HistorySynchronizer::new(Arc::clone(&backend)),
            dispatcher: QuestionDispatcher::new(Arc::clone(&backend)),
            backend,
        }
    }

    /// Convenience constructor over the REST backend.
    pub fn from_config(config: ApiConfig) -> Result<Self, ChatError> {
        Ok(Self::new(Arc::new(HttpBackend::new(config)?)))
    }

    #[must_use]
    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    #[must_use]
    pub fn resources(&self) -> &ResourceLifecycleManager {
        &self.resources
    }

    /// Apply routing inputs. On an identity change, restart the history
    /// and document fetches; the two run concurrently and affect disjoint
    /// state, so neither orders before the other.
    pub async fn navigate(&mut self, route_param: Option<&str>, query_param: Option<&str>) {
        if self.session.apply_route(route_param, query_param) == IdentityChange::Unchanged {
            return;
        }

        let history_tag = self.session.begin_history_load();
        let session_key = self.session.session_key().cloned();
        let document_key = self.session.document_key().cloned();

        match document_key {
            Some(key) => {
                let acquire_tag = self.resources.begin_acquire(&key);
                let (outcome, fetched) = tokio::join!(
                    self.history.load(session_key.as_ref()),
                    self.backend.fetch_document(&key)
                );
                self.session.apply_history(history_tag, outcome);
                self.resources.complete_acquire(acquire_tag, fetched);
            }
            None => {
                let outcome = self.history.load(session_key.as_ref()).await;
                self.session.apply_history(history_tag, outcome);
                // No document key: whatever was on display belongs to a
                // previous identity.
                self.resources.teardown();
            }
        }
    }

    /// Reload history for the active session key.
    pub async fn sync_history(&mut self) {
        let tag = self.session.begin_history_load();
        let session_key = self.session.session_key().cloned();
        let outcome = self.history.load(session_key.as_ref()).await;
        self.session.apply_history(tag, outcome);
    }

    /// (Re)fetch the document for the active document key.
    pub async fn open_document(&mut self) {
        let Some(key) = self.session.document_key().cloned() else {
            return;
        };
        let tag = self.resources.begin_acquire(&key);
        let result = self.backend.fetch_document(&key).await;
        self.resources.complete_acquire(tag, result);
    }

    /// Send a question for the active session.
    ///
    /// The user message is appended (Pending) before the network round
    /// trip. Success confirms it and appends the assistant reply, adopting
    /// the fallback key when the dispatcher migrated. Failure marks it
    /// Failed and appends a visible assistant placeholder; the error is
    /// also returned so callers can notify.
    pub async fn send_question(&mut self, question: &str) -> Result<(), ChatError> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(());
        }
        if !self.session.can_send() {
            return Err(ChatError::NoSession);
        }

        let user_id = self.session.append_user(question);
        let primary = self.session.session_key().cloned();
        let document_key = self.session.document_key().cloned();

        match self
            .dispatcher
            .ask(primary.as_ref(), document_key.as_ref(), question)
            .await
        {
            Ok(outcome) => {
                self.session.mark_delivery(user_id, DeliveryState::Confirmed);
                self.session.append_assistant(outcome.answer());
                if let DispatchOutcome::Fallback { migrated_to, .. } = outcome {
                    // Future history loads and dispatches use the migrated
                    // key; the live log is already current, so no reload.
                    self.session.migrate_to(migrated_to);
                }
                Ok(())
            }
            Err(error) => {
                warn!(%error, "question dispatch failed");
                self.session.mark_delivery(user_id, DeliveryState::Failed);
                self.session
                    .append_assistant_failed(format!("{ANSWER_FAILED_PREFIX}: {error}"));
                Err(error)
            }
        }
    }

    /// Release held resources. Pending fetch results arriving afterwards
    /// are discarded.
    pub fn teardown(&mut self) {
        self.resources.teardown();
    }
}

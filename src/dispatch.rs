//! Question dispatch with single-fallback self-healing.
//!
//! The primary session key is whatever the resolver produced. When the
//! backend rejects it, exactly one retry runs against the key
//! derived from the current document key. A fallback success carries a
//! migration target so the session adopts the working key; a fallback
//! failure is terminal for the question but not for the session. There is
//! no retry loop and no backoff.

use std::sync::Arc;

use tracing::{info, warn};

use crate::backend::DocumentBackend;
use crate::error::ChatError;
use crate::resolver::{derive_session_key, DocumentKey, SessionKey};

/// Result of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The primary key worked.
    Primary { answer: String },
    /// The derived alternate worked; the session should migrate to it.
    Fallback {
        answer: String,
        migrated_to: SessionKey,
    },
}

impl DispatchOutcome {
    #[must_use]
    pub fn answer(&self) -> &str {
        match self {
            Self::Primary { answer } | Self::Fallback { answer, .. } => answer,
        }
    }
}

pub struct QuestionDispatcher {
    backend: Arc<dyn DocumentBackend>,
}

impl QuestionDispatcher {
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self { backend }
    }

    /// Send a question for the active session.
    ///
    /// Without a primary key this fails with [`ChatError::NoSession`]
    /// before any network call. Otherwise: try the primary; on failure try
    /// the document-derived alternate at most once, provided it exists and
    /// differs from the primary; surface the original error when no
    /// alternate is available and a generic server error when both fail.
    pub async fn ask(
        &self,
        primary: Option<&SessionKey>,
        document_key: Option<&DocumentKey>,
        question: &str,
    ) -> Result<DispatchOutcome, ChatError> {
        let Some(primary) = primary else {
            return Err(ChatError::NoSession);
        };

        let primary_error = match self.backend.ask_question(primary, question).await {
            Ok(answer) => return Ok(DispatchOutcome::Primary { answer }),
            Err(error) => error,
        };

        let alternate = document_key
            .map(derive_session_key)
            .filter(|alternate| alternate != primary);
        let Some(alternate) = alternate else {
            return Err(primary_error);
        };

        info!(
            primary = %primary,
            alternate = %alternate,
            %primary_error,
            "primary session key rejected; retrying once with derived key"
        );

        match self.backend.ask_question(&alternate, question).await {
            Ok(answer) => Ok(DispatchOutcome::Fallback {
                answer,
                migrated_to: alternate,
            }),
            Err(fallback_error) => {
                warn!(
                    alternate = %alternate,
                    %fallback_error,
                    "fallback session key also rejected"
                );
                Err(ChatError::Server {
                    detail: "the question failed on both the active and the derived session key"
                        .to_string(),
                })
            }
        }
    }
}

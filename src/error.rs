use docchat_api::ApiError;
use thiserror::Error;

/// Failure taxonomy for the session engine.
///
/// Every variant is user-displayable and non-fatal: callers degrade to
/// placeholder content or show a notification, never tear the session down.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// No session identifier could be resolved. Blocks sending only.
    #[error("no active session; upload a document or open an existing chat first")]
    NoSession,

    /// The backend reported the resource or session as absent.
    #[error("{what} was not found on the server")]
    NotFound { what: &'static str },

    /// The backend could not be reached.
    #[error("network problem: {detail}")]
    Transport { detail: String },

    /// The backend answered with a non-recoverable failure.
    #[error("the server could not complete the request: {detail}")]
    Server { detail: String },
}

impl ChatError {
    /// Convert a transport-layer error into the engine taxonomy.
    ///
    /// `what` names the thing being fetched ("document", "chat history",
    /// "answer") for the NotFound message.
    #[must_use]
    pub fn from_api(error: ApiError, what: &'static str) -> Self {
        match error {
            ApiError::Status { status, message } => {
                if status.as_u16() == 404 {
                    Self::NotFound { what }
                } else {
                    Self::Server {
                        detail: format!("{status}: {message}"),
                    }
                }
            }
            ApiError::Request(source) => Self::Transport {
                detail: source.to_string(),
            },
            ApiError::InvalidBaseUrl(value) => Self::Transport {
                detail: format!("invalid base URL: {value}"),
            },
            decode @ ApiError::Decode { .. } => Self::Server {
                detail: decode.to_string(),
            },
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

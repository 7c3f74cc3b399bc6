use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status} {message}")]
    Status { status: StatusCode, message: String },

    #[error("failed to decode {context} response: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Returns the HTTP status for server-reported failures.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

/// FastAPI-style error body: `{"detail": ...}` where detail is usually a
/// string but may be a structured validation payload.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Extract a displayable message from a non-2xx response body.
///
/// Preference order: the `detail` field, then the raw body, then the
/// status canonical reason. The backend does not guarantee a body shape
/// on failure.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(ErrorBody {
        detail: Some(detail),
    }) = serde_json::from_str::<ErrorBody>(body)
    {
        match detail {
            serde_json::Value::String(message) if !message.trim().is_empty() => return message,
            serde_json::Value::Null => {}
            other => return other.to_string(),
        }
    }

    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}

//! Transport-only client for the document question-answering backend.
//!
//! This crate owns request building, response decoding, and error-body
//! parsing for the backend REST surface. It intentionally contains no
//! session-identity or conversation-state logic; that lives in the
//! `docchat` engine crate on top of this one.

pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod url;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::{parse_error_message, ApiError};
pub use payload::{
    AskReply, ChatHistory, ChatIndex, ChatSummary, DeleteReceipt, Interaction, UploadReceipt,
};
pub use url::normalize_base_url;

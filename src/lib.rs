//! Conversation-session engine for chatting with uploaded documents.
//!
//! The engine resolves a stable session key from heterogeneous routing
//! inputs, reconciles it with an independently issued document key, merges
//! persisted history with optimistic local state, and dispatches questions
//! with a single self-healing fallback onto the document-derived key.
//!
//! Layering, bottom up:
//! - [`resolver`]: pure identity resolution (session/document key spaces);
//! - [`message`]: append-only optimistic message log;
//! - [`history`]: persisted-history fetch and placeholder synthesis;
//! - [`resource`]: document binary lifecycle (at most one live display handle);
//! - [`dispatch`]: question send with at most one fallback attempt;
//! - [`session`]: sans-IO state machine with generation-tagged loads;
//! - [`engine`]: async driver owning every await.
//!
//! Transport lives in the `docchat_api` crate; the engine reaches it only
//! through the [`backend::DocumentBackend`] seam.

pub mod backend;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod history;
pub mod message;
pub mod resolver;
pub mod resource;
pub mod session;

pub use backend::{DocumentBackend, HttpBackend};
pub use dispatch::{DispatchOutcome, QuestionDispatcher};
pub use engine::ChatEngine;
pub use error::ChatError;
pub use history::{HistoryOutcome, HistorySource, HistorySynchronizer};
pub use message::{DeliveryState, Message, MessageId, MessageSeed, MessageStore, Role};
pub use resolver::{
    derive_session_key, resolve, DocumentKey, ResolvedIdentity, SessionKey, SESSION_KEY_PREFIX,
};
pub use resource::{CompletedAcquire, DocumentResource, ResourceLifecycleManager};
pub use session::{ConversationSession, IdentityChange, LoadState, LoadTag};

//! Identity resolution for conversation sessions.
//!
//! Session keys and document keys live in independent namespaces and arrive
//! through independent inputs: the session key through the primary route
//! parameter, the document key through a query side channel. Conflating the
//! two is exactly the historical cross-talk bug this module exists to
//! prevent, so the resolver never infers one from the other's input.

use std::fmt;

/// Canonical prefix of locally derived session keys.
///
/// Matches the backend's own construction (`chat_id = "chat_" + pdf_id`).
/// A key without this prefix is treated as server-issued and passed through
/// unmodified.
pub const SESSION_KEY_PREFIX: &str = "chat_";

/// Identifier for one persisted conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when this key carries the canonical local-derivation prefix.
    #[must_use]
    pub fn is_locally_derived(&self) -> bool {
        self.0.starts_with(SESSION_KEY_PREFIX)
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for one uploaded document. Independent namespace from
/// [`SessionKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentKey(String);

impl DocumentKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Output of [`resolve`]: the active session key (if any) and the
/// independently sourced document key (if any).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub session_key: Option<SessionKey>,
    pub document_key: Option<DocumentKey>,
}

/// Derive the canonical session key for a document key.
///
/// Single construction point for locally derived keys; the dispatcher's
/// fallback and the resolver both go through here.
#[must_use]
pub fn derive_session_key(document_key: &DocumentKey) -> SessionKey {
    SessionKey::new(format!("{SESSION_KEY_PREFIX}{document_key}"))
}

/// Resolve session and document identity from routing inputs.
///
/// Resolution order for the session key:
/// 1) a route parameter carrying the canonical prefix is used verbatim;
/// 2) otherwise a present document key derives `chat_` + document key;
/// 3) otherwise there is no session yet (`None`); callers show a neutral
///    no-session state and disable sending, never fail.
///
/// The document key is read from the query input only. Blank or
/// whitespace-only inputs count as absent. A route parameter without the
/// canonical prefix cannot name a session on its own; it is ignored rather
/// than passed into the wrong identifier space.
#[must_use]
pub fn resolve(route_param: Option<&str>, query_param: Option<&str>) -> ResolvedIdentity {
    let route = route_param.map(str::trim).filter(|value| !value.is_empty());
    let query = query_param.map(str::trim).filter(|value| !value.is_empty());

    let document_key = query.map(DocumentKey::new);

    let session_key = match route {
        Some(value) if value.starts_with(SESSION_KEY_PREFIX) => Some(SessionKey::new(value)),
        _ => document_key.as_ref().map(derive_session_key),
    };

    ResolvedIdentity {
        session_key,
        document_key,
    }
}

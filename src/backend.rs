//! Backend seam for the engine.
//!
//! [`DocumentBackend`] is the narrow async contract the engine depends on;
//! [`HttpBackend`] adapts the transport client to it. Tests substitute a
//! scripted implementation, so nothing in the engine touches the network
//! directly.

use async_trait::async_trait;
use docchat_api::{ApiClient, ApiConfig, Interaction};

use crate::error::ChatError;
use crate::resolver::{DocumentKey, SessionKey};

/// The three backend operations the engine core needs.
///
/// Upload and dashboard listing stay on [`ApiClient`]; collaborators invoke
/// them and hand the resulting identity pair to the engine.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Ask a question against a session key, returning the answer text.
    async fn ask_question(
        &self,
        session_key: &SessionKey,
        question: &str,
    ) -> Result<String, ChatError>;

    /// Fetch persisted interactions for a session key, in server order.
    async fn chat_history(
        &self,
        session_key: &SessionKey,
    ) -> Result<Vec<Interaction>, ChatError>;

    /// Fetch the stored document bytes for a document key.
    async fn fetch_document(&self, document_key: &DocumentKey) -> Result<Vec<u8>, ChatError>;
}

/// [`DocumentBackend`] over the REST transport.
#[derive(Debug)]
pub struct HttpBackend {
    client: ApiClient,
}

impl HttpBackend {
    pub fn new(config: ApiConfig) -> Result<Self, ChatError> {
        let client = ApiClient::new(config).map_err(|error| ChatError::from_api(error, "backend"))?;
        Ok(Self { client })
    }

    /// The underlying client, for collaborator surfaces (upload, listing,
    /// deletion).
    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl DocumentBackend for HttpBackend {
    async fn ask_question(
        &self,
        session_key: &SessionKey,
        question: &str,
    ) -> Result<String, ChatError> {
        let reply = self
            .client
            .ask_question(session_key.as_str(), question)
            .await
            .map_err(|error| ChatError::from_api(error, "chat session"))?;
        Ok(reply.answer)
    }

    async fn chat_history(
        &self,
        session_key: &SessionKey,
    ) -> Result<Vec<Interaction>, ChatError> {
        let history = self
            .client
            .chat_history(session_key.as_str())
            .await
            .map_err(|error| ChatError::from_api(error, "chat history"))?;
        Ok(history.interactions)
    }

    async fn fetch_document(&self, document_key: &DocumentKey) -> Result<Vec<u8>, ChatError> {
        self.client
            .fetch_document(document_key.as_str())
            .await
            .map_err(|error| ChatError::from_api(error, "document"))
    }
}

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use docchat::{ChatError, DocumentBackend, DocumentKey, SessionKey};
use docchat_api::Interaction;

/// Scripted [`DocumentBackend`] double.
///
/// Responses are configured per key up front; every call is recorded so
/// tests can assert call counts and key order. Unscripted calls answer
/// NotFound, matching a backend that has never seen the key.
#[derive(Default)]
pub struct ScriptedBackend {
    ask_log: Mutex<Vec<String>>,
    history_log: Mutex<Vec<String>>,
    document_log: Mutex<Vec<String>>,
    ask_script: Mutex<HashMap<String, Vec<Result<String, ChatError>>>>,
    history_script: Mutex<HashMap<String, Result<Vec<Interaction>, ChatError>>>,
    document_script: Mutex<HashMap<String, Result<Vec<u8>, ChatError>>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one ask response for a session key (FIFO per key).
    pub fn script_ask(&self, session_key: &str, result: Result<String, ChatError>) {
        self.ask_script
            .lock()
            .unwrap()
            .entry(session_key.to_string())
            .or_default()
            .push(result);
    }

    pub fn script_history(&self, session_key: &str, result: Result<Vec<Interaction>, ChatError>) {
        self.history_script
            .lock()
            .unwrap()
            .insert(session_key.to_string(), result);
    }

    pub fn script_document(&self, document_key: &str, result: Result<Vec<u8>, ChatError>) {
        self.document_script
            .lock()
            .unwrap()
            .insert(document_key.to_string(), result);
    }

    pub fn ask_count(&self) -> usize {
        self.ask_log.lock().unwrap().len()
    }

    pub fn asked_keys(&self) -> Vec<String> {
        self.ask_log.lock().unwrap().clone()
    }

    pub fn history_count(&self) -> usize {
        self.history_log.lock().unwrap().len()
    }

    pub fn document_count(&self) -> usize {
        self.document_log.lock().unwrap().len()
    }
}

pub fn interaction(question: &str, answer: &str, asked_at: &str) -> Interaction {
    Interaction {
        question: question.to_string(),
        answer: answer.to_string(),
        asked_at: asked_at.to_string(),
    }
}

#[async_trait]
impl DocumentBackend for ScriptedBackend {
    async fn ask_question(
        &self,
        session_key: &SessionKey,
        _question: &str,
    ) -> Result<String, ChatError> {
        self.ask_log
            .lock()
            .unwrap()
            .push(session_key.as_str().to_string());

        let mut script = self.ask_script.lock().unwrap();
        match script.get_mut(session_key.as_str()) {
            Some(responses) if !responses.is_empty() => responses.remove(0),
            _ => Err(ChatError::NotFound {
                what: "chat session",
            }),
        }
    }

    async fn chat_history(
        &self,
        session_key: &SessionKey,
    ) -> Result<Vec<Interaction>, ChatError> {
        self.history_log
            .lock()
            .unwrap()
            .push(session_key.as_str().to_string());

        self.history_script
            .lock()
            .unwrap()
            .get(session_key.as_str())
            .cloned()
            .unwrap_or(Err(ChatError::NotFound {
                what: "chat history",
            }))
    }

    async fn fetch_document(&self, document_key: &DocumentKey) -> Result<Vec<u8>, ChatError> {
        self.document_log
            .lock()
            .unwrap()
            .push(document_key.as_str().to_string());

        self.document_script
            .lock()
            .unwrap()
            .get(document_key.as_str())
            .cloned()
            .unwrap_or(Err(ChatError::NotFound { what: "document" }))
    }
}

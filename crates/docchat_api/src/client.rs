use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{parse_error_message, ApiError};
use crate::payload::{AskReply, ChatHistory, ChatIndex, DeleteReceipt, UploadReceipt};
use crate::url;

#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let base_url = url::normalize_base_url(&config.base_url);
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ApiError::InvalidBaseUrl(base_url));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = config.user_agent.as_deref() {
            builder = builder.user_agent(user_agent.to_owned());
        }
        let http = builder.build().map_err(ApiError::from)?;

        Ok(Self {
            http,
            base_url,
            config,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload a document and open its chat session.
    ///
    /// The backend issues the `{chat_id, pdf_id}` identity pair here; the
    /// caller hands that pair to the engine for all later navigation.
    pub async fn upload_document(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt, ApiError> {
        let part = Part::bytes(bytes)
            .file_name(filename.to_owned())
            .mime_str("application/pdf")?;
        let form = Form::new().part("files", part);

        let response = self
            .http
            .post(url::upload_url(&self.base_url))
            .multipart(form)
            .send()
            .await?;
        decode(check(response).await?, "upload").await
    }

    /// Ask a question against a chat session key.
    pub async fn ask_question(&self, chat_id: &str, question: &str) -> Result<AskReply, ApiError> {
        let form = Form::new()
            .text("chat_id", chat_id.to_owned())
            .text("question", question.to_owned());

        let response = self
            .http
            .post(url::ask_url(&self.base_url))
            .multipart(form)
            .send()
            .await?;
        decode(check(response).await?, "ask").await
    }

    /// Fetch the persisted interaction history for a chat session key.
    pub async fn chat_history(&self, chat_id: &str) -> Result<ChatHistory, ApiError> {
        let response = self
            .http
            .get(url::history_url(&self.base_url, chat_id))
            .send()
            .await?;
        decode(check(response).await?, "history").await
    }

    /// Fetch the stored document bytes for a document key.
    pub async fn fetch_document(&self, pdf_id: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .http
            .get(url::document_url(&self.base_url, pdf_id))
            .send()
            .await?;
        let response = check(response).await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// List every chat session known to the backend (dashboard surface).
    pub async fn list_chats(&self) -> Result<ChatIndex, ApiError> {
        let response = self
            .http
            .get(url::chats_url(&self.base_url))
            .send()
            .await?;
        decode(check(response).await?, "chats").await
    }

    /// Delete a chat session and its stored document (dashboard surface).
    pub async fn delete_chat(&self, chat_id: &str) -> Result<DeleteReceipt, ApiError> {
        let response = self
            .http
            .delete(url::delete_chat_url(&self.base_url, chat_id))
            .send()
            .await?;
        decode(check(response).await?, "delete").await
    }
}

/// Map non-2xx responses into [`ApiError::Status`] with a parsed message.
async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = parse_error_message(status, &body);
    debug!(%status, %message, "backend reported failure");
    Err(ApiError::Status { status, message })
}

async fn decode<T: DeserializeOwned>(
    response: Response,
    context: &'static str,
) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|source| ApiError::Decode { context, source })
}

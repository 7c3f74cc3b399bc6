use serde::{Deserialize, Serialize};

/// Response to `POST /upload_pdf/`.
///
/// The `{chat_id, pdf_id}` pair is the session/document identity handed to
/// the engine; everything else is informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub chat_id: String,
    pub pdf_id: String,
    #[serde(default)]
    pub message: String,
}

/// Response to `POST /ask_question/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskReply {
    pub answer: String,
}

/// One persisted question/answer pair, in server (chronological) order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub asked_at: String,
}

/// Response to `GET /chat_history/{chat_id}`. Extra metadata fields the
/// backend includes alongside `interactions` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistory {
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

/// One entry of the dashboard listing returned by `GET /all_chats/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSummary {
    pub chat_id: String,
    pub pdf_id: String,
    #[serde(default)]
    pub pdf_filename: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub last_accessed: String,
    #[serde(default)]
    pub num_pages: Option<u32>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Response to `GET /all_chats/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatIndex {
    #[serde(default)]
    pub chats: Vec<ChatSummary>,
}

/// Response to `DELETE /delete_chat/{chat_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteReceipt {
    #[serde(default)]
    pub message: String,
}

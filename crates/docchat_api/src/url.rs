/// Default base URL for a locally hosted backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Normalize a backend base URL.
///
/// Normalization rules:
/// 1) empty/whitespace input falls back to [`DEFAULT_BASE_URL`]
/// 2) trailing slashes are stripped so endpoint builders can join cleanly
pub fn normalize_base_url(input: &str) -> String {
    let base = if input.trim().is_empty() {
        DEFAULT_BASE_URL
    } else {
        input.trim()
    };
    base.trim_end_matches('/').to_string()
}

/// Endpoint for `POST /upload_pdf/`.
pub fn upload_url(base: &str) -> String {
    format!("{}/upload_pdf/", normalize_base_url(base))
}

/// Endpoint for `POST /ask_question/`.
pub fn ask_url(base: &str) -> String {
    format!("{}/ask_question/", normalize_base_url(base))
}

/// Endpoint for `GET /get_pdf/{pdf_id}`.
pub fn document_url(base: &str, pdf_id: &str) -> String {
    format!("{}/get_pdf/{pdf_id}", normalize_base_url(base))
}

/// Endpoint for `GET /chat_history/{chat_id}`.
pub fn history_url(base: &str, chat_id: &str) -> String {
    format!("{}/chat_history/{chat_id}", normalize_base_url(base))
}

/// Endpoint for `GET /all_chats/`.
pub fn chats_url(base: &str) -> String {
    format!("{}/all_chats/", normalize_base_url(base))
}

/// Endpoint for `DELETE /delete_chat/{chat_id}`.
pub fn delete_chat_url(base: &str, chat_id: &str) -> String {
    format!("{}/delete_chat/{chat_id}", normalize_base_url(base))
}

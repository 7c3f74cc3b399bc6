use docchat_api::parse_error_message;
use reqwest::StatusCode;

#[test]
fn detail_string_is_preferred() {
    let message = parse_error_message(
        StatusCode::NOT_FOUND,
        r#"{"detail": "Chat session not found. Please upload PDF first."}"#,
    );
    assert_eq!(message, "Chat session not found. Please upload PDF first.");
}

#[test]
fn structured_detail_is_rendered_as_json() {
    let message = parse_error_message(
        StatusCode::UNPROCESSABLE_ENTITY,
        r#"{"detail": [{"loc": ["body", "question"], "msg": "field required"}]}"#,
    );
    assert!(message.contains("field required"));
}

#[test]
fn non_json_body_is_passed_through() {
    let message = parse_error_message(StatusCode::BAD_GATEWAY, "upstream exploded");
    assert_eq!(message, "upstream exploded");
}

#[test]
fn empty_body_falls_back_to_canonical_reason() {
    let message = parse_error_message(StatusCode::INTERNAL_SERVER_ERROR, "");
    assert_eq!(message, "Internal Server Error");
}

#[test]
fn null_detail_falls_back_to_body() {
    let message = parse_error_message(StatusCode::BAD_REQUEST, r#"{"detail": null}"#);
    assert_eq!(message, r#"{"detail": null}"#);
}

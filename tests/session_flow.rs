mod support;

use std::sync::Arc;

use docchat::engine::ANSWER_FAILED_PREFIX;
use docchat::history::{EMPTY_HISTORY_TEXT, WELCOME_TEXT};
use docchat::{ChatEngine, ChatError, DeliveryState, LoadState, Role, SessionKey};
use support::{interaction, ScriptedBackend};

#[tokio::test]
async fn navigation_seeds_history_and_installs_the_document() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.script_history(
        "chat_doc1",
        Ok(vec![interaction("first?", "one", "2026-08-29T10:00:00")]),
    );
    backend.script_document("doc1", Ok(b"%PDF-1.7".to_vec()));
    let mut engine = ChatEngine::new(backend.clone());

    engine.navigate(None, Some("doc1")).await;

    let session = engine.session();
    assert_eq!(session.session_key(), Some(&SessionKey::new("chat_doc1")));
    assert_eq!(session.load_state(), LoadState::Loaded);
    assert_eq!(session.messages().len(), 2);
    assert_eq!(session.messages()[0].role, Role::User);
    assert_eq!(session.messages()[1].content, "one");
    assert_eq!(engine.resources().live_handles(), 1);
    assert_eq!(backend.history_count(), 1);
    assert_eq!(backend.document_count(), 1);
}

#[tokio::test]
async fn navigation_without_identity_shows_welcome_and_disables_send() {
    let backend = Arc::new(ScriptedBackend::new());
    let mut engine = ChatEngine::new(backend.clone());

    engine.navigate(None, None).await;

    assert!(!engine.session().can_send());
    assert_eq!(engine.session().messages().len(), 1);
    assert_eq!(engine.session().messages()[0].content, WELCOME_TEXT);
    assert_eq!(backend.history_count(), 0);

    let error = engine
        .send_question("hello?")
        .await
        .expect_err("sending without a session must fail");
    assert_eq!(error, ChatError::NoSession);
    assert_eq!(backend.ask_count(), 0);
    // The rejected question never entered the log.
    assert_eq!(engine.session().messages().len(), 1);
}

#[tokio::test]
async fn successful_question_confirms_user_and_appends_assistant() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.script_history("chat_doc1", Ok(vec![]));
    backend.script_document("doc1", Ok(b"pdf".to_vec()));
    backend.script_ask("chat_doc1", Ok("an answer".to_string()));
    let mut engine = ChatEngine::new(backend.clone());

    engine.navigate(None, Some("doc1")).await;
    engine
        .send_question("what is this about?")
        .await
        .expect("scripted ask should succeed");

    let messages = engine.session().messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].content, EMPTY_HISTORY_TEXT);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[1].delivery, DeliveryState::Confirmed);
    assert_eq!(messages[2].role, Role::Assistant);
    assert_eq!(messages[2].content, "an answer");
}

#[tokio::test]
async fn fallback_success_migrates_the_session_for_future_dispatches() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.script_history("chat_server77", Ok(vec![]));
    backend.script_document("doc1", Ok(b"pdf".to_vec()));
    backend.script_ask(
        "chat_server77",
        Err(ChatError::NotFound {
            what: "chat session",
        }),
    );
    backend.script_ask("chat_doc1", Ok("healed".to_string()));
    backend.script_ask("chat_doc1", Ok("second answer".to_string()));
    let mut engine = ChatEngine::new(backend.clone());

    engine.navigate(Some("chat_server77"), Some("doc1")).await;
    engine
        .send_question("first question")
        .await
        .expect("fallback should heal the session");

    assert_eq!(
        engine.session().session_key(),
        Some(&SessionKey::new("chat_doc1"))
    );

    engine
        .send_question("second question")
        .await
        .expect("migrated key should be used directly");

    assert_eq!(
        backend.asked_keys(),
        vec!["chat_server77", "chat_doc1", "chat_doc1"]
    );
}

#[tokio::test]
async fn exhausted_fallback_appends_a_visible_failure_placeholder() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.script_history("chat_server77", Ok(vec![]));
    let mut engine = ChatEngine::new(backend.clone());

    // No document key: history loads for the server key, no fallback exists.
    engine.navigate(Some("chat_server77"), None).await;
    let error = engine
        .send_question("doomed question")
        .await
        .expect_err("unscripted ask must fail");

    assert!(matches!(error, ChatError::NotFound { .. }));
    let messages = engine.session().messages();
    let user = &messages[messages.len() - 2];
    let placeholder = &messages[messages.len() - 1];
    assert_eq!(user.role, Role::User);
    assert_eq!(user.delivery, DeliveryState::Failed);
    assert_eq!(placeholder.role, Role::Assistant);
    assert_eq!(placeholder.delivery, DeliveryState::Failed);
    assert!(placeholder.content.starts_with(ANSWER_FAILED_PREFIX));
    // No migration happened.
    assert_eq!(
        engine.session().session_key(),
        Some(&SessionKey::new("chat_server77"))
    );
}

#[tokio::test]
async fn identity_change_resets_the_conversation() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.script_history("chat_doc1", Ok(vec![]));
    backend.script_document("doc1", Ok(b"one".to_vec()));
    backend.script_ask("chat_doc1", Ok("answer".to_string()));
    backend.script_history("chat_doc2", Ok(vec![]));
    backend.script_document("doc2", Ok(b"two".to_vec()));
    let mut engine = ChatEngine::new(backend.clone());

    engine.navigate(None, Some("doc1")).await;
    engine
        .send_question("question for doc1")
        .await
        .expect("scripted ask should succeed");
    assert_eq!(engine.session().messages().len(), 3);

    engine.navigate(None, Some("doc2")).await;

    assert_eq!(
        engine.session().session_key(),
        Some(&SessionKey::new("chat_doc2"))
    );
    // Fresh log for the new session: just the empty-history placeholder.
    assert_eq!(engine.session().messages().len(), 1);
    assert_eq!(engine.resources().live_handles(), 1);
    assert_eq!(
        engine
            .resources()
            .current()
            .map(|r| r.document_key().as_str()),
        Some("doc2")
    );
}

#[tokio::test]
async fn teardown_releases_the_display_handle() {
    let backend = Arc::new(ScriptedBackend::new());
    backend.script_history("chat_doc1", Ok(vec![]));
    backend.script_document("doc1", Ok(b"pdf".to_vec()));
    let mut engine = ChatEngine::new(backend);

    engine.navigate(None, Some("doc1")).await;
    assert_eq!(engine.resources().live_handles(), 1);

    engine.teardown();
    assert_eq!(engine.resources().live_handles(), 0);
}

//! End-to-end: ask through a mock endpoint, persist to disk, reload.

use std::sync::Arc;

use askpad::core::action::{Action, Effect, update};
use askpad::core::history::HistoryStore;
use askpad::core::request;
use askpad::core::state::App;
use askpad::inference::{ChatCompletionsProvider, EndpointOptions, SamplingParams};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path},
};

fn app_for(server: &MockServer, store: &HistoryStore) -> App {
    let provider = ChatCompletionsProvider::new(
        EndpointOptions {
            base_url: server.uri(),
            api_key: Some("test-key".to_string()),
            ..EndpointOptions::default()
        },
        "test-model".to_string(),
        SamplingParams::default(),
    )
    .unwrap();
    App::new(
        Arc::new(provider),
        "test-model".to_string(),
        store.load_or_default(),
    )
}

/// Runs one action through the reducer, the request runner, and storage.
async fn drive(app: &mut App, store: &HistoryStore, action: Action) -> Effect {
    let effect = update(app, action);
    let Effect::SpawnRequest(query) = effect else {
        return effect;
    };
    let reply = request::perform(app.provider.as_ref(), query).await;
    let effect = update(app, reply);
    store.apply(&effect, &app.history);
    effect
}

fn answer(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    }))
}

#[tokio::test]
async fn test_ask_persists_and_reloads() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(answer("## Rust\n\n**Memory safe** and fast.\n- no GC"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::open_file(Some(dir.path())).unwrap();
    let mut app = app_for(&server, &store);

    let effect = drive(&mut app, &store, Action::Submit("What is Rust?".into())).await;
    assert_eq!(effect, Effect::Persist { clear_draft: true });

    // A fresh process sees the same history
    let reopened = HistoryStore::open_file(Some(dir.path())).unwrap();
    let history = reopened.load().unwrap();
    assert_eq!(history, app.history);
    assert_eq!(history.len(), 1);
    assert_eq!(
        history.entries()[0].answer_lines,
        vec!["## Rust", "Memory safe and fast.", "- no GC"]
    );

    let raw = std::fs::read_to_string(dir.path().join("chatHistory.json")).unwrap();
    assert!(raw.contains("\"ques\":\"What is Rust?\""));
}

#[tokio::test]
async fn test_reask_replaces_answer_on_disk() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "messages": [{ "content": "first" }] })))
        .respond_with(answer("old answer"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "messages": [{ "content": "second" }] })))
        .respond_with(answer("second answer"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "messages": [{ "content": "first" }] })))
        .respond_with(answer("new answer"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::open_file(Some(dir.path())).unwrap();
    let mut app = app_for(&server, &store);

    drive(&mut app, &store, Action::Submit("first".into())).await;
    drive(&mut app, &store, Action::Submit("second".into())).await;
    let first_id = app.history.entries()[0].id;

    let effect = drive(&mut app, &store, Action::Reask("first".into())).await;
    assert_eq!(effect, Effect::Persist { clear_draft: false });

    let history = store.load().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history.entries()[0].id, first_id);
    assert_eq!(history.entries()[0].answer_lines, vec!["new answer"]);
    assert_eq!(history.entries()[1].answer_lines, vec!["second answer"]);
}

#[tokio::test]
async fn test_api_error_leaves_disk_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(answer("kept"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "message": "Invalid model" }
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::open_file(Some(dir.path())).unwrap();
    let mut app = app_for(&server, &store);

    drive(&mut app, &store, Action::Submit("ok".into())).await;
    let before = store.load().unwrap();

    let effect = drive(&mut app, &store, Action::Submit("bad".into())).await;
    assert_eq!(effect, Effect::None);
    assert_eq!(app.alert.as_deref(), Some("Error 400: Invalid model"));
    assert_eq!(store.load().unwrap(), before);
    assert_eq!(app.history, before);
}

#[tokio::test]
async fn test_null_reask_reply_keeps_old_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(answer("original answer"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::open_file(Some(dir.path())).unwrap();
    let mut app = app_for(&server, &store);

    drive(&mut app, &store, Action::Submit("q".into())).await;
    let effect = drive(&mut app, &store, Action::Reask("q".into())).await;

    assert_eq!(effect, Effect::None);
    assert!(app.alert.is_none());
    assert_eq!(app.history.entries()[0].answer_lines, vec!["original answer"]);
    assert_eq!(
        store.load().unwrap().entries()[0].answer_lines,
        vec!["original answer"]
    );
}

#[tokio::test]
async fn test_clear_removes_persisted_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(answer("a"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::open_file(Some(dir.path())).unwrap();
    let mut app = app_for(&server, &store);
    drive(&mut app, &store, Action::Submit("q".into())).await;

    update(&mut app, Action::RequestClear);
    let effect = update(&mut app, Action::ConfirmClear);
    store.apply(&effect, &app.history);

    assert!(!dir.path().join("chatHistory.json").exists());
    assert!(store.load().unwrap().is_empty());
}

//! Controller scenarios driven through the mock backend (no network).

use std::sync::Arc;

use docchat_core::mock::{MockBackend, MockReply};
use docchat_core::prompt::DOCUMENT_FRAMING;
use docchat_core::{
    ApiKey, CompletionError, Controller, Model, Role, SessionSettings, SubmitError, UploadError,
    UploadedFile,
};

fn settings_with_key() -> SessionSettings {
    SessionSettings {
        model: Model::Gemini15Flash,
        api_key: ApiKey::new("test-key"),
    }
}

fn controller(backend: &Arc<MockBackend>, settings: SessionSettings) -> Controller {
    Controller::new(backend.clone(), settings)
}

fn text_file(name: &str, text: &str) -> UploadedFile {
    UploadedFile {
        name: name.to_string(),
        mime: "text/plain".to_string(),
        data: text.as_bytes().to_vec(),
    }
}

#[tokio::test]
async fn missing_credential_short_circuits() {
    let backend = Arc::new(MockBackend::answering("never"));
    let mut ctl = controller(&backend, SessionSettings::default());

    let err = ctl.submit("What is this?").await.unwrap_err();
    assert!(matches!(err, SubmitError::MissingCredential));
    assert_eq!(backend.call_count(), 0);
    assert!(ctl.session().messages().is_empty());
}

#[tokio::test]
async fn credential_is_checked_before_question() {
    let backend = Arc::new(MockBackend::answering("never"));
    let mut ctl = controller(&backend, SessionSettings::default());

    let err = ctl.submit("").await.unwrap_err();
    assert!(matches!(err, SubmitError::MissingCredential));
}

#[tokio::test]
async fn blank_api_key_counts_as_missing() {
    let backend = Arc::new(MockBackend::answering("never"));
    let mut ctl = controller(&backend, SessionSettings::default());
    ctl.set_api_key(ApiKey::new("   "));

    let err = ctl.submit("What is this?").await.unwrap_err();
    assert!(matches!(err, SubmitError::MissingCredential));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn empty_question_short_circuits() {
    let backend = Arc::new(MockBackend::answering("never"));
    let mut ctl = controller(&backend, settings_with_key());

    for question in ["", "   \n\t"] {
        let err = ctl.submit(question).await.unwrap_err();
        assert!(matches!(err, SubmitError::EmptyQuestion));
    }
    assert_eq!(backend.call_count(), 0);
    assert!(ctl.session().messages().is_empty());
}

#[tokio::test]
async fn two_submits_make_four_messages_in_order() {
    let backend = Arc::new(MockBackend::with_sequence(
        vec![
            MockReply::Answer("first answer".into()),
            MockReply::Answer("second answer".into()),
        ],
        MockReply::Echo,
    ));
    let mut ctl = controller(&backend, settings_with_key());

    assert_eq!(ctl.submit("first?").await.unwrap(), "first answer");
    assert_eq!(ctl.submit("second?").await.unwrap(), "second answer");

    let roles: Vec<Role> = ctl.session().messages().iter().map(|m| m.role()).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User, Role::Assistant]);
    let contents: Vec<&str> = ctl.session().messages().iter().map(|m| m.content()).collect();
    assert_eq!(contents, vec!["first?", "first answer", "second?", "second answer"]);
}

#[tokio::test]
async fn question_without_document_is_sent_verbatim() {
    let backend = Arc::new(MockBackend::new(MockReply::Echo));
    let mut ctl = controller(&backend, settings_with_key());

    ctl.submit("Tell me a joke").await.unwrap();
    assert_eq!(backend.prompts(), vec!["Tell me a joke".to_string()]);
    assert_eq!(backend.last_model(), Some(Model::Gemini15Flash));
}

#[tokio::test]
async fn document_context_is_framed_before_question() {
    let backend = Arc::new(MockBackend::new(MockReply::Echo));
    let mut ctl = controller(&backend, settings_with_key());

    ctl.upload(text_file("notes.txt", "Alpha Beta Gamma"))
        .await
        .unwrap();
    ctl.submit("What is the summary?").await.unwrap();

    let prompts = backend.prompts();
    assert_eq!(prompts.len(), 1);
    let prompt = &prompts[0];
    let framing = prompt.find(DOCUMENT_FRAMING).unwrap();
    let document = prompt.find("Alpha Beta Gamma").unwrap();
    let question = prompt.find("What is the summary?").unwrap();
    assert!(framing < document && document < question);

    // The user message is the literal question, not the combined prompt.
    assert_eq!(ctl.session().messages()[0].content(), "What is the summary?");
}

#[tokio::test]
async fn long_upload_preview_truncates_but_model_gets_full_text() {
    let backend = Arc::new(MockBackend::new(MockReply::Echo));
    let mut ctl = controller(&backend, settings_with_key());
    let text: String = "abcdefghij".repeat(150);

    let preview = ctl.upload(text_file("long.txt", &text)).await.unwrap();
    assert_eq!(preview.total_chars, 1500);
    assert!(preview.truncated);
    assert_eq!(preview.preview, format!("{}...", &text[..1000]));

    ctl.submit("q").await.unwrap();
    assert!(backend.prompts()[0].contains(&text));
}

#[tokio::test]
async fn new_upload_replaces_previous_document() {
    let backend = Arc::new(MockBackend::new(MockReply::Echo));
    let mut ctl = controller(&backend, settings_with_key());

    ctl.upload(text_file("a.txt", "old content")).await.unwrap();
    ctl.upload(text_file("b.txt", "new content")).await.unwrap();
    assert_eq!(ctl.session().document_text(), "new content");

    ctl.submit("q").await.unwrap();
    assert!(!backend.prompts()[0].contains("old content"));
}

#[tokio::test]
async fn failed_upload_is_reported_and_not_used_as_context() {
    let backend = Arc::new(MockBackend::new(MockReply::Echo));
    let mut ctl = controller(&backend, settings_with_key());

    ctl.upload(text_file("a.txt", "good content")).await.unwrap();
    let bad = UploadedFile {
        name: "bad.bin".into(),
        mime: "application/octet-stream".into(),
        data: vec![0xc3, 0x28, 0xff],
    };
    let err = ctl.upload(bad).await.unwrap_err();
    assert!(matches!(err, UploadError::Extraction(_)));
    assert!(err.to_string().contains("error extracting TXT"));

    assert!(ctl.session().document().is_none());
    ctl.submit("plain question").await.unwrap();
    assert_eq!(backend.prompts()[0], "plain question");
}

#[tokio::test]
async fn failed_completion_records_nothing() {
    let backend = Arc::new(MockBackend::new(MockReply::Fail(CompletionError::Quota(
        "out of credits".into(),
    ))));
    let mut ctl = controller(&backend, settings_with_key());

    let err = ctl.submit("anything").await.unwrap_err();
    assert!(matches!(err, SubmitError::Completion(CompletionError::Quota(_))));
    assert!(err.to_string().starts_with("error calling LLM"));
    assert_eq!(backend.call_count(), 1);
    assert!(ctl.session().messages().is_empty());
}

#[tokio::test]
async fn clear_resets_history_and_document() {
    let backend = Arc::new(MockBackend::answering("ok"));
    let mut ctl = controller(&backend, settings_with_key());

    ctl.upload(text_file("a.txt", "content")).await.unwrap();
    ctl.submit("q").await.unwrap();
    ctl.clear();

    assert!(ctl.session().messages().is_empty());
    assert_eq!(ctl.session().document_text(), "");
    let view = ctl.view();
    assert!(view.document.is_none());
    assert!(view.messages.is_empty());
}

#[tokio::test]
async fn view_reflects_settings_and_history() {
    let backend = Arc::new(MockBackend::answering("hello back"));
    let mut ctl = controller(&backend, SessionSettings::default());

    assert!(!ctl.view().api_key_configured);
    ctl.set_api_key(ApiKey::new("k"));
    ctl.set_model(Model::Gemini10Pro);
    ctl.submit("hello").await.unwrap();

    let view = ctl.view();
    assert!(view.api_key_configured);
    assert_eq!(view.model, Model::Gemini10Pro);
    assert_eq!(view.messages.len(), 2);
    assert_eq!(backend.last_model(), Some(Model::Gemini10Pro));

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["model"], "gemini-1.0-pro");
    assert_eq!(json["messages"][1]["role"], "assistant");
}

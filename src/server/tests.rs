use super::*;
use crate::config::Config;
use crate::embeddings::EmbeddingProvider;
use tempfile::TempDir;

async fn degraded_state() -> (AppState, TempDir) {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config = Config::load(temp_dir.path()).expect("load should succeed");
    let engine = RagEngine::with_provider(config, EmbeddingProvider::Unavailable)
        .await
        .expect("engine construction should succeed");

    (
        AppState {
            engine: Arc::new(engine),
        },
        temp_dir,
    )
}

#[tokio::test]
async fn health_reports_uninitialized() {
    let (state, _temp_dir) = degraded_state().await;

    let Json(response) = handle_health(State(state)).await;

    assert_eq!(response.status, "healthy");
    assert!(!response.initialized);
}

#[tokio::test]
async fn empty_message_is_rejected_at_the_boundary() {
    let (state, _temp_dir) = degraded_state().await;

    let result = handle_chat(
        State(state),
        Json(ChatRequest {
            message: "   \t".to_string(),
            top_k: None,
        }),
    )
    .await;

    let error = result.err().expect("empty message must be rejected");
    assert_eq!(error.status, StatusCode::BAD_REQUEST);
    assert_eq!(error.code, "bad_request");
}

#[tokio::test]
async fn chat_answers_from_fallback_when_degraded() {
    let (state, _temp_dir) = degraded_state().await;

    let result = handle_chat(
        State(state),
        Json(ChatRequest {
            message: "How much are the hostel fees?".to_string(),
            top_k: None,
        }),
    )
    .await;

    let Json(response) = result.expect("chat must answer");
    assert!(response.response.contains("Boys Hostels"));
    assert_eq!(response.sources, vec!["general_knowledge"]);
    assert!(!response.timestamp.is_empty());
}

#[tokio::test]
async fn rebuild_reports_failure_when_degraded() {
    let (state, _temp_dir) = degraded_state().await;

    let result = handle_rebuild(State(state)).await;

    let error = result.err().expect("rebuild must fail without embeddings");
    assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error.code, "build_failed");
}

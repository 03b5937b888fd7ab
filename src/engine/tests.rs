use super::*;
use tempfile::TempDir;

async fn degraded_engine() -> (RagEngine, TempDir) {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config = Config::load(temp_dir.path()).expect("load should succeed");

    let engine = RagEngine::with_provider(config, EmbeddingProvider::Unavailable)
        .await
        .expect("engine construction should succeed");

    (engine, temp_dir)
}

#[tokio::test]
async fn fresh_engine_is_not_built() {
    let (engine, _temp_dir) = degraded_engine().await;

    assert!(!engine.is_built().await);
    assert!(!engine.is_ready());
    assert_eq!(engine.entry_count().await, 0);
}

#[tokio::test]
async fn initialize_fails_without_embedding_backend() {
    let (engine, _temp_dir) = degraded_engine().await;

    assert!(!engine.initialize().await);
    assert!(!engine.is_ready());
}

#[tokio::test]
async fn degraded_query_matches_direct_fallback() {
    let (engine, _temp_dir) = degraded_engine().await;

    let question = "What is the hostel fee?";
    let answer = engine.query(question, DEFAULT_TOP_K).await;

    assert_eq!(
        answer.answer,
        fallback::respond(question, &InfoHints::new())
    );
    assert_eq!(answer.sources, vec![FALLBACK_SOURCE.to_string()]);
}

#[tokio::test]
async fn degraded_query_always_produces_text() {
    let (engine, _temp_dir) = degraded_engine().await;

    for question in ["", "gibberish qwzx", "How much are the hostel fees?"] {
        let answer = engine.query(question, DEFAULT_TOP_K).await;
        assert!(!answer.answer.is_empty());
        assert!(!answer.timestamp.is_empty());
    }
}

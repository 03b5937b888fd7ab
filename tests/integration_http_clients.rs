#![expect(
    clippy::tests_outside_test_module,
    reason = "integration tests are only compiled in test mode"
)]

//! HTTP-backed clients exercised against a local mock server.

use campus_qa::config::{GENERATION_API_KEY_ENV, GenerationConfig, OllamaConfig};
use campus_qa::embeddings::{EmbeddingProvider, OllamaClient};
use campus_qa::generation::GenerationClient;
use serde_json::json;
use serial_test::serial;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ollama_config_for(server: &MockServer) -> OllamaConfig {
    let uri = url::Url::parse(&server.uri()).expect("mock server uri should parse");

    OllamaConfig {
        protocol: "http".to_string(),
        host: uri.host_str().expect("mock server host").to_string(),
        port: uri.port().expect("mock server port"),
        batch_size: 2,
        ..OllamaConfig::default()
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn provider_connects_when_model_is_listed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{"name": "all-minilm:latest", "size": 45960996}]
        })))
        .mount(&server)
        .await;

    let provider = EmbeddingProvider::connect(&ollama_config_for(&server));

    assert!(provider.is_available());
}

#[tokio::test(flavor = "multi_thread")]
async fn provider_degrades_when_model_is_missing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{"name": "some-other-model"}]
        })))
        .mount(&server)
        .await;

    let provider = EmbeddingProvider::connect(&ollama_config_for(&server));

    assert!(!provider.is_available());
}

#[tokio::test(flavor = "multi_thread")]
async fn single_embedding_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embedding": [0.1, 0.2, 0.3]
        })))
        .mount(&server)
        .await;

    let client =
        OllamaClient::new(&ollama_config_for(&server)).expect("client construction should succeed");

    let embedding = client
        .embed("What are the hostel fees?")
        .expect("embed should succeed");

    assert_eq!(embedding, vec![0.1, 0.2, 0.3]);
}

#[tokio::test(flavor = "multi_thread")]
async fn batch_embedding_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embeddings": [[0.1, 0.2], [0.3, 0.4]]
        })))
        .mount(&server)
        .await;

    let client =
        OllamaClient::new(&ollama_config_for(&server)).expect("client construction should succeed");

    let texts = vec!["first chunk".to_string(), "second chunk".to_string()];
    let embeddings = client.embed_batch(&texts).expect("batch should succeed");

    assert_eq!(embeddings.len(), 2);
    assert_eq!(embeddings[1], vec![0.3, 0.4]);
}

#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn generation_strips_answer_marker() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"generated_text": "ANSWER: The tuition is ₹4-5 lakhs per year."}
        ])))
        .mount(&server)
        .await;

    // SAFETY: serialized test, no concurrent env access
    unsafe {
        std::env::set_var(GENERATION_API_KEY_ENV, "hf_test_token");
    }

    let config = GenerationConfig {
        api_url: format!("{}/generate", server.uri()),
        ..GenerationConfig::default()
    };
    let client = GenerationClient::new(&config);

    let answer = client
        .generate("What is the tuition?")
        .expect("generation should succeed");

    assert_eq!(answer, "The tuition is ₹4-5 lakhs per year.");

    // SAFETY: serialized test, no concurrent env access
    unsafe {
        std::env::remove_var(GENERATION_API_KEY_ENV);
    }
}

#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn generation_server_error_degrades() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    // SAFETY: serialized test, no concurrent env access
    unsafe {
        std::env::set_var(GENERATION_API_KEY_ENV, "hf_test_token");
    }

    let config = GenerationConfig {
        api_url: format!("{}/generate", server.uri()),
        ..GenerationConfig::default()
    };
    let client = GenerationClient::new(&config);

    assert!(client.generate("What is the tuition?").is_err());

    // SAFETY: serialized test, no concurrent env access
    unsafe {
        std::env::remove_var(GENERATION_API_KEY_ENV);
    }
}

#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn generation_empty_output_degrades() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"generated_text": "ANSWER:"}
        ])))
        .mount(&server)
        .await;

    // SAFETY: serialized test, no concurrent env access
    unsafe {
        std::env::set_var(GENERATION_API_KEY_ENV, "hf_test_token");
    }

    let config = GenerationConfig {
        api_url: format!("{}/generate", server.uri()),
        ..GenerationConfig::default()
    };
    let client = GenerationClient::new(&config);

    assert!(client.generate("What is the tuition?").is_err());

    // SAFETY: serialized test, no concurrent env access
    unsafe {
        std::env::remove_var(GENERATION_API_KEY_ENV);
    }
}

use super::*;

#[test]
fn unavailable_provider_reports_itself() {
    let provider = EmbeddingProvider::Unavailable;

    assert!(!provider.is_available());
}

#[test]
fn unavailable_provider_refuses_to_encode() {
    let provider = EmbeddingProvider::Unavailable;

    assert!(provider.encode(&["some text".to_string()]).is_err());
    assert!(provider.encode_one("some text").is_err());
}

#[test]
fn connect_to_unreachable_backend_degrades() {
    // Port 1 on loopback is never serving; the health check fails fast on
    // connection refused rather than hanging.
    let config = crate::config::OllamaConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        ..crate::config::OllamaConfig::default()
    };

    let client = OllamaClient::new(&config)
        .expect("client construction should succeed")
        .with_retry_attempts(1);
    assert!(client.health_check().is_err());
}

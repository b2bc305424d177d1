//! HTTP-level tests for the chat and embeddings clients against a mock
//! server.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use autoheal_core::api::{ApiError, CompletionProvider, Embedder};
use autoheal_core::{Config, ModelClient, OpenAiEmbedder, Prompt};

fn config_for(server: &MockServer) -> Config {
    Config {
        openai_api_key: "test-key".to_string(),
        api_base: server.uri(),
        ..Config::default()
    }
}

#[tokio::test]
async fn completion_returns_first_choice_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({"model": "gpt-4"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "Use //XCUIElementTypeButton[@name='Lenses']"}}
            ]
        })))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let client = ModelClient::new(&config).expect("client");
    let prompt = Prompt {
        system: "You are a senior test automation assistant.".to_string(),
        user: "Suggest new XPath for the failed element.".to_string(),
    };

    let suggestion = client.complete(&prompt).await.expect("complete");
    assert_eq!(suggestion, "Use //XCUIElementTypeButton[@name='Lenses']");
}

#[tokio::test]
async fn completion_surfaces_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let client = ModelClient::new(&config).expect("client");
    let prompt = Prompt {
        system: String::new(),
        user: "x".to_string(),
    };

    let err = client.complete(&prompt).await.expect_err("must fail");
    match err {
        ApiError::ApiResponse { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "rate limited");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn missing_api_key_fails_at_construction() {
    let config = Config {
        openai_api_key: String::new(),
        ..Config::default()
    };
    assert!(matches!(
        ModelClient::new(&config),
        Err(ApiError::InvalidConfig(_))
    ));
    assert!(matches!(
        OpenAiEmbedder::new(&config),
        Err(ApiError::InvalidConfig(_))
    ));
}

#[tokio::test]
async fn embedder_returns_vectors_in_input_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"embedding": [0.0, 1.0]},
                {"embedding": [1.0, 0.0]}
            ]
        })))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let embedder = OpenAiEmbedder::new(&config).expect("embedder");
    let texts = vec!["first".to_string(), "second".to_string()];

    let vectors = embedder.embed(&texts).await.expect("embed");
    assert_eq!(vectors, vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
}

#[tokio::test]
async fn embedder_rejects_count_mismatch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"embedding": [0.5]}]
        })))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let embedder = OpenAiEmbedder::new(&config).expect("embedder");
    let texts = vec!["a".to_string(), "b".to_string()];

    assert!(matches!(
        embedder.embed(&texts).await,
        Err(ApiError::Parse(_))
    ));
}

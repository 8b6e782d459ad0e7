use orion_provider::{GeminiClient, ImagenClient, ProviderError};
use orion_schema::{Role, Turn};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": text }]
            },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn complete_returns_model_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(serde_json::json!({
            "generationConfig": { "temperature": 0.8, "topP": 0.9 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("At your service.")))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new("test-key", "gemini-2.0-flash").with_base_url(server.uri());
    let turn = client
        .complete(&[Turn::user("status report")], "Be Orion")
        .await
        .unwrap();
    assert_eq!(turn.role, Role::Model);
    assert_eq!(turn.text, "At your service.");
}

#[tokio::test]
async fn complete_sends_full_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(body_partial_json(serde_json::json!({
            "contents": [
                { "role": "user", "parts": [{ "text": "boot" }] },
                { "role": "model", "parts": [{ "text": "greetings" }] },
                { "role": "user", "parts": [{ "text": "status report" }] }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let history = vec![
        Turn::user("boot"),
        Turn::model("greetings"),
        Turn::user("status report"),
    ];
    let client = GeminiClient::new("test-key", "gemini-2.0-flash").with_base_url(server.uri());
    client.complete(&history, "Be Orion").await.unwrap();
}

#[tokio::test]
async fn complete_maps_server_error_to_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("quantum flux"))
        .mount(&server)
        .await;

    let client = GeminiClient::new("test-key", "gemini-2.0-flash").with_base_url(server.uri());
    let err = client.complete(&[Turn::user("hi")], "sys").await.unwrap_err();
    match err {
        ProviderError::Api { status, message } => {
            assert_eq!(status.as_u16(), 500);
            assert!(message.contains("quantum flux"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn complete_missing_candidates_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let client = GeminiClient::new("test-key", "gemini-2.0-flash").with_base_url(server.uri());
    let err = client.complete(&[Turn::user("hi")], "sys").await.unwrap_err();
    assert!(matches!(err, ProviderError::MalformedResponse(_)));
}

#[tokio::test]
async fn analyze_sends_inline_data_and_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(body_partial_json(serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [
                    {},
                    { "inlineData": { "mimeType": "image/png", "data": "aGVsbG8=" } }
                ]
            }]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_body("A small test image.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new("test-key", "gemini-2.0-flash").with_base_url(server.uri());
    let description = client.analyze(b"hello", "image/png").await.unwrap();
    assert_eq!(description, "A small test image.");
}

#[tokio::test]
async fn generate_decodes_prediction_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/imagen-3.0-generate-002:predict"))
        .and(body_partial_json(serde_json::json!({
            "instances": { "prompt": "a red dragon" },
            "parameters": { "sampleCount": 1 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "predictions": [{ "bytesBase64Encoded": "aGVsbG8=" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ImagenClient::new("test-key", "imagen-3.0-generate-002").with_base_url(server.uri());
    let bytes = client.generate("a red dragon").await.unwrap();
    assert_eq!(bytes, b"hello");
}

#[tokio::test]
async fn generate_empty_predictions_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "predictions": []
        })))
        .mount(&server)
        .await;

    let client = ImagenClient::new("test-key", "imagen-3.0-generate-002").with_base_url(server.uri());
    assert!(matches!(
        client.generate("anything").await,
        Err(ProviderError::MalformedResponse(_))
    ));
}

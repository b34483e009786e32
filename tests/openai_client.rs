use serde_json::json;
use textCalendar::clients::openai_client::CompletionTarget;
use textCalendar::error::BackendError;
use textCalendar::service::openai_service::{OpenAIClient, OpenAIService};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_for(server: &MockServer) -> OpenAIService {
    OpenAIService::new(CompletionTarget {
        base_url: format!("{}/v1", server.uri()),
        model: "gpt-test".to_string(),
        temperature: 0.3,
    })
}

#[tokio::test]
async fn posts_system_and_user_messages_with_bearer_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-test",
            "messages": [
                { "role": "system", "content": "extract please" },
                { "role": "user", "content": "Lab on Saturday" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                { "message": { "role": "assistant", "content": "{\"title\":\"Lab\"}" } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = service_for(&server)
        .complete("extract please", "Lab on Saturday", "sk-test")
        .await
        .unwrap();

    assert_eq!(reply, "{\"title\":\"Lab\"}");
}

#[tokio::test]
async fn sends_low_temperature() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [ { "message": { "content": "{}" } } ]
        })))
        .mount(&server)
        .await;

    service_for(&server).complete("sys", "user", "sk-test").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let temperature = body["temperature"].as_f64().unwrap();
    assert!((temperature - 0.3).abs() < 1e-6);
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = service_for(&server)
        .complete("sys", "user", "sk-wrong")
        .await
        .unwrap_err();

    match err {
        BackendError::Status { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid api key");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn null_content_is_an_empty_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [ { "message": { "content": null } } ]
        })))
        .mount(&server)
        .await;

    let err = service_for(&server).complete("sys", "user", "sk-test").await.unwrap_err();

    assert!(matches!(err, BackendError::EmptyReply));
}

#[tokio::test]
async fn missing_choices_is_an_empty_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = service_for(&server).complete("sys", "user", "sk-test").await.unwrap_err();

    assert!(matches!(err, BackendError::EmptyReply));
}

#[tokio::test]
async fn garbage_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = service_for(&server).complete("sys", "user", "sk-test").await.unwrap_err();

    assert!(matches!(err, BackendError::Decode(_)));
}

#[tokio::test]
async fn unreachable_backend_is_a_request_error() {
    let service = OpenAIService::new(CompletionTarget {
        base_url: "http://127.0.0.1:9/v1".to_string(),
        model: "gpt-test".to_string(),
        temperature: 0.3,
    });

    let err = service.complete("sys", "user", "sk-test").await.unwrap_err();

    assert!(matches!(err, BackendError::Request(_)));
}

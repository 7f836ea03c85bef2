use easy_landscape_backend::config::BrevoConfig;
use easy_landscape_backend::util::brevo::BrevoEmailService;
use easy_landscape_backend::util::email::{EmailError, NotificationMessage, NotificationTransport};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_for(server: &MockServer) -> BrevoEmailService {
    let config = BrevoConfig {
        api_url: format!("{}/v3/smtp/email", server.uri()),
        ..BrevoConfig::from_test_env()
    };
    BrevoEmailService::new(config).expect("brevo service")
}

fn quote_message() -> NotificationMessage {
    NotificationMessage::new(
        "owner@example.com".to_string(),
        "New Landscape Quote Request from Ana".to_string(),
    )
    .with_text_body("Name: Ana".to_string())
    .with_html_body("<h2>New Quote Request</h2>".to_string())
    .with_reply_to("ana@example.com".to_string())
}

#[tokio::test]
async fn test_send_posts_payload_with_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/smtp/email"))
        .and(header("api-key", "test-api-key"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "sender": {"email": "owner@example.com", "name": "Easy Landscape"},
            "to": [{"email": "owner@example.com"}],
            "subject": "New Landscape Quote Request from Ana",
            "htmlContent": "<h2>New Quote Request</h2>",
            "textContent": "Name: Ana",
            "replyTo": {"email": "ana@example.com"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"messageId": "<id@brevo>"})))
        .expect(1)
        .mount(&server)
        .await;

    let result = service_for(&server).send(quote_message()).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_client_error_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/smtp/email"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Key not found"))
        .mount(&server)
        .await;

    let result = service_for(&server).send(quote_message()).await;
    match result {
        Err(EmailError::ApiError(detail)) => {
            assert!(detail.contains("401"));
            assert!(detail.contains("Key not found"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/smtp/email"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let result = service_for(&server).send(quote_message()).await;
    assert!(matches!(result, Err(EmailError::ApiError(_))));
}

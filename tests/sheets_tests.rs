use easy_landscape_backend::config::SheetsConfig;
use easy_landscape_backend::model::quote::{NormalizedRow, SheetDestination};
use easy_landscape_backend::util::error::DependencyError;
use easy_landscape_backend::util::google_auth::{GoogleAuthError, JWT_BEARER_GRANT};
use easy_landscape_backend::util::sheets::{GoogleSheetsRecorder, RowRecorder, SheetsError};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRIVATE_KEY: &str = include_str!("fixtures/test_service_account_key.pem");

fn recorder_for(server: &MockServer) -> GoogleSheetsRecorder {
    let config = SheetsConfig {
        service_account_email: "relay@easy-landscape.iam.gserviceaccount.com".to_string(),
        private_key: PRIVATE_KEY.to_string(),
        spreadsheet_id: "sid".to_string(),
        token_uri: format!("{}/token", server.uri()),
        api_base: format!("{}/v4", server.uri()),
    };
    GoogleSheetsRecorder::new(config).expect("recorder")
}

fn row() -> NormalizedRow {
    NormalizedRow::new(vec!["x".to_string(), "".to_string()])
}

async fn mount_token(server: &MockServer, expected_calls: u64) {
    let grant = format!("grant_type={}", JWT_BEARER_GRANT.replace(':', "%3A"));
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains(grant))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok",
            "expires_in": 3600,
            "token_type": "Bearer"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_append_reuses_token_across_calls() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sid/values/Construction%20Quotes!A:Z:append"))
        .and(query_param("valueInputOption", "USER_ENTERED"))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(json!({"values": [["x", ""]]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"spreadsheetId": "sid"})))
        .expect(2)
        .mount(&server)
        .await;

    let recorder = recorder_for(&server);
    let first = recorder.append_row(SheetDestination::ConstructionQuotes, row()).await;
    let second = recorder.append_row(SheetDestination::ConstructionQuotes, row()).await;

    assert!(matches!(first, Ok(true)));
    assert!(matches!(second, Ok(true)));
    server.verify().await;
}

#[tokio::test]
async fn test_append_targets_landscape_tab() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sid/values/Landscape%20Quotes!A:Z:append"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let result = recorder_for(&server)
        .append_row(SheetDestination::LandscapeQuotes, row())
        .await;
    assert!(matches!(result, Ok(true)));
}

#[tokio::test]
async fn test_rejected_append_is_an_error() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sid/values/Construction%20Quotes!A:Z:append"))
        .respond_with(ResponseTemplate::new(403).set_body_string("permission denied"))
        .mount(&server)
        .await;

    let result = recorder_for(&server)
        .append_row(SheetDestination::ConstructionQuotes, row())
        .await;
    match result {
        Err(DependencyError::Sheets(SheetsError::Api { status, body })) => {
            assert_eq!(status, 403);
            assert_eq!(body, "permission denied");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_rejected_token_skips_append() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sid/values/Construction%20Quotes!A:Z:append"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = recorder_for(&server)
        .append_row(SheetDestination::ConstructionQuotes, row())
        .await;
    assert!(matches!(
        result,
        Err(DependencyError::Sheets(SheetsError::Auth(GoogleAuthError::TokenRejected { status: 500, .. })))
    ));
}

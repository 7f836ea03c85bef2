use axum::{body::Bytes, extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::{debug, info};

use crate::dto::quote_dto::QuoteResponse;
use crate::model::quote::{FormType, QuoteSubmission};
use crate::service::quote_service::{QuoteService, QuoteServiceImpl};
use crate::util::error::HandlerError;

/// Parses the raw body leniently: an empty body is an empty submission,
/// invalid JSON is an internal error.
fn parse_submission(body: &Bytes) -> Result<QuoteSubmission, HandlerError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        debug!("[parse_submission] Empty request body");
        return Ok(QuoteSubmission::default());
    }
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| HandlerError::internal(format!("Malformed request body: {}", e)))?;
    Ok(QuoteSubmission::from_value(value))
}

async fn process_submission(
    service: &QuoteServiceImpl,
    submission: QuoteSubmission,
) -> Result<Json<QuoteResponse>, HandlerError> {
    let outcome = QuoteService::submit_quote(service, submission).await?;
    Ok(Json(QuoteResponse::from_outcome(&outcome)))
}

// Handler: Submit Quote
pub async fn submit_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    body: Bytes,
) -> Result<impl IntoResponse, HandlerError> {
    info!("[submit_quote_handler] Handler called");
    let submission = parse_submission(&body)?;
    process_submission(&service, submission).await
}

// Handler: Legacy contact form, always routed as a general form
pub async fn submit_legacy_form_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    body: Bytes,
) -> Result<impl IntoResponse, HandlerError> {
    info!("[submit_legacy_form_handler] Handler called");
    let mut submission = parse_submission(&body)?;
    submission.set_form_type(FormType::General);
    process_submission(&service, submission).await
}

// Handler: Diagnostic liveness text
pub async fn test_api_handler(State(service): State<Arc<QuoteServiceImpl>>) -> impl IntoResponse {
    format!(
        "Backend is running (email transport: {}, Google Sheets: {})",
        service.email_transport_name(),
        if service.sheets_enabled() { "enabled" } else { "disabled" }
    )
}

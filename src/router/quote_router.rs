use axum::{Router, routing::{get, post}};
use crate::handler::quote_handler::{
    submit_legacy_form_handler,
    submit_quote_handler,
    test_api_handler,
};
use std::sync::Arc;
use crate::service::quote_service::QuoteServiceImpl;


pub fn quote_router(service: Arc<QuoteServiceImpl>) -> Router {
    Router::new()
        .route("/api/quotes", post(submit_quote_handler))
        .route("/submit-form", post(submit_legacy_form_handler))
        .route("/test-api", get(test_api_handler))
        .with_state(service)
}

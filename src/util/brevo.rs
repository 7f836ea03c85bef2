use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::config::BrevoConfig;
use crate::util::email::{validate_email_address, EmailError, NotificationMessage, NotificationTransport};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BrevoContact {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Body of `POST /v3/smtp/email`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BrevoSendRequest {
    pub sender: BrevoContact,
    pub to: Vec<BrevoContact>,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<BrevoContact>,
}

/// Transactional email delivery through the Brevo HTTP API.
pub struct BrevoEmailService {
    pub config: BrevoConfig,
    client: reqwest::Client,
}

impl BrevoEmailService {
    pub fn new(config: BrevoConfig) -> Result<Self, EmailError> {
        info!("Initializing Brevo email service");
        config.validate().map_err(EmailError::from)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EmailError::ConfigError(format!("HTTP client error: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn build_request(&self, message: &NotificationMessage) -> BrevoSendRequest {
        BrevoSendRequest {
            sender: BrevoContact {
                email: self.config.sender_email.clone(),
                name: Some(self.config.sender_name.clone()),
            },
            to: vec![BrevoContact { email: message.to.clone(), name: None }],
            subject: message.subject.clone(),
            html_content: message.html_body.clone(),
            text_content: message.text_body.clone(),
            reply_to: message
                .reply_to
                .clone()
                .map(|email| BrevoContact { email, name: None }),
        }
    }

    #[instrument(skip(self, message), fields(to = %message.to, subject = %message.subject))]
    pub async fn send_email(&self, message: NotificationMessage) -> Result<(), EmailError> {
        validate_email_address(&message.to)?;
        if message.text_body.is_none() && message.html_body.is_none() {
            return Err(EmailError::MessageError("No message body provided".to_string()));
        }

        let request = self.build_request(&message);
        let response = self
            .client
            .post(&self.config.api_url)
            .header("api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Brevo request failed: {}", e);
                if e.is_timeout() {
                    EmailError::Timeout(self.config.timeout_secs)
                } else {
                    EmailError::ApiError(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Brevo rejected email with status {}: {}", status, body);
            return Err(EmailError::ApiError(format!("Brevo returned {}: {}", status, body)));
        }

        info!("Email sent via Brevo to {}", message.to);
        Ok(())
    }
}

#[async_trait]
impl NotificationTransport for BrevoEmailService {
    fn name(&self) -> &'static str {
        "brevo"
    }

    fn recipient(&self) -> &str {
        &self.config.to_email
    }

    async fn send(&self, message: NotificationMessage) -> Result<(), EmailError> {
        self.send_email(message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service() -> BrevoEmailService {
        BrevoEmailService::new(BrevoConfig::from_test_env()).expect("brevo service")
    }

    #[test]
    fn test_request_payload_shape() {
        let message = NotificationMessage::new(
            "owner@example.com".to_string(),
            "New Quote Request from Ana".to_string(),
        )
        .with_html_body("<h2>New Quote Request</h2>".to_string())
        .with_reply_to("ana@example.com".to_string());

        let payload = serde_json::to_value(service().build_request(&message)).unwrap();
        assert_eq!(
            payload,
            json!({
                "sender": {"email": "owner@example.com", "name": "Easy Landscape"},
                "to": [{"email": "owner@example.com"}],
                "subject": "New Quote Request from Ana",
                "htmlContent": "<h2>New Quote Request</h2>",
                "replyTo": {"email": "ana@example.com"}
            })
        );
    }

    #[tokio::test]
    async fn test_send_rejects_empty_body() {
        let message = NotificationMessage::new("owner@example.com".to_string(), "Subject".to_string());
        let result = service().send(message).await;
        assert!(matches!(result, Err(EmailError::MessageError(_))));
    }

    #[tokio::test]
    async fn test_send_to_unreachable_api_fails() {
        let message = NotificationMessage::new("owner@example.com".to_string(), "Subject".to_string())
            .with_text_body("body".to_string());
        let result = service().send(message).await;
        assert!(result.is_err());
    }
}

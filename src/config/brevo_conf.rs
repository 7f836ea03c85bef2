use std::env;
use tracing::{debug, error, info, warn};

use crate::config::{env_opt, env_required, ConfigError};

/// Settings for the Brevo transactional email API
#[derive(Debug, Clone)]
pub struct BrevoConfig {
    pub api_key: String,
    pub api_url: String,
    pub sender_email: String,
    pub sender_name: String,
    pub to_email: String,
    pub timeout_secs: u64,
}

impl BrevoConfig {
    pub const DEFAULT_API_URL: &'static str = "https://api.brevo.com/v3/smtp/email";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

    /// Expected environment variables:
    /// - BREVO_API_KEY (required)
    /// - TO_EMAIL (required)
    /// - BREVO_SENDER_EMAIL (defaults to TO_EMAIL)
    /// - BREVO_SENDER_NAME (defaults to "Easy Landscape")
    /// - BREVO_API_URL, BREVO_TIMEOUT_SECS
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading Brevo configuration from environment variables");

        let api_key = env_required("BREVO_API_KEY").map_err(|e| {
            error!("BREVO_API_KEY environment variable not found");
            e
        })?;
        debug!("Brevo API key: [REDACTED]");

        let to_email = env_required("TO_EMAIL").map_err(|e| {
            error!("TO_EMAIL environment variable not found");
            e
        })?;
        debug!("Notification recipient: {}", to_email);

        let sender_email = env_opt("BREVO_SENDER_EMAIL").unwrap_or_else(|| to_email.clone());
        let sender_name =
            env_opt("BREVO_SENDER_NAME").unwrap_or_else(|| "Easy Landscape".to_string());
        debug!("Brevo sender: {} <{}>", sender_name, sender_email);

        let api_url = env_opt("BREVO_API_URL").unwrap_or_else(|| Self::DEFAULT_API_URL.to_string());

        let timeout_secs = env::var("BREVO_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or_else(|| {
                warn!("BREVO_TIMEOUT_SECS not set or invalid, defaulting to {}", Self::DEFAULT_TIMEOUT_SECS);
                Self::DEFAULT_TIMEOUT_SECS
            });

        let config = BrevoConfig {
            api_key,
            api_url,
            sender_email,
            sender_name,
            to_email,
            timeout_secs,
        };
        config.validate()?;
        info!("Brevo configuration loaded successfully");
        Ok(config)
    }

    pub fn from_test_env() -> Self {
        BrevoConfig {
            api_key: "test-api-key".to_string(),
            api_url: "http://127.0.0.1:9/v3/smtp/email".to_string(),
            sender_email: "owner@example.com".to_string(),
            sender_name: "Easy Landscape".to_string(),
            to_email: "owner@example.com".to_string(),
            timeout_secs: 2,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.is_empty() {
            return Err(ConfigError::ValidationError("Brevo API key cannot be empty".to_string()));
        }
        if !self.to_email.contains('@') || !self.sender_email.contains('@') {
            return Err(ConfigError::ValidationError(
                "Brevo sender and recipient must be email addresses".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError("Brevo timeout cannot be 0".to_string()));
        }
        Ok(())
    }
}

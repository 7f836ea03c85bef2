use tracing::{debug, error, info};

use crate::config::{env_opt, env_required, ConfigError};

/// Google service account and spreadsheet settings
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// Service account email used as the assertion issuer
    pub service_account_email: String,
    /// PEM encoded RSA private key of the service account
    pub private_key: String,
    /// Target spreadsheet identifier
    pub spreadsheet_id: String,
    /// OAuth token endpoint
    pub token_uri: String,
    /// Sheets REST API base URL
    pub api_base: String,
}

impl SheetsConfig {
    pub const DEFAULT_TOKEN_URI: &'static str = "https://oauth2.googleapis.com/token";
    pub const DEFAULT_API_BASE: &'static str = "https://sheets.googleapis.com/v4";
    pub const SCOPE: &'static str = "https://www.googleapis.com/auth/spreadsheets";

    /// Load Sheets configuration from environment variables
    ///
    /// Expected environment variables:
    /// - GOOGLE_SERVICE_ACCOUNT_EMAIL (required)
    /// - GOOGLE_PRIVATE_KEY (required, literal `\n` sequences allowed)
    /// - GOOGLE_SPREADSHEET_ID (required)
    /// - GOOGLE_TOKEN_URI, GOOGLE_SHEETS_API_BASE (optional overrides)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading Google Sheets configuration from environment variables");

        let service_account_email = env_required("GOOGLE_SERVICE_ACCOUNT_EMAIL").map_err(|e| {
            error!("GOOGLE_SERVICE_ACCOUNT_EMAIL environment variable not found");
            e
        })?;
        debug!("Service account: {}", service_account_email);

        let private_key = env_required("GOOGLE_PRIVATE_KEY")
            .map(|raw| unescape_private_key(&raw))
            .map_err(|e| {
                error!("GOOGLE_PRIVATE_KEY environment variable not found");
                e
            })?;
        debug!("Service account private key loaded (length: {} chars)", private_key.len());

        let spreadsheet_id = env_required("GOOGLE_SPREADSHEET_ID").map_err(|e| {
            error!("GOOGLE_SPREADSHEET_ID environment variable not found");
            e
        })?;
        debug!("Spreadsheet id: {}", spreadsheet_id);

        let token_uri =
            env_opt("GOOGLE_TOKEN_URI").unwrap_or_else(|| Self::DEFAULT_TOKEN_URI.to_string());
        let api_base = env_opt("GOOGLE_SHEETS_API_BASE")
            .unwrap_or_else(|| Self::DEFAULT_API_BASE.to_string());

        let config = SheetsConfig {
            service_account_email,
            private_key,
            spreadsheet_id,
            token_uri,
            api_base,
        };

        config.validate()?;
        info!("Google Sheets configuration loaded successfully");
        Ok(config)
    }

    /// Validate the Sheets configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        debug!("Validating Google Sheets configuration");

        if !self.service_account_email.contains('@') {
            error!("Service account email is malformed");
            return Err(ConfigError::ValidationError(
                "Service account email must be an email address".to_string(),
            ));
        }

        if !self.private_key.contains("PRIVATE KEY") {
            error!("Private key is not PEM encoded");
            return Err(ConfigError::ValidationError(
                "Private key must be a PEM encoded key".to_string(),
            ));
        }

        if self.spreadsheet_id.trim().is_empty() {
            error!("Spreadsheet id cannot be empty");
            return Err(ConfigError::ValidationError("Spreadsheet id cannot be empty".to_string()));
        }

        debug!("Google Sheets configuration validation passed");
        Ok(())
    }
}

/// Keys pasted into `.env` files usually carry escaped newlines.
pub fn unescape_private_key(raw: &str) -> String {
    raw.trim().trim_matches('"').replace("\\n", "\n")
}

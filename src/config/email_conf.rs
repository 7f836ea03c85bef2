use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::{env_opt, env_required, ConfigError};

/// SMTP delivery settings for quote notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// SMTP username, empty for unauthenticated relays
    pub smtp_username: String,
    /// SMTP password, empty for unauthenticated relays
    pub smtp_password: String,
    /// Whether to use TLS encryption
    pub use_tls: bool,
    /// Whether to use STARTTLS
    pub use_starttls: bool,
    /// From email address
    pub from_email: String,
    /// From name (display name)
    pub from_name: String,
    /// Mailbox that receives quote notifications
    pub to_email: String,
    /// Upper bound for one delivery, in seconds
    pub connection_timeout_secs: u64,
}

impl EmailConfig {
    pub const DEFAULT_PORT: u16 = 587;
    pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

    /// Create EmailConfig from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading SMTP configuration from environment variables");

        let smtp_host = env_required("SMTP_HOST").map_err(|e| {
            error!("SMTP_HOST environment variable not found");
            e
        })?;
        debug!("SMTP host: {}", smtp_host);

        let smtp_port = Self::port_or_default(env_opt("SMTP_PORT"));
        debug!("SMTP port: {}", smtp_port);

        let smtp_username = env_opt("SMTP_USERNAME").unwrap_or_default();
        debug!("SMTP username: {}", smtp_username);

        let smtp_password = env_opt("SMTP_PASSWORD").unwrap_or_default();
        debug!("SMTP password: [REDACTED]");

        let use_tls = env::var("SMTP_USE_TLS")
            .unwrap_or_else(|_| {
                warn!("SMTP_USE_TLS not set, defaulting to true");
                "true".to_string()
            })
            .parse::<bool>()
            .unwrap_or(true);
        debug!("SMTP use TLS: {}", use_tls);

        let use_starttls = env::var("SMTP_USE_STARTTLS")
            .unwrap_or_else(|_| {
                warn!("SMTP_USE_STARTTLS not set, defaulting to true");
                "true".to_string()
            })
            .parse::<bool>()
            .unwrap_or(true);
        debug!("SMTP use STARTTLS: {}", use_starttls);

        let to_email = env_required("TO_EMAIL").map_err(|e| {
            error!("TO_EMAIL environment variable not found");
            e
        })?;
        debug!("Notification recipient: {}", to_email);

        let from_email = env_opt("SMTP_FROM_EMAIL").unwrap_or_else(|| {
            warn!("SMTP_FROM_EMAIL not set, sending from TO_EMAIL");
            to_email.clone()
        });
        debug!("From email: {}", from_email);

        let from_name = env_opt("SMTP_FROM_NAME").unwrap_or_else(|| {
            warn!("SMTP_FROM_NAME not set, using default");
            "Easy Landscape".to_string()
        });
        debug!("From name: {}", from_name);

        let connection_timeout_secs = env::var("SMTP_CONNECTION_TIMEOUT")
            .unwrap_or_else(|_| {
                warn!(
                    "SMTP_CONNECTION_TIMEOUT not set, defaulting to {} seconds",
                    Self::DEFAULT_TIMEOUT_SECS
                );
                Self::DEFAULT_TIMEOUT_SECS.to_string()
            })
            .parse::<u64>()
            .unwrap_or(Self::DEFAULT_TIMEOUT_SECS);
        debug!("Connection timeout: {} seconds", connection_timeout_secs);

        let config = EmailConfig {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            use_tls,
            use_starttls,
            from_email,
            from_name,
            to_email,
            connection_timeout_secs,
        };

        config.validate()?;
        info!("SMTP configuration loaded successfully");
        Ok(config)
    }

    /// Parses `SMTP_PORT`, warning and falling back to 587 when unset or invalid.
    pub fn port_or_default(raw: Option<String>) -> u16 {
        match raw {
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
                warn!("Invalid SMTP_PORT value '{}', defaulting to {}", raw, Self::DEFAULT_PORT);
                Self::DEFAULT_PORT
            }),
            None => {
                warn!("SMTP_PORT not set, defaulting to {}", Self::DEFAULT_PORT);
                Self::DEFAULT_PORT
            }
        }
    }

    /// Create EmailConfig for testing
    pub fn from_test_env() -> Self {
        EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: "test".to_string(),
            smtp_password: "test".to_string(),
            use_tls: false,
            use_starttls: false,
            from_email: "test@example.com".to_string(),
            from_name: "Test App".to_string(),
            to_email: "owner@example.com".to_string(),
            connection_timeout_secs: 10,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        info!("Validating SMTP configuration");

        if self.smtp_host.is_empty() {
            error!("SMTP host is empty");
            return Err(ConfigError::ValidationError("SMTP host cannot be empty".to_string()));
        }

        if self.smtp_port == 0 {
            error!("SMTP port is 0");
            return Err(ConfigError::ValidationError("SMTP port cannot be 0".to_string()));
        }

        if self.smtp_username.is_empty() != self.smtp_password.is_empty() {
            error!("SMTP credentials are incomplete");
            return Err(ConfigError::ValidationError(
                "SMTP username and password must be set together".to_string(),
            ));
        }

        if !self.from_email.contains('@') {
            error!("Invalid from email format");
            return Err(ConfigError::ValidationError("Invalid from email format".to_string()));
        }

        if !self.to_email.contains('@') {
            error!("Invalid recipient email format");
            return Err(ConfigError::ValidationError("Invalid recipient email format".to_string()));
        }

        if self.connection_timeout_secs == 0 {
            error!("Connection timeout is 0");
            return Err(ConfigError::ValidationError("Connection timeout cannot be 0".to_string()));
        }

        info!("SMTP configuration validation successful");
        Ok(())
    }

    /// Get SMTP server URL
    pub fn get_smtp_url(&self) -> String {
        format!("{}:{}", self.smtp_host, self.smtp_port)
    }
}

pub mod app_conf;
pub mod brevo_conf;
pub mod email_conf;
pub mod relay_conf;
pub mod sheets_conf;


pub use app_conf::AppConfig;
pub use brevo_conf::BrevoConfig;
pub use email_conf::EmailConfig;
pub use relay_conf::{EmailTransportKind, RelayConfig};
pub use sheets_conf::SheetsConfig;

/// Common configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Reads an optional variable, treating blank values as unset.
pub(crate) fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub(crate) fn env_required(key: &str) -> Result<String, ConfigError> {
    env_opt(key).ok_or_else(|| ConfigError::EnvVarNotFound(key.to_string()))
}

use std::env;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::env_opt;

/// Which email transport delivers quote notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailTransportKind {
    Brevo,
    Smtp,
}

impl EmailTransportKind {
    /// `EMAIL_TRANSPORT` wins; otherwise Brevo when an API key is present,
    /// then SMTP when a host is present. `None` disables email.
    pub fn from_env() -> Option<Self> {
        let explicit = env_opt("EMAIL_TRANSPORT");
        Self::select(
            explicit.as_deref(),
            env_opt("BREVO_API_KEY").is_some(),
            env_opt("SMTP_HOST").is_some(),
        )
    }

    pub fn select(explicit: Option<&str>, has_brevo_key: bool, has_smtp_host: bool) -> Option<Self> {
        match explicit.map(|s| s.trim().to_ascii_lowercase()) {
            Some(ref s) if s == "brevo" => Some(EmailTransportKind::Brevo),
            Some(ref s) if s == "smtp" => Some(EmailTransportKind::Smtp),
            Some(ref s) if s == "none" || s == "disabled" => None,
            Some(other) => {
                warn!("Unknown EMAIL_TRANSPORT '{}', detecting from credentials", other);
                Self::select(None, has_brevo_key, has_smtp_host)
            }
            None if has_brevo_key => Some(EmailTransportKind::Brevo),
            None if has_smtp_host => Some(EmailTransportKind::Smtp),
            None => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EmailTransportKind::Brevo => "brevo",
            EmailTransportKind::Smtp => "smtp",
        }
    }
}

/// Request handling settings of the relay itself
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Fields that must be present and non-empty
    pub required_fields: Vec<String>,
    /// Upper bound for each side effect
    pub side_effect_timeout_secs: u64,
}

impl RelayConfig {
    pub const DEFAULT_SIDE_EFFECT_TIMEOUT_SECS: u64 = 20;

    pub fn from_env() -> Self {
        info!("Loading relay configuration from environment variables");

        let required_fields = env_opt("REQUIRED_FIELDS")
            .map(|raw| parse_field_list(&raw))
            .filter(|fields| !fields.is_empty())
            .unwrap_or_else(default_required_fields);
        debug!("Required fields: {:?}", required_fields);

        let side_effect_timeout_secs = env::var("SIDE_EFFECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(Self::DEFAULT_SIDE_EFFECT_TIMEOUT_SECS);
        debug!("Side effect timeout: {} seconds", side_effect_timeout_secs);

        RelayConfig { required_fields, side_effect_timeout_secs }
    }

    pub fn side_effect_timeout(&self) -> Duration {
        Duration::from_secs(self.side_effect_timeout_secs)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        RelayConfig {
            required_fields: default_required_fields(),
            side_effect_timeout_secs: Self::DEFAULT_SIDE_EFFECT_TIMEOUT_SECS,
        }
    }
}

fn default_required_fields() -> Vec<String> {
    vec!["name".to_string(), "email".to_string()]
}

fn parse_field_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_required_fields() {
        let config = RelayConfig::default();
        assert_eq!(config.required_fields, vec!["name", "email"]);
        assert_eq!(config.side_effect_timeout(), Duration::from_secs(20));
    }

    #[test]
    fn test_parse_field_list() {
        assert_eq!(parse_field_list(" name, email ,phone,,"), vec!["name", "email", "phone"]);
        assert!(parse_field_list(" , ").is_empty());
    }

    #[test]
    fn test_transport_selection() {
        assert_eq!(EmailTransportKind::select(Some("SMTP"), true, false), Some(EmailTransportKind::Smtp));
        assert_eq!(EmailTransportKind::select(Some("brevo"), false, true), Some(EmailTransportKind::Brevo));
        assert_eq!(EmailTransportKind::select(Some("none"), true, true), None);
        assert_eq!(EmailTransportKind::select(None, true, true), Some(EmailTransportKind::Brevo));
        assert_eq!(EmailTransportKind::select(None, false, true), Some(EmailTransportKind::Smtp));
        assert_eq!(EmailTransportKind::select(Some("pigeon"), false, true), Some(EmailTransportKind::Smtp));
        assert_eq!(EmailTransportKind::select(None, false, false), None);
    }
}

use std::env;
use tracing::warn;

pub struct AppConfig {
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub const DEFAULT_PORT: u16 = 3000;

    /// `PORT` wins over `APP_PORT`; unparsable values fall back to 3000.
    pub fn from_env() -> Self {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .or_else(|_| env::var("APP_PORT"))
            .ok()
            .and_then(|s| {
                let parsed = s.trim().parse().ok();
                if parsed.is_none() {
                    warn!("Invalid port value '{}', defaulting to {}", s, Self::DEFAULT_PORT);
                }
                parsed
            })
            .unwrap_or(Self::DEFAULT_PORT);
        AppConfig { host, port }
    }
}

use axum::{Router, middleware, routing::get};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::{info, warn};

use crate::middlewares::cors_middleware::permissive_cors;
use crate::config::{AppConfig, BrevoConfig, EmailConfig, EmailTransportKind, RelayConfig, SheetsConfig};
use crate::router::quote_router::quote_router;
use crate::service::quote_service::QuoteServiceImpl;
use crate::util::brevo::BrevoEmailService;
use crate::util::email::{NotificationTransport, SmtpEmailService};
use crate::util::sheets::{GoogleSheetsRecorder, RowRecorder};


pub struct App {
    config: AppConfig,
    router: Router,
    pub quote_service: Arc<QuoteServiceImpl>,
}

impl App {
    /// Wires the relay from the environment. Missing or invalid credentials
    /// disable the matching side effect instead of failing startup.
    pub fn new() -> Self {
        let config = AppConfig::from_env();
        let relay_config = RelayConfig::from_env();

        let quote_service = Arc::new(QuoteServiceImpl::new(
            Self::build_recorder(),
            Self::build_notifier(),
            relay_config,
        ));

        let router = Self::create_router(quote_service.clone());
        App { config, router, quote_service }
    }

    fn build_recorder() -> Option<Arc<dyn RowRecorder>> {
        let sheets_config = match SheetsConfig::from_env() {
            Ok(c) => c,
            Err(e) => {
                warn!("Google Sheets disabled: {e}");
                return None;
            }
        };
        match GoogleSheetsRecorder::new(sheets_config) {
            Ok(recorder) => Some(Arc::new(recorder) as Arc<dyn RowRecorder>),
            Err(e) => {
                warn!("Google Sheets disabled: {e}");
                None
            }
        }
    }

    fn build_notifier() -> Option<Arc<dyn NotificationTransport>> {
        let kind = match EmailTransportKind::from_env() {
            Some(kind) => kind,
            None => {
                warn!("Email notifications disabled: no BREVO_API_KEY or SMTP_HOST configured");
                return None;
            }
        };
        info!("Using {} email transport", kind.as_str());

        let notifier = match kind {
            EmailTransportKind::Brevo => BrevoConfig::from_env()
                .map_err(Into::into)
                .and_then(BrevoEmailService::new)
                .map(|s| Arc::new(s) as Arc<dyn NotificationTransport>),
            EmailTransportKind::Smtp => EmailConfig::from_env()
                .map_err(Into::into)
                .and_then(SmtpEmailService::new)
                .map(|s| Arc::new(s) as Arc<dyn NotificationTransport>),
        };
        match notifier {
            Ok(n) => Some(n),
            Err(e) => {
                warn!("Email notifications disabled: {e}");
                None
            }
        }
    }

    pub fn create_router(quote_service: Arc<QuoteServiceImpl>) -> Router {
        Router::new()
            .merge(quote_router(quote_service))
            .route("/health", get(|| async { "OK" }))
            .layer(middleware::from_fn(permissive_cors))
    }

    pub async fn start(self) -> Result<(), Box<dyn std::error::Error>> {
        let host: IpAddr = self.config.host.parse()
            .map_err(|e| format!("Invalid APP_HOST '{}': {}", self.config.host, e))?;
        let addr = SocketAddr::new(host, self.config.port);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Server running at http://{}", addr);
        info!("Ready to receive requests at /api/quotes");
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}

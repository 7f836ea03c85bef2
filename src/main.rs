use dotenv::dotenv;
use tracing::{error, info, warn};

use easy_landscape_backend::app::app::App;
use easy_landscape_backend::util::logger::Logger;


#[tokio::main]
async fn main() {
    // Load .env before logging so RUST_LOG and LOG_DIR apply
    let dotenv_result = dotenv();

    let _logger = match Logger::new() {
        Ok(logger) => Some(logger),
        Err(e) => {
            Logger::console_only();
            warn!("File logging unavailable ({}), logging to console only", e);
            None
        }
    };

    info!("🚀 Starting Easy Landscape quote relay");

    match dotenv_result {
        Ok(_) => info!("✅ Successfully loaded .env file"),
        Err(e) => warn!("⚠️ Failed to load .env file: {} (using system env vars)", e),
    }

    let app = App::new();
    if let Err(e) = app.start().await {
        error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}

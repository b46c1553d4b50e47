//! DocShare server: document sharing and access control for FinTuttO apps.
//!
//! Loads configuration, initializes logging and hands over to the API crate.

use tracing_subscriber::{EnvFilter, fmt};

use docshare_core::config::{AppConfig, LoggingConfig};
use docshare_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = docshare_api::run_server(config).await {
        tracing::error!(error = %e, source = ?e.source, "Server error");
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, the `DOCSHARE_ENV` overlay and `DOCSHARE__*`
/// variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("DOCSHARE_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_current_span(false)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

use std::path::Path;
use std::sync::Arc;

use pushdeploy::{AppState, handlers, load_config, logging};
use tracing::{info, warn};

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8700";
const DEFAULT_CONFIG_PATH: &str = "pushdeploy.toml";

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let bind_address =
        std::env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
    let config_path =
        std::env::var("PUSHDEPLOY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let config = match load_config(Path::new(&config_path)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let _log_guard = logging::init(config.log_directory.as_deref());
    info!("Using config at {:?}", config_path);
    info!("Deploying into {:?}", config.repos_root);

    // Read once at startup. Without a secret no delivery can be verified,
    // so everything is rejected until the server is restarted with one.
    let webhook_secret = std::env::var("GITHUB_WEBHOOK_SECRET")
        .ok()
        .filter(|s| !s.is_empty());
    if webhook_secret.is_none() {
        warn!("GITHUB_WEBHOOK_SECRET is not set; all webhook deliveries will be rejected");
    }

    let state = Arc::new(AppState::new(config, webhook_secret));
    let app = handlers::router(state);

    info!("Listening on {}", bind_address);
    let listener = tokio::net::TcpListener::bind(bind_address).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

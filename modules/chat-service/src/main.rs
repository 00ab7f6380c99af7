//! Chat Service: standalone binary serving a bounded, file-backed chat log.
//!
//! Single action endpoint plus a status route.
//! Default: http://127.0.0.1:9110/

mod config;
mod routes;

use config::ServiceConfig;
use ledger_core::{ChatState, Ledger};
use routes::AppState;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = ServiceConfig::from_env();

    log::info!("Opening chat ledger at: {}", config.data_path);
    let ledger = match Ledger::<ChatState>::open(&config.data_path) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to open chat ledger: {}", e);
            std::process::exit(1);
        }
    };
    log::info!(
        "Loaded {} users and {} messages",
        ledger.state().credentials.len(),
        ledger.state().chat.len()
    );

    let state = Arc::new(AppState {
        ledger: Mutex::new(ledger),
        start_time: Instant::now(),
    });

    let cors = tower_http::cors::CorsLayer::permissive();

    let app = axum::Router::new()
        .route(
            "/",
            axum::routing::get(routes::root).post(routes::handle_action),
        )
        .route("/rpc/status", axum::routing::get(routes::status))
        .with_state(state)
        .layer(cors);

    let addr = config.bind_addr();
    log::info!("Chat Service listening on http://{}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        log::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

//! Memo Service: standalone binary serving per-user key/token memos.
//!
//! Single action endpoint plus a status route, with an optional heartbeat.
//! Default: http://127.0.0.1:9111/

mod config;
mod routes;
mod worker;

use config::ServiceConfig;
use ledger_core::{Ledger, MemoState};
use routes::AppState;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = ServiceConfig::from_env();

    log::info!("Opening memo ledger at: {}", config.data_path);
    let ledger = match Ledger::<MemoState>::open(&config.data_path) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to open memo ledger: {}", e);
            std::process::exit(1);
        }
    };
    log::info!(
        "Loaded {} users and {} memo pairs",
        ledger.state().credentials.len(),
        ledger.state().pair_count()
    );

    let state = Arc::new(AppState {
        ledger: Mutex::new(ledger),
        start_time: Instant::now(),
        last_heartbeat_at: Mutex::new(None),
    });

    match config.heartbeat {
        Some(interval) => {
            let worker_state = state.clone();
            tokio::spawn(async move {
                worker::run_heartbeat(worker_state, interval).await;
            });
        }
        None => log::info!("MEMO_SERVICE_HEARTBEAT_SECS not set, heartbeat disabled"),
    }

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
    log::info!("Memo Service listening on http://{}", addr);

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

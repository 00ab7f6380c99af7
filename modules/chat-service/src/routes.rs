//! Axum route handlers for the chat service.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use ledger_core::{ChatState, Ledger};
use ledger_types::*;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

pub struct AppState {
    pub ledger: Mutex<Ledger<ChatState>>,
    pub start_time: Instant,
}

// GET /
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Chat backend is running." }))
}

// POST /
pub async fn handle_action(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ActionRequest>,
) -> (StatusCode, Json<ActionReply>) {
    let mut ledger = state.ledger.lock().await;
    match ledger.execute(&req) {
        Ok(reply) => (StatusCode::OK, Json(reply)),
        Err(e) => {
            log::error!("[CHAT] Failed to persist '{}' action: {}", req.action, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ActionReply::fail(format!("Failed to persist: {}", e))),
            )
        }
    }
}

// GET /rpc/status
pub async fn status(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RpcResponse<ServiceStatus>>) {
    let ledger = state.ledger.lock().await;
    let projection = ledger.state();
    (
        StatusCode::OK,
        Json(RpcResponse::ok(ServiceStatus {
            running: true,
            uptime_secs: state.start_time.elapsed().as_secs(),
            total_users: projection.credentials.len(),
            total_entries: projection.chat.len(),
            last_heartbeat_at: None,
        })),
    )
}

//! Axum route handlers for the memo service.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use ledger_core::{Ledger, MemoState};
use ledger_types::*;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

pub struct AppState {
    pub ledger: Mutex<Ledger<MemoState>>,
    pub start_time: Instant,
    pub last_heartbeat_at: Mutex<Option<String>>,
}

// GET /
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Memo backend is running." }))
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
            log::error!("[MEMO] Failed to persist '{}' action: {}", req.action, e);
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
    let (total_users, total_entries) = {
        let ledger = state.ledger.lock().await;
        (
            ledger.state().credentials.len(),
            ledger.state().pair_count(),
        )
    };
    let last_heartbeat_at = state.last_heartbeat_at.lock().await.clone();

    (
        StatusCode::OK,
        Json(RpcResponse::ok(ServiceStatus {
            running: true,
            uptime_secs: state.start_time.elapsed().as_secs(),
            total_users,
            total_entries,
            last_heartbeat_at,
        })),
    )
}

//! Optional heartbeat for the memo service.
//!
//! Carries no data: each tick records a timestamp reported by `/rpc/status`
//! and logs the ledger size.

use crate::routes::AppState;
use std::sync::Arc;
use std::time::Duration;

pub async fn run_heartbeat(state: Arc<AppState>, interval: Duration) {
    log::info!(
        "[MEMO] Heartbeat started (interval: {}s)",
        interval.as_secs()
    );

    loop {
        tokio::time::sleep(interval).await;
        beat(&state).await;
    }
}

async fn beat(state: &AppState) {
    let (users, pairs) = {
        let ledger = state.ledger.lock().await;
        (
            ledger.state().credentials.len(),
            ledger.state().pair_count(),
        )
    };
    *state.last_heartbeat_at.lock().await = Some(chrono::Utc::now().to_rfc3339());
    log::debug!("[MEMO] Heartbeat: {} users, {} memo pairs", users, pairs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::Ledger;
    use std::time::Instant;
    use tokio::sync::Mutex;

    #[tokio::test]
    async fn test_beat_records_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState {
            ledger: Mutex::new(Ledger::open(dir.path().join("memo_data.txt")).unwrap()),
            start_time: Instant::now(),
            last_heartbeat_at: Mutex::new(None),
        };

        beat(&state).await;

        let stamp = state.last_heartbeat_at.lock().await.clone().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
    }
}

//! Environment configuration for the memo service.

use std::time::Duration;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 9111;
const DEFAULT_DATA_PATH: &str = "./memo_data.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub data_path: String,
    /// Heartbeat period; `None` when unset or zero.
    pub heartbeat: Option<Duration>,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("MEMO_SERVICE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: lookup("MEMO_SERVICE_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            data_path: lookup("MEMO_SERVICE_DATA_PATH")
                .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string()),
            heartbeat: lookup("MEMO_SERVICE_HEARTBEAT_SECS")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

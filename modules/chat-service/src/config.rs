//! Environment configuration for the chat service.

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 9110;
const DEFAULT_DATA_PATH: &str = "./data.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub data_path: String,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("CHAT_SERVICE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: lookup("CHAT_SERVICE_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            data_path: lookup("CHAT_SERVICE_DATA_PATH")
                .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string()),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

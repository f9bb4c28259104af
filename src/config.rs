use crate::error::EntryError;
use std::net::SocketAddr;
use std::time::Duration;

/// 未部署时的占位地址
pub const PLACEHOLDER_ENDPOINT: &str =
    "https://script.google.com/macros/s/YOUR_DEPLOYMENT_ID/exec";
const PLACEHOLDER_MARKER: &str = "YOUR_DEPLOYMENT_ID";

pub const DEFAULT_DATABASE_URL: &str = "sqlite://school_entry.db?mode=rwc";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_LOCK_TIMEOUT_SECS: u64 = 10;

/// 客户端配置：只有一个端点地址
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub endpoint_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let endpoint_url = std::env::var("ENTRY_ENDPOINT_URL")
            .map(|s| s.trim().to_string())
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_ENDPOINT.to_string());
        Self { endpoint_url }
    }

    /// 在发出任何网络请求之前检查端点是否已配置
    pub fn ensure_configured(&self) -> Result<&str, EntryError> {
        if self.endpoint_url.contains(PLACEHOLDER_MARKER) {
            return Err(EntryError::Config(
                "Please configure ENTRY_ENDPOINT_URL first.".to_string(),
            ));
        }
        Ok(&self.endpoint_url)
    }
}

/// 服务端配置
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub lock_timeout: Duration,
    pub school_list_csv: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, EntryError> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let raw_addr =
            std::env::var("ENTRY_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| EntryError::Config(format!("ENTRY_BIND_ADDR={}: {}", raw_addr, e)))?;

        let lock_timeout = match std::env::var("ENTRY_LOCK_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    EntryError::Config(format!("ENTRY_LOCK_TIMEOUT_SECS={}: {}", raw, e))
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_LOCK_TIMEOUT_SECS),
        };

        let school_list_csv = std::env::var("SCHOOL_LIST_CSV")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            database_url,
            bind_addr,
            lock_timeout,
            school_list_csv,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_endpoint_is_rejected_before_network() {
        let cfg = ClientConfig {
            endpoint_url: PLACEHOLDER_ENDPOINT.to_string(),
        };
        assert!(matches!(cfg.ensure_configured(), Err(EntryError::Config(_))));
    }

    #[test]
    fn real_endpoint_passes() {
        let cfg = ClientConfig {
            endpoint_url: "http://127.0.0.1:8080/".to_string(),
        };
        assert_eq!(cfg.ensure_configured().unwrap(), "http://127.0.0.1:8080/");
    }
}

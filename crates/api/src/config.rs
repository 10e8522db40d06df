//! Application configuration loaded from environment variables.

/// Server and gateway configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `GATEWAY_KEY_ID` / `GATEWAY_KEY_SECRET` — payment gateway credentials
/// - `GATEWAY_BASE_URL` — hosted gateway endpoint; unset selects the
///   in-memory gateway (local development)
/// - `CURRENCY` — ISO currency code for gateway amounts (default: `"INR"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub gateway_key_id: String,
    pub gateway_key_secret: String,
    pub gateway_base_url: Option<String>,
    pub currency: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            gateway_key_id: std::env::var("GATEWAY_KEY_ID")
                .unwrap_or_else(|_| "key_test_placeholder".to_string()),
            gateway_key_secret: std::env::var("GATEWAY_KEY_SECRET")
                .unwrap_or_else(|_| "secret_placeholder".to_string()),
            gateway_base_url: std::env::var("GATEWAY_BASE_URL").ok(),
            currency: std::env::var("CURRENCY").unwrap_or_else(|_| "INR".to_string()),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            gateway_key_id: "key_test_placeholder".to_string(),
            gateway_key_secret: "secret_placeholder".to_string(),
            gateway_base_url: None,
            currency: "INR".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.currency, "INR");
        assert!(config.gateway_base_url.is_none());
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }
}

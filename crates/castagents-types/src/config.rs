//! Global configuration types for CastAgents.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! language model gateway, the HTTP server and the simulated wallet.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from `~/.castagents/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub wallet: WalletConfig,
}

/// Settings for the language model gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Upper bound on a single backend call; expiry becomes a backend error.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Override the provider base URL (tests, proxies).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Environment variable holding the API key. `API_KEY` is always tried last.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            base_url: None,
            api_key_env: default_api_key_env(),
        }
    }
}

/// Settings for `castagents serve`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Absolute URL used in frame cards; defaults to `https://{Host header}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_base_url: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_base_url: None,
        }
    }
}

/// Settings for the simulated wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Simulated connection latency.
    #[serde(default = "default_connect_delay_ms")]
    pub connect_delay_ms: u64,

    /// Connect the mock wallet at startup.
    #[serde(default)]
    pub auto_connect: bool,
}

fn default_connect_delay_ms() -> u64 {
    800
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            connect_delay_ms: default_connect_delay_ms(),
            auto_connect: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.gateway.model, "gemini-2.5-flash");
        assert!((config.gateway.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.gateway.timeout_secs, 60);
        assert_eq!(config.gateway.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.wallet.connect_delay_ms, 800);
        assert!(!config.wallet.auto_connect);
    }

    #[test]
    fn test_global_config_deserialize_with_defaults() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config, GlobalConfig::default());
    }

    #[test]
    fn test_global_config_deserialize_partial_sections() {
        let toml_str = r#"
[gateway]
model = "gemini-2.5-pro"
timeout_secs = 15

[server]
port = 8080
public_base_url = "https://castagents.example"
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gateway.model, "gemini-2.5-pro");
        assert_eq!(config.gateway.timeout_secs, 15);
        assert!((config.gateway.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(
            config.server.public_base_url.as_deref(),
            Some("https://castagents.example")
        );
        assert_eq!(config.wallet, WalletConfig::default());
    }

    #[test]
    fn test_global_config_serde_roundtrip() {
        let mut config = GlobalConfig::default();
        config.wallet.auto_connect = true;
        config.gateway.base_url = Some("http://localhost:9999".to_string());
        let json = serde_json::to_string(&config).unwrap();
        let parsed: GlobalConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}

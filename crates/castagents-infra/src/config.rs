//! Global configuration loader for CastAgents.
//!
//! Reads `config.toml` from the data directory (`~/.castagents/` in
//! production) and deserializes it into [`GlobalConfig`]. Falls back to
//! defaults when the file is missing or malformed. Also resolves the model
//! API key from the environment.

use std::path::Path;

use secrecy::SecretString;

use castagents_types::config::{GatewayConfig, GlobalConfig};
use castagents_types::error::ConfigError;

/// Environment variable always consulted after the configured one.
pub const FALLBACK_API_KEY_ENV: &str = "API_KEY";

/// Load global configuration from `{data_dir}/config.toml`.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    load_config_file(&crate::filesystem::config_path(data_dir)).await
}

/// Load configuration from an explicit file path.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config_file(config_path: &Path) -> GlobalConfig {
    let content = match tokio::fs::read_to_string(config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Resolve the model API key from the process environment.
pub fn resolve_api_key(config: &GatewayConfig) -> Result<SecretString, ConfigError> {
    resolve_api_key_with(config, |name| std::env::var(name).ok())
}

/// Resolve the model API key using `lookup` for variable access.
///
/// Tries `config.api_key_env`, then [`FALLBACK_API_KEY_ENV`]. Blank values
/// count as unset.
pub fn resolve_api_key_with(
    config: &GatewayConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    let mut names = vec![config.api_key_env.as_str()];
    if config.api_key_env != FALLBACK_API_KEY_ENV {
        names.push(FALLBACK_API_KEY_ENV);
    }

    names
        .iter()
        .find_map(|name| lookup(*name).filter(|v| !v.trim().is_empty()))
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingApiKey(names.join(", ")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn load_global_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_global_config(tmp.path()).await;
        assert_eq!(config, GlobalConfig::default());
    }

    #[tokio::test]
    async fn load_global_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[gateway]
model = "gemini-2.5-pro"
temperature = 0.3
api_key_env = "CASTAGENTS_KEY"

[wallet]
auto_connect = true
connect_delay_ms = 0
"#,
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.gateway.model, "gemini-2.5-pro");
        assert!((config.gateway.temperature - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.gateway.api_key_env, "CASTAGENTS_KEY");
        assert!(config.wallet.auto_connect);
        assert_eq!(config.wallet.connect_delay_ms, 0);
        assert_eq!(config.server.port, 3000);
    }

    #[tokio::test]
    async fn load_global_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config, GlobalConfig::default());
    }

    #[tokio::test]
    async fn load_config_file_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        tokio::fs::write(&path, "[server]\nport = 9090\n").await.unwrap();
        assert_eq!(load_config_file(&path).await.server.port, 9090);
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn resolve_api_key_prefers_configured_variable() {
        let vars = env(&[("GEMINI_API_KEY", "primary"), ("API_KEY", "fallback")]);
        let key = resolve_api_key_with(&GatewayConfig::default(), |n| vars.get(n).cloned()).unwrap();
        assert_eq!(key.expose_secret(), "primary");
    }

    #[test]
    fn resolve_api_key_falls_back_to_api_key() {
        let vars = env(&[("GEMINI_API_KEY", "  "), ("API_KEY", "fallback")]);
        let key = resolve_api_key_with(&GatewayConfig::default(), |n| vars.get(n).cloned()).unwrap();
        assert_eq!(key.expose_secret(), "fallback");
    }

    #[test]
    fn resolve_api_key_missing_lists_sources() {
        let err = resolve_api_key_with(&GatewayConfig::default(), |_| None).unwrap_err();
        assert_eq!(err.to_string(), "API key not set (looked in: GEMINI_API_KEY, API_KEY)");
    }

    #[test]
    fn resolve_api_key_does_not_repeat_fallback() {
        let config = GatewayConfig {
            api_key_env: "API_KEY".to_string(),
            ..GatewayConfig::default()
        };
        let err = resolve_api_key_with(&config, |_| None).unwrap_err();
        assert_eq!(err.to_string(), "API key not set (looked in: API_KEY)");
    }
}

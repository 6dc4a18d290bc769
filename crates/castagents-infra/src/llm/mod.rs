//! Language model provider implementations.
//!
//! Contains the Gemini implementation of the [`LlmProvider`] trait defined in
//! `castagents-core`, plus the factory functions that turn a
//! [`GatewayConfig`] and a resolved credential into a ready [`ModelGateway`].
//!
//! [`LlmProvider`]: castagents_core::llm::provider::LlmProvider

pub mod gemini;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use castagents_core::agent::gateway::{GatewaySettings, ModelGateway};
use castagents_core::llm::box_provider::BoxLlmProvider;
use castagents_types::config::GatewayConfig;
use castagents_types::error::ConfigError;
use castagents_types::llm::LlmError;

use self::gemini::GeminiProvider;

/// Create a [`BoxLlmProvider`] for the configured backend.
///
/// # Errors
///
/// Returns [`LlmError::AuthenticationFailed`] when the key is missing or blank.
pub fn create_provider(
    config: &GatewayConfig,
    api_key: Option<SecretString>,
) -> Result<BoxLlmProvider, LlmError> {
    let key = api_key
        .filter(|k| !k.expose_secret().trim().is_empty())
        .ok_or(LlmError::AuthenticationFailed)?;

    // Slightly above the gateway timeout so the gateway reports the expiry.
    let http_timeout = Duration::from_secs(config.timeout_secs.saturating_add(5));
    let mut provider = GeminiProvider::new(key, http_timeout)?;
    if let Some(base_url) = config.base_url.as_deref() {
        provider = provider.with_base_url(base_url);
    }
    Ok(BoxLlmProvider::new(provider))
}

/// Build the model gateway from config and the credential lookup result.
///
/// A missing credential still yields a gateway: an unconfigured one that
/// answers every call with a configuration error and never touches the
/// network.
pub fn build_gateway(
    config: &GatewayConfig,
    api_key: Result<SecretString, ConfigError>,
) -> ModelGateway {
    let settings = GatewaySettings::from(config);

    let api_key = match api_key {
        Ok(key) => key,
        Err(err) => {
            tracing::warn!(error = %err, "No API key configured; model calls will fail");
            return ModelGateway::unconfigured(err.to_string(), settings);
        }
    };

    match create_provider(config, Some(api_key)) {
        Ok(provider) => {
            tracing::debug!(provider = provider.name(), model = %settings.model, "Model gateway ready");
            ModelGateway::new(provider, settings)
        }
        Err(err) => {
            tracing::warn!(error = %err, "Failed to create model provider");
            ModelGateway::unconfigured(err.to_string(), settings)
        }
    }
}

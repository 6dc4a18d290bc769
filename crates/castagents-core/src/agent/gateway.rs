//! Language model gateway.
//!
//! `ModelGateway` makes exactly one backend call per invocation, bounded by a
//! timeout, and folds every provider fault into a [`GatewayError`]. An empty
//! answer on a successful call becomes [`EMPTY_ANSWER_FALLBACK`].

use std::time::Duration;

use tracing::{Instrument, debug, info_span, warn};

use castagents_types::config::GatewayConfig;
use castagents_types::llm::{CompletionRequest, GatewayError};

use crate::llm::box_provider::BoxLlmProvider;

/// Answer used when the backend succeeds but returns no text.
pub const EMPTY_ANSWER_FALLBACK: &str = "I couldn't generate a response.";

/// Model parameters attached to every request.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewaySettings {
    pub model: String,
    pub temperature: f64,
    pub timeout: Duration,
}

impl From<&GatewayConfig> for GatewaySettings {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self::from(&GatewayConfig::default())
    }
}

enum Backend {
    Ready(BoxLlmProvider),
    /// No usable credential; carries the reason reported to callers.
    Unconfigured(String),
}

/// The sole boundary to the generative backend.
pub struct ModelGateway {
    backend: Backend,
    settings: GatewaySettings,
}

impl ModelGateway {
    pub fn new(provider: BoxLlmProvider, settings: GatewaySettings) -> Self {
        Self {
            backend: Backend::Ready(provider),
            settings,
        }
    }

    /// A gateway whose credential could not be resolved.
    ///
    /// Every call fails with [`GatewayError::Configuration`] and no network
    /// traffic.
    pub fn unconfigured(reason: impl Into<String>, settings: GatewaySettings) -> Self {
        Self {
            backend: Backend::Unconfigured(reason.into()),
            settings,
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.backend, Backend::Ready(_))
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    /// Run one completion for `policy` (system instruction) and `prompt`.
    pub async fn generate(&self, policy: &str, prompt: &str) -> Result<String, GatewayError> {
        let provider = match &self.backend {
            Backend::Ready(provider) => provider,
            Backend::Unconfigured(reason) => {
                return Err(GatewayError::Configuration(reason.clone()));
            }
        };
        if policy.trim().is_empty() {
            return Err(GatewayError::Configuration(
                "system policy must not be empty".to_string(),
            ));
        }

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            system: policy.to_string(),
            prompt: prompt.to_string(),
            temperature: Some(self.settings.temperature),
        };

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.request.timeout_ms = self.settings.timeout.as_millis() as u64,
        );

        let outcome = tokio::time::timeout(self.settings.timeout, provider.complete(&request))
            .instrument(span)
            .await;

        let response = match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                warn!(error = %err, provider = provider.name(), "Model backend call failed");
                return Err(err.into());
            }
            Err(_) => {
                warn!(
                    timeout_secs = self.settings.timeout.as_secs_f64(),
                    provider = provider.name(),
                    "Model backend call timed out"
                );
                return Err(GatewayError::Backend(format!(
                    "no response within {:?}",
                    self.settings.timeout
                )));
            }
        };

        match response.text {
            Some(text) if !text.trim().is_empty() => {
                debug!(chars = text.len(), finish_reason = ?response.finish_reason, "Model answered");
                Ok(text)
            }
            _ => {
                debug!("Model returned no text; using fallback answer");
                Ok(EMPTY_ANSWER_FALLBACK.to_string())
            }
        }
    }
}

//! Language model request/response types for CastAgents.
//!
//! These types model the single request/response exchange with the generative
//! backend: one system policy, one linearized prompt, one textual answer.

use serde::{Deserialize, Serialize};

/// Request to a language model provider for a single completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    /// Persona policy plus rendered wallet context.
    pub system: String,
    /// Linearized transcript followed by the new user line.
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Response from a language model provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Answer text; `None` when the backend returned no textual content.
    pub text: Option<String>,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Errors from provider-level operations (HTTP, decoding, auth).
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Typed outcome of a failed gateway call.
///
/// The gateway converts every provider fault into one of these two variants;
/// nothing else crosses its boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Credentials or request policy are missing; no network call was made.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The backend failed, timed out, or returned something undecodable.
    #[error("backend error: {0}")]
    Backend(String),
}

impl GatewayError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, GatewayError::Configuration(_))
    }
}

impl From<LlmError> for GatewayError {
    fn from(err: LlmError) -> Self {
        GatewayError::Backend(err.to_string())
    }
}

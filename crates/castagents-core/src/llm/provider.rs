//! LlmProvider trait definition.
//!
//! This is the port every generative backend implements. Uses RPITIT for
//! `complete`; see [`super::box_provider::BoxLlmProvider`] for dynamic dispatch.

use castagents_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for language model backends (Gemini, test stubs).
///
/// Implementations live in castagents-infra (e.g., `GeminiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}

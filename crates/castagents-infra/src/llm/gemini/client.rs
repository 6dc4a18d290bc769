//! GeminiProvider -- concrete [`LlmProvider`] implementation for Google Gemini.
//!
//! Sends a single `generateContent` request per completion. The persona
//! policy goes into `systemInstruction`, the linearized transcript into one
//! user-role content entry.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and only exposed when
//! building the request header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use castagents_core::llm::provider::LlmProvider;
use castagents_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use super::types::{
    Content, ErrorResponse, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};

/// Public Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini provider.
///
/// Does not derive `Debug`; the key never reaches logs.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// `request_timeout` bounds the HTTP exchange; the gateway applies its own
    /// turn timeout on top.
    pub fn new(api_key: SecretString, request_timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    /// Convert a generic [`CompletionRequest`] into a Gemini request body.
    fn to_gemini_request(request: &CompletionRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::text(Some("user"), &request.prompt)],
            system_instruction: Some(Content::text(None, &request.system)),
            generation_config: Some(GenerationConfig {
                temperature: request.temperature,
            }),
        }
    }

    /// Map a non-success HTTP status to an [`LlmError`].
    fn error_for_status(
        status: reqwest::StatusCode,
        retry_after: Option<u64>,
        body: &str,
    ) -> LlmError {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string());

        match status.as_u16() {
            401 | 403 => LlmError::AuthenticationFailed,
            429 => LlmError::RateLimited {
                retry_after_ms: retry_after.map(|secs| secs * 1000),
            },
            400 => LlmError::InvalidRequest(message),
            _ => LlmError::Provider {
                message: format!("HTTP {status}: {message}"),
            },
        }
    }
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = Self::to_gemini_request(request);
        let url = self.url(&request.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            let error_body = response.text().await.unwrap_or_default();
            return Err(Self::error_for_status(status, retry_after, &error_body));
        }

        let gemini_resp: GenerateContentResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        Ok(CompletionResponse {
            text: gemini_resp.text(),
            model: gemini_resp
                .model_version
                .clone()
                .unwrap_or_else(|| request.model.clone()),
            finish_reason: gemini_resp.finish_reason(),
        })
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "gemini-2.5-flash".to_string(),
            system: "You are the Swap Agent.".to_string(),
            prompt: "Previous conversation:\n\nUSER: hi".to_string(),
            temperature: Some(0.7),
        }
    }

    /// Serve one canned HTTP response and hand back the raw request text.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if raw.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }
            let response = format!(
                "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&raw).to_string()
        });

        (base, handle)
    }

    fn provider(base: &str) -> GeminiProvider {
        GeminiProvider::new(SecretString::from("test-key-not-real"), Duration::from_secs(5))
            .unwrap()
            .with_base_url(base)
    }

    #[test]
    fn test_provider_name() {
        let p = GeminiProvider::new(SecretString::from("k"), Duration::from_secs(1)).unwrap();
        assert_eq!(p.name(), "gemini");
        assert_eq!(
            p.url("gemini-2.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_to_gemini_request() {
        let body = serde_json::to_value(GeminiProvider::to_gemini_request(&request())).unwrap();
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "You are the Swap Agent.");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "Previous conversation:\n\nUSER: hi"
        );
        assert_eq!(body["generationConfig"]["temperature"], 0.7);
    }

    #[test]
    fn test_error_for_status() {
        use reqwest::StatusCode;

        assert!(matches!(
            GeminiProvider::error_for_status(StatusCode::FORBIDDEN, None, ""),
            LlmError::AuthenticationFailed
        ));
        assert!(matches!(
            GeminiProvider::error_for_status(StatusCode::TOO_MANY_REQUESTS, Some(3), ""),
            LlmError::RateLimited {
                retry_after_ms: Some(3000)
            }
        ));
        let err = GeminiProvider::error_for_status(
            StatusCode::BAD_REQUEST,
            None,
            r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#,
        );
        assert!(matches!(err, LlmError::InvalidRequest(ref m) if m == "API key not valid"));
        let err = GeminiProvider::error_for_status(StatusCode::BAD_GATEWAY, None, "upstream");
        assert!(err.to_string().contains("502"));
    }

    #[tokio::test]
    async fn test_complete_round_trip() {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"gm"}]},"finishReason":"STOP"}],"modelVersion":"gemini-2.5-flash-001"}"#,
        )
        .await;

        let response = provider(&base).complete(&request()).await.unwrap();
        assert_eq!(response.text.as_deref(), Some("gm"));
        assert_eq!(response.model, "gemini-2.5-flash-001");
        assert_eq!(response.finish_reason.as_deref(), Some("STOP"));

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /v1beta/models/gemini-2.5-flash:generateContent"));
        assert!(raw.to_lowercase().contains("x-goog-api-key: test-key-not-real"));
        assert!(raw.contains("\"systemInstruction\""));
    }

    #[tokio::test]
    async fn test_complete_server_error() {
        let (base, server) = serve_once(
            "HTTP/1.1 500 Internal Server Error",
            r#"{"error":{"code":500,"message":"internal","status":"INTERNAL"}}"#,
        )
        .await;

        let err = provider(&base).complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Provider { ref message } if message.contains("internal")));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_complete_undecodable_body() {
        let (base, server) = serve_once("HTTP/1.1 200 OK", "not json").await;
        let err = provider(&base).complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Deserialization(_)));
        server.await.unwrap();
    }
}

//! Frame card types.
//!
//! The frame endpoint answers social-client card requests with a small JSON
//! card: title, optional image, bullet body and up to a few buttons. The
//! incoming payload is untrusted and loosely shaped, so every field of
//! [`FrameAction`] is optional.

use serde::{Deserialize, Serialize};

/// Visual emphasis of a frame button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Primary,
    Secondary,
}

/// A button rendered on a frame card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameButton {
    pub id: String,
    pub label: String,
    pub style: ButtonStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// External link opened instead of posting back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl FrameButton {
    pub fn new(id: &str, label: &str, style: ButtonStyle) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            style,
            description: None,
            url: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// A card returned by the frame endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameCard {
    pub version: u32,
    pub title: String,
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body: Vec<String>,
    pub buttons: Vec<FrameButton>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// The user's interaction as reported by the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameAction {
    /// Zero-based index into the gallery buttons; a number or numeric string.
    #[serde(default)]
    pub button_index: Option<serde_json::Value>,
    /// Explicit choice; any JSON value, clients are not consistent here.
    #[serde(default)]
    pub selected_id: Option<serde_json::Value>,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
}

/// POST body of the frame endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRequest {
    #[serde(default)]
    pub untrusted_data: Option<FrameAction>,
    #[serde(default)]
    pub untrusted_request: Option<FrameAction>,
}

impl FrameRequest {
    /// The reported action; `untrustedData` wins over `untrustedRequest`.
    pub fn action(&self) -> FrameAction {
        self.untrusted_data
            .clone()
            .or_else(|| self.untrusted_request.clone())
            .unwrap_or_default()
    }
}

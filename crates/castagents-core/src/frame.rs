//! Frame card responder.
//!
//! Maps an untrusted frame interaction to the next card to show. Stateless and
//! independent of the conversation pipeline; the HTTP layer only supplies the
//! public base URL used for images and post-back links.

use castagents_types::frame::{ButtonStyle, FrameAction, FrameButton, FrameCard, FrameRequest};

const FRAME_VERSION: u32 = 1;

pub const NO_CHOICE_ERROR: &str = "No valid choice received. Please pick an option.";

/// Builds frame cards rooted at a public base URL.
#[derive(Debug, Clone)]
pub struct FrameResponder {
    base_url: String,
}

impl FrameResponder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post_url(&self) -> Option<String> {
        Some(format!("{}/api/frame", self.base_url))
    }

    fn image(&self, name: &str) -> Option<String> {
        Some(format!("{}/{name}", self.base_url))
    }

    /// The entry card listing the agents a user can open from the frame.
    pub fn gallery(&self) -> FrameCard {
        FrameCard {
            version: FRAME_VERSION,
            title: "CastAgents: Agent Gallery".to_string(),
            subtitle: "Spawn specialized agents to check balances, scout airdrops, or prepare swaps."
                .to_string(),
            image: self.image("frame-gallery.png"),
            body: Vec::new(),
            buttons: Self::gallery_buttons(),
            post_url: self.post_url(),
            error: None,
            note: None,
        }
    }

    fn gallery_buttons() -> Vec<FrameButton> {
        vec![
            FrameButton::new("wallet", "Wallet Assistant", ButtonStyle::Primary)
                .with_description("Check balances & PnL"),
            FrameButton::new("airdrop", "Airdrop Scout", ButtonStyle::Secondary)
                .with_description("Scan for airdrop eligibility"),
        ]
    }

    /// Resolve which option the user picked.
    ///
    /// An explicit `selectedId` (then `id`) wins when it is not empty, zero,
    /// `false` or `null`; non-string ids are used in their JSON text form.
    /// Otherwise `buttonIndex` is a zero-based index into the gallery
    /// buttons, given as a whole number (`1`, `1.0`) or a numeric string.
    pub fn resolve_choice(action: &FrameAction) -> Option<String> {
        let explicit = [&action.selected_id, &action.id]
            .into_iter()
            .flatten()
            .find_map(choice_text);
        if explicit.is_some() {
            return explicit;
        }

        let index = match action.button_index.as_ref()? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        if !index.is_finite() || index < 0.0 || index.fract() != 0.0 {
            return None;
        }
        Self::gallery_buttons()
            .get(index as usize)
            .map(|b| b.id.clone())
    }

    /// Produce the card for a POSTed interaction.
    pub fn respond(&self, request: &FrameRequest) -> FrameCard {
        let Some(choice) = Self::resolve_choice(&request.action()) else {
            return FrameCard {
                error: Some(NO_CHOICE_ERROR.to_string()),
                ..self.gallery()
            };
        };
        tracing::debug!(%choice, "Frame choice");

        match choice.as_str() {
            "wallet" => self.wallet_preview(),
            "airdrop" => self.airdrop_preview(),
            action if action.contains(':') => self.action_queued(action),
            other => FrameCard {
                note: Some(format!("Unhandled choice: {other}")),
                ..self.gallery()
            },
        }
    }

    fn wallet_preview(&self) -> FrameCard {
        FrameCard {
            version: FRAME_VERSION,
            title: "Wallet Assistant: Preview".to_string(),
            subtitle: "This agent reads balances & suggests PnL checks.".to_string(),
            image: self.image("frame-wallet.png"),
            body: vec![
                "• Reads token balances (read-only).".to_string(),
                "• Suggests PnL & tax notes.".to_string(),
                "• Requires wallet connect to prepare transactions.".to_string(),
            ],
            buttons: vec![
                FrameButton::new("wallet:open", "Open Agent", ButtonStyle::Primary),
                FrameButton::new("wallet:more", "More details", ButtonStyle::Secondary),
            ],
            post_url: self.post_url(),
            error: None,
            note: None,
        }
    }

    fn airdrop_preview(&self) -> FrameCard {
        FrameCard {
            version: FRAME_VERSION,
            title: "Airdrop Scout: Quick Scan".to_string(),
            subtitle: "A fast check of onchain actions & Farcaster activity for airdrop signals."
                .to_string(),
            image: self.image("frame-airdrop.png"),
            body: vec![
                "• Scores your wallet 0-100 for airdrop potential.".to_string(),
                "• Suggests top 3 actions to improve score.".to_string(),
                "• No keys required: read-only analytics.".to_string(),
            ],
            buttons: vec![
                FrameButton::new("airdrop:scan", "Run Scan", ButtonStyle::Primary),
                FrameButton::new("airdrop:details", "Explain scoring", ButtonStyle::Secondary),
            ],
            post_url: self.post_url(),
            error: None,
            note: None,
        }
    }

    fn action_queued(&self, action: &str) -> FrameCard {
        FrameCard {
            version: FRAME_VERSION,
            title: "Agent action queued".to_string(),
            subtitle: format!("You chose: {action}"),
            image: None,
            body: vec![format!(
                "This action will open the mini-agent experience on {}.",
                self.base_url
            )],
            buttons: vec![
                FrameButton::new("open-web", "Open full app", ButtonStyle::Primary)
                    .with_url(self.base_url.clone()),
                FrameButton::new("close", "Close", ButtonStyle::Secondary),
            ],
            post_url: None,
            error: None,
            note: None,
        }
    }
}

/// Text of an explicit choice, or `None` when the value counts as unset.
fn choice_text(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;

    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 0.0 || f.is_nan() => None,
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", f as i64)),
            _ => Some(n.to_string()),
        },
        other => Some(other.to_string()),
    }
}

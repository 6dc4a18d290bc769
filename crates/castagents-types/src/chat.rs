//! Chat message and session-state types for CastAgents.
//!
//! Messages are appended to a per-persona transcript and never reordered or
//! deleted. Only model-role messages can carry a [`Proposal`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::proposal::Proposal;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Model,
    System,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Model => write!(f, "model"),
            MessageRole::System => write!(f, "system"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "model" => Ok(MessageRole::Model),
            "system" => Ok(MessageRole::System),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message in a conversation transcript.
///
/// Fields are private so the "user messages never carry a proposal" rule
/// holds by construction; use [`ChatMessage::user`] or [`ChatMessage::model`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    id: Uuid,
    role: MessageRole,
    content: String,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    proposal: Option<Proposal>,
}

impl ChatMessage {
    fn new(role: MessageRole, content: String, proposal: Option<Proposal>) -> Self {
        Self {
            id: Uuid::now_v7(),
            role,
            content,
            created_at: Utc::now(),
            proposal,
        }
    }

    /// A message typed by the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content.into(), None)
    }

    /// A reply from the model, optionally carrying a transaction proposal.
    pub fn model(content: impl Into<String>, proposal: Option<Proposal>) -> Self {
        Self::new(MessageRole::Model, content.into(), proposal)
    }

    /// A local notice shown in the transcript (never sent to the model).
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content.into(), None)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn proposal(&self) -> Option<&Proposal> {
        self.proposal.as_ref()
    }
}

/// Turn-taking state of a conversation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum TurnState {
    /// Ready to accept user input.
    #[default]
    Idle,
    /// A backend call is in flight for the turn identified by `token`.
    Sending { token: u64 },
}

impl TurnState {
    pub fn is_sending(&self) -> bool {
        matches!(self, TurnState::Sending { .. })
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnState::Idle => write!(f, "idle"),
            TurnState::Sending { token } => write!(f, "sending(#{token})"),
        }
    }
}

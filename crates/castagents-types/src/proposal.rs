//! Transaction proposal types.
//!
//! A [`Proposal`] is the structured, machine-readable transaction descriptor an
//! agent may embed in its reply. The wire format is camelCase JSON:
//!
//! ```json
//! {
//!   "type": "SWAP",
//!   "summary": "Swap 0.1 ETH for DEGEN via Relay",
//!   "protocol": "Relay.link",
//!   "estimatedGas": "0.0004 ETH",
//!   "feeUsd": 1.23,
//!   "steps": [{ "label": "Approve", "description": "Allow Relay to spend ETH" }],
//!   "data": { "route": "base" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of on-chain action a proposal describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProposalKind {
    Swap,
    Bridge,
    Vote,
    Mint,
    Deposit,
}

impl fmt::Display for ProposalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProposalKind::Swap => write!(f, "SWAP"),
            ProposalKind::Bridge => write!(f, "BRIDGE"),
            ProposalKind::Vote => write!(f, "VOTE"),
            ProposalKind::Mint => write!(f, "MINT"),
            ProposalKind::Deposit => write!(f, "DEPOSIT"),
        }
    }
}

impl FromStr for ProposalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SWAP" => Ok(ProposalKind::Swap),
            "BRIDGE" => Ok(ProposalKind::Bridge),
            "VOTE" => Ok(ProposalKind::Vote),
            "MINT" => Ok(ProposalKind::Mint),
            "DEPOSIT" => Ok(ProposalKind::Deposit),
            other => Err(format!("invalid proposal kind: '{other}'")),
        }
    }
}

/// One step of a multi-step transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalStep {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A structured transaction proposal attached to a model message.
///
/// Immutable once attached. `fee_usd` is always a finite, non-negative number
/// when the proposal came out of [`Proposal::from_json`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    #[serde(rename = "type")]
    pub kind: ProposalKind,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<ProposalStep>>,
    /// Opaque auxiliary payload. Absent on the wire means `null`.
    #[serde(default)]
    pub data: serde_json::Value,
    /// Free-text gas estimate (e.g. "0.002 ETH").
    pub estimated_gas: String,
    pub fee_usd: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

impl Proposal {
    /// Parse and validate a proposal from its JSON wire form.
    pub fn from_json(body: &str) -> Result<Self, ProposalError> {
        let proposal: Proposal =
            serde_json::from_str(body).map_err(|e| ProposalError::Json(e.to_string()))?;
        proposal.validate()?;
        Ok(proposal)
    }

    /// Check the constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ProposalError> {
        if !self.fee_usd.is_finite() || self.fee_usd < 0.0 {
            return Err(ProposalError::InvalidFee(self.fee_usd));
        }
        Ok(())
    }
}

/// Reasons an embedded proposal block is rejected.
#[derive(Debug, thiserror::Error)]
pub enum ProposalError {
    #[error("invalid proposal JSON: {0}")]
    Json(String),

    #[error("feeUsd must be a non-negative number, got {0}")]
    InvalidFee(f64),
}

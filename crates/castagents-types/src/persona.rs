//! Persona domain types.
//!
//! A persona is a specialized agent the user can converse with. Each one
//! carries the behavioral policy text sent to the model as the system
//! instruction, plus display metadata for the front-ends.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a built-in agent persona.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonaId {
    #[default]
    WalletAssistant,
    SwapAgent,
    BridgeAgent,
    AirdropScout,
    YieldHunter,
    ReputationAgent,
}

impl PersonaId {
    /// Every persona identifier, in gallery display order.
    pub const ALL: [PersonaId; 6] = [
        PersonaId::WalletAssistant,
        PersonaId::SwapAgent,
        PersonaId::BridgeAgent,
        PersonaId::AirdropScout,
        PersonaId::YieldHunter,
        PersonaId::ReputationAgent,
    ];
}

impl fmt::Display for PersonaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonaId::WalletAssistant => write!(f, "WALLET_ASSISTANT"),
            PersonaId::SwapAgent => write!(f, "SWAP_AGENT"),
            PersonaId::BridgeAgent => write!(f, "BRIDGE_AGENT"),
            PersonaId::AirdropScout => write!(f, "AIRDROP_SCOUT"),
            PersonaId::YieldHunter => write!(f, "YIELD_HUNTER"),
            PersonaId::ReputationAgent => write!(f, "REPUTATION_AGENT"),
        }
    }
}

impl FromStr for PersonaId {
    type Err = String;

    /// Accepts `SWAP_AGENT`, `swap_agent` and `swap-agent`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "WALLET_ASSISTANT" => Ok(PersonaId::WalletAssistant),
            "SWAP_AGENT" => Ok(PersonaId::SwapAgent),
            "BRIDGE_AGENT" => Ok(PersonaId::BridgeAgent),
            "AIRDROP_SCOUT" => Ok(PersonaId::AirdropScout),
            "YIELD_HUNTER" => Ok(PersonaId::YieldHunter),
            "REPUTATION_AGENT" => Ok(PersonaId::ReputationAgent),
            _ => Err(format!("invalid persona id: '{s}'")),
        }
    }
}

/// A specialized agent persona and its behavioral policy.
///
/// Immutable once loaded; personas live for the whole process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub id: PersonaId,
    pub name: String,
    pub description: String,
    /// Opaque icon name for front-ends.
    pub icon: String,
    /// Capability tags, in display order.
    pub capabilities: Vec<String>,
    /// Policy text sent as the model's system instruction.
    pub system_instruction: String,
    pub starter_prompts: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_id_roundtrip() {
        for id in PersonaId::ALL {
            let s = id.to_string();
            let parsed: PersonaId = s.parse().unwrap();
            assert_eq!(id, parsed);
        }
    }

    #[test]
    fn test_persona_id_parse_lenient() {
        assert_eq!("swap-agent".parse::<PersonaId>().unwrap(), PersonaId::SwapAgent);
        assert_eq!(
            "yield_hunter".parse::<PersonaId>().unwrap(),
            PersonaId::YieldHunter
        );
        assert!("trading_bot".parse::<PersonaId>().is_err());
    }

    #[test]
    fn test_persona_id_serde() {
        let json = serde_json::to_string(&PersonaId::AirdropScout).unwrap();
        assert_eq!(json, "\"AIRDROP_SCOUT\"");
        let parsed: PersonaId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, PersonaId::AirdropScout);
    }

    #[test]
    fn test_persona_id_default_is_wallet_assistant() {
        assert_eq!(PersonaId::default(), PersonaId::WalletAssistant);
    }
}

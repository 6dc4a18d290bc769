//! Built-in persona catalogue.
//!
//! Every persona shares [`BASE_POLICY`] (tone, safety rules and the proposal
//! block format) followed by a role-specific paragraph.

use castagents_types::persona::{Persona, PersonaId};

/// Policy text shared by every persona.
pub const BASE_POLICY: &str = r#"You are an intelligent Web3 agent running inside a Farcaster Frame.
Your output must be concise, helpful, and formatted with Markdown.
You have access to the user's connected wallet context (provided in the prompt).
NEVER ask for private keys.

CRITICAL INSTRUCTION FOR DEFI ACTIONS:
For ANY transaction involving SWAPS or BRIDGING, you MUST use "Relay.link" as the underlying protocol.
Do not suggest other DEXs (like Uniswap/1inch) unless explicitly asked to compare. Default to Relay.link.

If the user asks to perform an action (swap, bridge, vote, mint, deposit), you MUST output a JSON block at the end of your response describing the transaction proposal.
The JSON block must be wrapped in ```json code fences, with the opening fence on its own line.
The JSON structure should be:
{
  "type": "SWAP" | "BRIDGE" | "VOTE" | "MINT" | "DEPOSIT",
  "summary": "Swap 1 ETH for USDC via Relay",
  "protocol": "Relay.link" | "Aerodrome" | "Aave",
  "estimatedGas": "0.002 ETH",
  "feeUsd": 5.50,
  "steps": [
    { "label": "Approve USDC", "description": "Allow Relay to spend USDC" },
    { "label": "Bridge to Base", "description": "Execute cross-chain swap" }
  ],
  "data": { ...any mock contract data... }
}"#;

struct PersonaSeed {
    id: PersonaId,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    capabilities: [&'static str; 3],
    role: &'static str,
    starter_prompts: [&'static str; 3],
}

const SEEDS: [PersonaSeed; 6] = [
    PersonaSeed {
        id: PersonaId::WalletAssistant,
        name: "Wallet Assistant",
        description: "Portfolio analysis, PnL tracking, and tax estimation.",
        icon: "Wallet",
        capabilities: ["Read Balances", "Analyze PnL", "Check Allowances"],
        role: "You are the Wallet Assistant. Focus on financial health, portfolio diversification, \
               and analyzing the user's current holdings.",
        starter_prompts: [
            "Analyze my portfolio health",
            "What is my exposure to meme coins?",
            "Summarize my top holdings",
        ],
    },
    PersonaSeed {
        id: PersonaId::SwapAgent,
        name: "Swap Agent",
        description: "Finds the best routes via Relay.link and prepares transactions.",
        icon: "ArrowRightLeft",
        capabilities: ["Relay.link Quotes", "Gas Estimation", "Tx Preparation"],
        role: "You are the Swap Agent. Your goal is to find the best trading routes using Relay.link. \
               Always mention slippage and price impact. When user agrees, generate the JSON proposal.",
        starter_prompts: [
            "Swap 0.1 ETH to DEGEN",
            "Buy $500 USDC on Base",
            "Check ETH price action",
        ],
    },
    PersonaSeed {
        id: PersonaId::BridgeAgent,
        name: "Bridge Agent",
        description: "Cross-chain transfers powered by Relay.link.",
        icon: "Shuffle",
        capabilities: ["Cross-chain Quotes", "Relay Execution", "Bridge Status"],
        role: "You are the Bridge Agent. You specialize in moving assets between chains \
               (Ethereum, Base, Optimism, Arbitrum) using Relay.link.\n\
               Always prioritize speed and low fees. Explain the steps clearly \
               (e.g., \"1. Deposit on Mainnet -> 2. Receive on Base\").",
        starter_prompts: [
            "Bridge ETH to Base",
            "Move USDC from Arb to Op",
            "How long does a bridge take?",
        ],
    },
    PersonaSeed {
        id: PersonaId::AirdropScout,
        name: "Airdrop Scout",
        description: "Analyzes onchain activity for potential eligibility.",
        icon: "Radar",
        capabilities: ["Activity Scan", "Protocol Interaction", "Eligibility Check"],
        role: "You are the Airdrop Scout. Analyze the user's wallet interaction history (simulated). \
               Suggest actions to improve onchain score.",
        starter_prompts: [
            "Check my Base eligibility",
            "How to farm LayerZero?",
            "Score my wallet",
        ],
    },
    PersonaSeed {
        id: PersonaId::YieldHunter,
        name: "Yield Hunter",
        description: "Scans DeFi protocols (Aave, Aerodrome) for best APY.",
        icon: "TrendingUp",
        capabilities: ["Compare APY", "Risk Assessment", "Strategy Plans"],
        role: "You are the Yield Hunter. You analyze DeFi protocols on Base and Ethereum \
               (like Aave, Morpho, Aerodrome) to find the best risk-adjusted yield for the user's assets.\n\
               Always categorize opportunities by Risk (Low/Med/High).\n\
               If a swap or bridge is needed to enter the position, explicitly mention using \
               Relay.link to get the assets there.",
        starter_prompts: [
            "Best yield for USDC?",
            "Where can I lend ETH on Base?",
            "High risk farming strategies",
        ],
    },
    PersonaSeed {
        id: PersonaId::ReputationAgent,
        name: "Reputation Agent",
        description: "Analyzes Farcaster ID and onchain history.",
        icon: "BadgeCheck",
        capabilities: ["Fid Check", "Social Graph", "Onchain Score"],
        role: "You are the Reputation Agent. Look at the intersection of Farcaster social data \
               and onchain history. Issue badges or suggest ways to improve reputation score.",
        starter_prompts: [
            "What is my reputation score?",
            "Check my Farcaster activity",
            "Am I a power user?",
        ],
    },
];

impl PersonaSeed {
    fn build(&self) -> Persona {
        Persona {
            id: self.id,
            name: self.name.to_string(),
            description: self.description.to_string(),
            icon: self.icon.to_string(),
            capabilities: self.capabilities.iter().map(|c| c.to_string()).collect(),
            system_instruction: format!("{BASE_POLICY}\n\n{}", self.role),
            starter_prompts: self.starter_prompts.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Read-only catalogue of personas, keyed by [`PersonaId`].
#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    personas: Vec<Persona>,
}

impl PersonaRegistry {
    /// The six built-in personas, in gallery order.
    pub fn builtin() -> Self {
        Self {
            personas: SEEDS.iter().map(PersonaSeed::build).collect(),
        }
    }

    /// Build a registry from explicit personas (later duplicates are ignored).
    pub fn from_personas(personas: Vec<Persona>) -> Self {
        let mut unique: Vec<Persona> = Vec::with_capacity(personas.len());
        for persona in personas {
            if !unique.iter().any(|p| p.id == persona.id) {
                unique.push(persona);
            }
        }
        Self { personas: unique }
    }

    pub fn get(&self, id: PersonaId) -> Option<&Persona> {
        self.personas.iter().find(|p| p.id == id)
    }

    /// Look up a persona by its textual identifier (`SWAP_AGENT`, `swap-agent`).
    pub fn find(&self, id: &str) -> Option<&Persona> {
        id.parse::<PersonaId>().ok().and_then(|id| self.get(id))
    }

    /// All personas, in display order.
    pub fn list(&self) -> &[Persona] {
        &self.personas
    }
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_every_persona_in_order() {
        let registry = PersonaRegistry::builtin();
        let ids: Vec<PersonaId> = registry.list().iter().map(|p| p.id).collect();
        assert_eq!(ids, PersonaId::ALL.to_vec());
    }

    #[test]
    fn every_policy_starts_with_base_policy() {
        let registry = PersonaRegistry::builtin();
        for persona in registry.list() {
            assert!(persona.system_instruction.starts_with(BASE_POLICY));
            assert!(persona.system_instruction.contains(&persona.name));
            assert_eq!(persona.capabilities.len(), 3);
            assert_eq!(persona.starter_prompts.len(), 3);
        }
    }

    #[test]
    fn swap_agent_metadata() {
        let registry = PersonaRegistry::builtin();
        let swap = registry.get(PersonaId::SwapAgent).unwrap();
        assert_eq!(swap.name, "Swap Agent");
        assert_eq!(
            swap.capabilities,
            vec!["Relay.link Quotes", "Gas Estimation", "Tx Preparation"]
        );
        assert_eq!(swap.starter_prompts[0], "Swap 0.1 ETH to DEGEN");
    }

    #[test]
    fn find_accepts_textual_ids() {
        let registry = PersonaRegistry::builtin();
        assert_eq!(
            registry.find("bridge-agent").map(|p| p.id),
            Some(PersonaId::BridgeAgent)
        );
        assert!(registry.find("nope").is_none());
    }

    #[test]
    fn from_personas_ignores_duplicates() {
        let builtin = PersonaRegistry::builtin();
        let swap = builtin.get(PersonaId::SwapAgent).unwrap().clone();
        let mut renamed = swap.clone();
        renamed.name = "Other".to_string();

        let registry = PersonaRegistry::from_personas(vec![swap, renamed]);
        assert_eq!(registry.list().len(), 1);
        assert_eq!(registry.list()[0].name, "Swap Agent");
        assert!(registry.get(PersonaId::YieldHunter).is_none());
    }
}

//! Context assembly for a single model turn.
//!
//! Builds the system instruction (persona policy plus rendered wallet
//! context) and the linearized prompt (prior turns plus the new user line).
//! Pure: no I/O, same inputs always give the same output.

use std::fmt::Write as _;

use castagents_types::chat::{ChatMessage, MessageRole};
use castagents_types::persona::Persona;
use castagents_types::wallet::WalletSnapshot;

/// Wallet section used whenever the snapshot is not connected.
pub const WALLET_NOT_CONNECTED: &str =
    "User Wallet is NOT connected. Ask them to connect wallet for personalized advice.";

/// The outbound payload for one turn, before model parameters are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledContext {
    /// Persona policy followed by the wallet section.
    pub system: String,
    /// `Previous conversation:` transcript followed by the new user line.
    pub prompt: String,
}

/// Builds the per-turn model context.
///
/// Layout:
/// ```text
/// system:
///   {persona policy}
///
///   User Wallet Context:
///   Address: 0x71C...9A23
///   Tokens: 1.45 ETH ($4640.00), 1250 USDC ($1250.00)
///   Total Value: $5890.00
///
/// prompt:
///   Previous conversation:
///   USER: hi
///   MODEL: hello
///
///   USER: {new text}
/// ```
pub struct ContextAssembler;

impl ContextAssembler {
    /// Assemble the context for a turn.
    ///
    /// `prior_turns` are the transcript messages that precede `user_text`;
    /// the new user message itself must not be included. Local system
    /// notices are never sent to the model.
    pub fn assemble(
        persona: &Persona,
        prior_turns: &[ChatMessage],
        user_text: &str,
        wallet: &WalletSnapshot,
    ) -> AssembledContext {
        AssembledContext {
            system: format!(
                "{}\n\n{}",
                persona.system_instruction,
                Self::render_wallet(wallet)
            ),
            prompt: Self::linearize(prior_turns, user_text),
        }
    }

    /// Deterministic text rendering of a wallet snapshot.
    ///
    /// A disconnected wallet renders as [`WALLET_NOT_CONNECTED`] and never
    /// exposes holdings, even if the snapshot carries stale ones.
    pub fn render_wallet(wallet: &WalletSnapshot) -> String {
        if !wallet.is_connected {
            return WALLET_NOT_CONNECTED.to_string();
        }

        let tokens = if wallet.holdings.is_empty() {
            "none".to_string()
        } else {
            wallet
                .holdings
                .iter()
                .map(|h| format!("{} {} (${:.2})", h.balance, h.symbol, h.value_usd))
                .collect::<Vec<_>>()
                .join(", ")
        };

        format!(
            "User Wallet Context:\nAddress: {}\nTokens: {tokens}\nTotal Value: ${:.2}",
            wallet.address.as_deref().unwrap_or("unknown"),
            wallet.total_value_usd
        )
    }

    /// Linearize prior turns as `ROLE: content` lines, then the new user line.
    pub fn linearize(prior_turns: &[ChatMessage], user_text: &str) -> String {
        let mut prompt = String::from("Previous conversation:\n");
        for message in prior_turns {
            if message.role() == MessageRole::System {
                continue;
            }
            let _ = writeln!(
                prompt,
                "{}: {}",
                message.role().to_string().to_uppercase(),
                message.content()
            );
        }
        let _ = write!(prompt, "\nUSER: {user_text}");
        prompt
    }
}

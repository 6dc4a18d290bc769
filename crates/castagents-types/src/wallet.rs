//! Wallet snapshot types.
//!
//! A [`WalletSnapshot`] is a point-in-time, read-only view of the user's
//! holdings. A new snapshot always replaces the previous one wholesale.

use serde::{Deserialize, Serialize};

/// A single token position in the wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub symbol: String,
    pub balance: f64,
    pub unit_price: f64,
    pub value_usd: f64,
    #[serde(rename = "change24hPct")]
    pub change_24h_pct: f64,
}

/// Point-in-time view of the user's wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSnapshot {
    pub is_connected: bool,
    pub address: Option<String>,
    pub holdings: Vec<Holding>,
    pub total_value_usd: f64,
}

impl WalletSnapshot {
    /// A snapshot of a wallet that is not connected: no address, no holdings.
    pub fn disconnected() -> Self {
        Self {
            is_connected: false,
            address: None,
            holdings: Vec::new(),
            total_value_usd: 0.0,
        }
    }

    /// A connected snapshot; the total is the sum of holding values.
    pub fn connected(address: impl Into<String>, holdings: Vec<Holding>) -> Self {
        let total_value_usd = holdings.iter().map(|h| h.value_usd).sum();
        Self {
            is_connected: true,
            address: Some(address.into()),
            holdings,
            total_value_usd,
        }
    }
}

impl Default for WalletSnapshot {
    fn default() -> Self {
        Self::disconnected()
    }
}

//! Simulated wallet provider.
//!
//! Publishes snapshots through a `tokio::sync::watch` channel: readers always
//! see the latest snapshot, and every change replaces it wholesale. `connect`
//! waits for a configurable delay to mimic a wallet handshake.

use std::time::Duration;

use tokio::sync::watch;

use castagents_core::wallet::WalletSource;
use castagents_types::wallet::{Holding, WalletSnapshot};

/// Address shown for the simulated wallet.
pub const MOCK_ADDRESS: &str = "0x71C...9A23";

/// Fixed holdings of the simulated wallet.
pub fn mock_holdings() -> Vec<Holding> {
    [
        ("ETH", 1.45, 3200.0, 4640.0, 2.5),
        ("USDC", 1250.0, 1.0, 1250.0, 0.01),
        ("DEGEN", 50000.0, 0.045, 2250.0, -5.2),
        ("AERO", 450.0, 1.20, 540.0, 12.4),
    ]
    .into_iter()
    .map(|(symbol, balance, unit_price, value_usd, change_24h_pct)| Holding {
        symbol: symbol.to_string(),
        balance,
        unit_price,
        value_usd,
        change_24h_pct,
    })
    .collect()
}

/// Wallet provider backed by fixed mock data.
pub struct MockWalletProvider {
    state: watch::Sender<WalletSnapshot>,
    connect_delay: Duration,
}

impl MockWalletProvider {
    /// A disconnected mock wallet.
    pub fn new(connect_delay: Duration) -> Self {
        let (state, _) = watch::channel(WalletSnapshot::disconnected());
        Self {
            state,
            connect_delay,
        }
    }

    /// Simulate a wallet connection and publish the mock holdings.
    pub async fn connect(&self) -> WalletSnapshot {
        if !self.connect_delay.is_zero() {
            tokio::time::sleep(self.connect_delay).await;
        }
        let snapshot = WalletSnapshot::connected(MOCK_ADDRESS, mock_holdings());
        self.state.send_replace(snapshot.clone());
        tracing::info!(address = MOCK_ADDRESS, total_usd = snapshot.total_value_usd, "Wallet connected");
        snapshot
    }

    /// Publish the disconnected snapshot.
    pub fn disconnect(&self) -> WalletSnapshot {
        let snapshot = WalletSnapshot::disconnected();
        self.state.send_replace(snapshot.clone());
        tracing::info!("Wallet disconnected");
        snapshot
    }

    /// Observe snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<WalletSnapshot> {
        self.state.subscribe()
    }
}

impl WalletSource for MockWalletProvider {
    fn snapshot(&self) -> WalletSnapshot {
        self.state.borrow().clone()
    }
}

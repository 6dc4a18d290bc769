//! Wallet snapshot port.
//!
//! The pipeline only ever reads a point-in-time [`WalletSnapshot`]; how it is
//! produced (mock, real connector) lives in castagents-infra.

use castagents_types::wallet::WalletSnapshot;

/// Source of the current wallet snapshot.
pub trait WalletSource: Send + Sync {
    /// The current snapshot. Never blocks.
    fn snapshot(&self) -> WalletSnapshot;
}

/// A wallet source that always returns the same snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticWallet(pub WalletSnapshot);

impl WalletSource for StaticWallet {
    fn snapshot(&self) -> WalletSnapshot {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_wallet_returns_its_snapshot() {
        let wallet = StaticWallet(WalletSnapshot::connected("0x1", Vec::new()));
        assert!(wallet.snapshot().is_connected);
        assert!(!StaticWallet::default().snapshot().is_connected);
    }
}

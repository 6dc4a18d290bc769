//! Wallet snapshot providers.

pub mod mock;

pub use mock::MockWalletProvider;

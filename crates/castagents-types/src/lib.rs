//! Shared domain types for CastAgents.
//!
//! This crate contains the domain types used across the CastAgents workspace:
//! Persona, WalletSnapshot, ChatMessage, Proposal, frame cards, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod frame;
pub mod llm;
pub mod persona;
pub mod proposal;
pub mod wallet;

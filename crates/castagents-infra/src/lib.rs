//! Infrastructure layer for CastAgents.
//!
//! Contains the adapters for the ports defined in `castagents-core`: the
//! Gemini language model provider, TOML configuration and credential
//! resolution, data directory layout, and the simulated wallet.

pub mod config;
pub mod filesystem;
pub mod llm;
pub mod wallet;

//! Conversation pipeline and port traits for CastAgents.
//!
//! This crate holds the business logic (context assembly, the model gateway,
//! proposal extraction, the conversation state machine) and defines the
//! "ports" the infrastructure layer implements. It depends only on
//! `castagents-types` -- never on `castagents-infra` or any HTTP crate.

pub mod agent;
pub mod chat;
pub mod frame;
pub mod llm;
pub mod persona;
pub mod wallet;

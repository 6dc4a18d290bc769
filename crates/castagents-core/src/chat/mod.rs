//! Conversation state machine and the async turn driver built on it.
//!
//! - `ConversationSession`: pure `Idle -> Sending -> Idle` state machine that
//!   owns the transcript
//! - `ChatService`: runs one turn end to end (assemble, generate, extract)

pub mod service;
pub mod session;

pub use service::ChatService;
pub use session::{ConversationSession, PendingTurn, SessionEffect, SessionEvent};

//! The agent response pipeline.
//!
//! - `ContextAssembler`: persona policy + wallet context + linearized transcript
//! - `ModelGateway`: the single boundary crossing to the generative backend
//! - `ProposalExtractor`: splits a raw answer into display text and an optional proposal

pub mod context;
pub mod gateway;
pub mod proposal;

pub use context::{AssembledContext, ContextAssembler};
pub use gateway::{GatewaySettings, ModelGateway};
pub use proposal::{Extraction, ProposalExtractor};

//! Interactive CLI chat experience for CastAgents.
//!
//! Implements the chat loop: markdown-rendered replies, proposal cards, a
//! thinking spinner, welcome banners and slash commands. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;

//! CLI command definitions for the `castagents` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod agents;
pub mod ask;
pub mod chat;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with Web3 agent personas from your terminal or over HTTP.
#[derive(Parser)]
#[command(name = "castagents", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Read configuration from this file instead of the data directory.
    #[arg(long, global = true, env = "CASTAGENTS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, hide = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the available agent personas.
    #[command(alias = "ls")]
    Agents,

    /// Start an interactive chat session.
    Chat {
        /// Persona to start with (e.g. swap-agent). Defaults to the wallet assistant.
        #[arg(long, short)]
        agent: Option<String>,

        /// Connect the simulated wallet before the first message.
        #[arg(long)]
        connect_wallet: bool,
    },

    /// Ask a persona a single question and print the answer.
    Ask {
        /// Persona identifier (e.g. SWAP_AGENT or swap-agent).
        agent: String,

        /// The message to send.
        message: String,

        /// Connect the simulated wallet first.
        #[arg(long)]
        connect_wallet: bool,
    },

    /// Start the REST API and frame server.
    Serve {
        /// Port to listen on (default from config, else 3000).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (default from config, else 127.0.0.1).
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_chat_flags() {
        let cli = Cli::try_parse_from([
            "castagents",
            "chat",
            "--agent",
            "swap-agent",
            "--connect-wallet",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Chat {
                agent,
                connect_wallet,
            } => {
                assert_eq!(agent.as_deref(), Some("swap-agent"));
                assert!(connect_wallet);
            }
            _ => panic!("expected chat"),
        }
    }

    #[test]
    fn test_parse_ask_with_global_json() {
        let cli = Cli::try_parse_from(["castagents", "--json", "ask", "SWAP_AGENT", "Swap 0.1 ETH"])
            .unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Ask { ref agent, ref message, connect_wallet: false }
                if agent == "SWAP_AGENT" && message == "Swap 0.1 ETH"
        ));
    }
}

//! Slash command parsing for the chat loop.

use console::style;

/// Wallet sub-action for `/wallet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletAction {
    Show,
    Connect,
    Disconnect,
}

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    /// List personas.
    Agents,
    /// Switch to another persona (clears the conversation).
    Agent(String),
    Wallet(WalletAction),
    /// Show the conversation so far.
    History,
    /// Clear the terminal screen.
    Clear,
    Exit,
    /// Unknown command or bad arguments; carries the message to show.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd.to_lowercase(), arg.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/agents" => ChatCommand::Agents,
        "/agent" | "/a" => {
            if arg.is_empty() {
                ChatCommand::Unknown("/agent requires an agent id".to_string())
            } else {
                ChatCommand::Agent(arg.to_string())
            }
        }
        "/wallet" | "/w" => match arg.to_lowercase().as_str() {
            "" | "status" => ChatCommand::Wallet(WalletAction::Show),
            "connect" => ChatCommand::Wallet(WalletAction::Connect),
            "disconnect" => ChatCommand::Wallet(WalletAction::Disconnect),
            other => ChatCommand::Unknown(format!("/wallet {other}")),
        },
        "/history" => ChatCommand::History,
        "/clear" | "/cls" => ChatCommand::Clear,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    let rows = [
        ("/help", "Show this help message"),
        ("/agents", "List available agents"),
        ("/agent <ID>", "Switch agent (clears the conversation)"),
        ("/wallet", "Show wallet holdings"),
        ("/wallet connect", "Connect the simulated wallet"),
        ("/wallet disconnect", "Disconnect the wallet"),
        ("/history", "Show conversation history"),
        ("/clear", "Clear the screen"),
        ("/exit", "End the chat session"),
    ];
    for (cmd, help) in rows {
        println!("  {} {}", style(format!("{cmd:<20}")).cyan(), help);
    }
    println!();
    println!(
        "  {}",
        style("Ctrl+D to exit, Ctrl+C is safe (no message loss)").dim()
    );
    println!();
}

//! Main chat loop orchestration.
//!
//! Resolves the starting persona, optionally connects the wallet, prints the
//! banner and then alternates between reading input and running turns
//! through a [`ChatService`].

use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use castagents_core::chat::ChatService;
use castagents_core::wallet::WalletSource;
use castagents_types::chat::{ChatMessage, MessageRole};
use castagents_types::persona::{Persona, PersonaId};
use castagents_types::wallet::WalletSnapshot;

use crate::cli::agents::{agents_table, resolve_agent};
use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand, WalletAction};
use super::input::{ChatInput, InputEvent, prompt_for};
use super::renderer::{ChatRenderer, ThinkingIndicator, persona_accent};

/// Connect the simulated wallet behind a spinner.
pub async fn connect_wallet(state: &AppState) -> WalletSnapshot {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Connecting wallet...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    let snapshot = state.wallet.connect().await;
    spinner.finish_and_clear();
    snapshot
}

/// Run one turn with a spinner and print the reply.
pub async fn run_turn(
    service: &ChatService,
    renderer: &ChatRenderer,
    persona: &Persona,
    model: &str,
    text: &str,
) {
    let indicator = ThinkingIndicator::watch(service.subscribe(), "thinking...");
    let start = Instant::now();
    let result = service.send(text).await;
    indicator.stop();

    match result {
        Ok(reply) => {
            print_reply(renderer, persona, &reply);
            renderer.print_reply_footer(start.elapsed().as_millis() as u64, model);
            println!();
        }
        Err(e) => {
            eprintln!("\n  {} {e}\n", style("!").yellow().bold());
        }
    }
}

/// Print a model reply with its proposal card, if any.
pub fn print_reply(renderer: &ChatRenderer, persona: &Persona, reply: &ChatMessage) {
    println!("\n  {}", style(&persona.name).cyan().bold());
    let rendered = renderer.render_final(reply.content());
    for line in rendered.trim_end().lines() {
        println!("  {line}");
    }
    if let Some(proposal) = reply.proposal() {
        println!();
        println!("{}", renderer.render_proposal(proposal));
        println!(
            "  {}",
            style("Review the proposal before signing anything in your wallet.").dim()
        );
    }
}

fn print_history(service: &ChatService, persona: &Persona) {
    let transcript = service.transcript();
    println!();
    if transcript.is_empty() {
        println!("  {}", style("No messages yet.").dim());
    }
    for msg in &transcript {
        let label = match msg.role() {
            MessageRole::User => style("You".to_string()).green(),
            MessageRole::Model => style(persona.name.clone()).cyan(),
            MessageRole::System => style("System".to_string()).dim(),
        };
        let content = msg.content();
        let preview = if content.chars().count() > 100 {
            format!("{}...", content.chars().take(97).collect::<String>())
        } else {
            content.to_string()
        };
        let marker = if msg.proposal().is_some() { " [proposal]" } else { "" };
        println!("  {} {}{}", label.bold(), preview, style(marker).dim());
    }
    println!();
}

/// Run the interactive chat loop.
pub async fn run_chat_loop(
    state: &AppState,
    agent: Option<&str>,
    connect_wallet_first: bool,
) -> anyhow::Result<()> {
    let persona_id = match agent {
        Some(raw) => resolve_agent(state, raw)?,
        None => PersonaId::default(),
    };
    let service = state.chat_service(persona_id);
    let model = state.gateway.settings().model.clone();

    if !state.gateway.is_configured() {
        eprintln!(
            "\n  {} No API key found. Set GEMINI_API_KEY (or API_KEY) to get real answers.",
            style("!").yellow().bold()
        );
    }

    if connect_wallet_first {
        connect_wallet(state).await;
    }

    let mut persona = service.active_persona()?;
    let mut renderer = ChatRenderer::new(Some(persona_accent(persona.id)));
    print_welcome_banner(&persona, &model, &state.wallet.snapshot());
    info!(persona = %persona.id, "Chat session started");

    let (mut chat_input, _writer) = ChatInput::new(prompt_for(&persona.name))
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) if text.is_empty() => continue,
            InputEvent::Message(text) => text,
        };

        let Some(cmd) = commands::parse(&text) else {
            run_turn(&service, &renderer, &persona, &model, &text).await;
            continue;
        };

        match cmd {
            ChatCommand::Help => commands::print_help(),
            ChatCommand::Agents => {
                println!("\n{}\n", agents_table(state.registry.list()));
            }
            ChatCommand::Agent(raw) => {
                let next = match resolve_agent(state, &raw) {
                    Ok(id) => id,
                    Err(e) => {
                        println!("\n  {} {e}\n", style("?").yellow().bold());
                        continue;
                    }
                };
                service.select_persona(next)?;
                persona = service.active_persona()?;
                renderer = ChatRenderer::new(Some(persona_accent(persona.id)));
                chat_input.update_prompt(&prompt_for(&persona.name));
                print_welcome_banner(&persona, &model, &state.wallet.snapshot());
            }
            ChatCommand::Wallet(action) => {
                let snapshot = match action {
                    WalletAction::Show => state.wallet.snapshot(),
                    WalletAction::Connect => connect_wallet(state).await,
                    WalletAction::Disconnect => state.wallet.disconnect(),
                };
                println!("\n{}\n", renderer.render_wallet(&snapshot));
            }
            ChatCommand::History => print_history(&service, &persona),
            ChatCommand::Clear => chat_input.clear(),
            ChatCommand::Exit => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            ChatCommand::Unknown(what) => {
                println!(
                    "\n  {} Unknown command: {}. Type /help for available commands.\n",
                    style("?").yellow().bold(),
                    style(what).dim()
                );
            }
        }
    }

    info!(messages = service.transcript().len(), "Chat session ended");
    Ok(())
}

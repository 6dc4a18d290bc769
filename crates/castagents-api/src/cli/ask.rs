//! One-shot question: `castagents ask AGENT MESSAGE`.

use std::time::Instant;

use anyhow::Result;

use castagents_core::chat::session::CONFIGURATION_FAILURE_REPLY;

use crate::cli::agents::resolve_agent;
use crate::cli::chat::loop_runner::{connect_wallet, print_reply};
use crate::cli::chat::renderer::{ChatRenderer, ThinkingIndicator, persona_accent};
use crate::state::AppState;

/// Send a single message to a persona and print the reply.
///
/// With `--json` the reply message (including any proposal) is printed as
/// JSON. Exits with an error when no API key is configured.
pub async fn ask(
    state: &AppState,
    agent: &str,
    message: &str,
    connect_wallet_first: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let persona_id = resolve_agent(state, agent)?;
    let service = state.chat_service(persona_id);
    let persona = service.active_persona()?;

    if connect_wallet_first {
        connect_wallet(state).await;
    }

    let start = Instant::now();
    let indicator = (!json && !quiet)
        .then(|| ThinkingIndicator::watch(service.subscribe(), "thinking..."));
    let result = service.send(message).await;
    if let Some(indicator) = indicator {
        indicator.stop();
    }
    let reply = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        let renderer = ChatRenderer::new(Some(persona_accent(persona.id)));
        print_reply(&renderer, &persona, &reply);
        if !quiet {
            renderer.print_reply_footer(
                start.elapsed().as_millis() as u64,
                &state.gateway.settings().model,
            );
        }
    }

    if reply.content() == CONFIGURATION_FAILURE_REPLY {
        anyhow::bail!("no API key configured (set GEMINI_API_KEY or API_KEY)");
    }
    Ok(())
}

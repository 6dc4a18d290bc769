//! Persona listing: `castagents agents`.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use castagents_types::persona::{Persona, PersonaId};

use crate::state::AppState;

/// Print the persona catalogue as a table, or as JSON with `--json`.
pub fn list_agents(state: &AppState, json: bool) -> Result<()> {
    let personas = state.registry.list();

    if json {
        println!("{}", serde_json::to_string_pretty(personas)?);
        return Ok(());
    }

    println!();
    println!("{}", agents_table(personas));
    println!();
    println!(
        "  {}",
        style("Start a chat with: castagents chat --agent <ID>").dim()
    );
    println!();
    Ok(())
}

pub fn agents_table(personas: &[Persona]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Description").fg(Color::White),
        Cell::new("Capabilities").fg(Color::White),
    ]);

    for persona in personas {
        let id_cell = if persona.id == PersonaId::default() {
            Cell::new(format!("{} *", persona.id)).fg(Color::Cyan)
        } else {
            Cell::new(persona.id.to_string()).fg(Color::Cyan)
        };
        table.add_row(vec![
            id_cell,
            Cell::new(&persona.name),
            Cell::new(&persona.description),
            Cell::new(persona.capabilities.join(", ")).fg(Color::DarkGrey),
        ]);
    }

    table
}

/// Resolve a user-supplied persona id, listing valid ids on failure.
pub fn resolve_agent(state: &AppState, input: &str) -> Result<PersonaId> {
    state.resolve_persona(input).ok_or_else(|| {
        let valid: Vec<String> = PersonaId::ALL.iter().map(|id| id.to_string()).collect();
        anyhow::anyhow!(
            "Unknown agent '{input}'. Valid agents: {}",
            valid.join(", ")
        )
    })
}

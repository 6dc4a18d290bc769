//! Terminal rendering for agent replies.
//!
//! `ChatRenderer` combines `termimad` for prose and `syntect` for fenced code
//! blocks. Proposals are drawn as a bordered card below the reply text.

use std::time::Duration;

use comfy_table::{Cell, ContentArrangement, Table, presets};
use crossterm::style::Color;
use indicatif::{ProgressBar, ProgressStyle};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use castagents_types::persona::PersonaId;
use castagents_types::proposal::{Proposal, ProposalKind};
use castagents_types::wallet::WalletSnapshot;

/// Terminal markdown renderer with syntax highlighting.
pub struct ChatRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

/// Accent color used for a persona's name, headers and bold text.
pub fn persona_accent(id: PersonaId) -> Color {
    match id {
        PersonaId::WalletAssistant => Color::Cyan,
        PersonaId::SwapAgent => Color::Magenta,
        PersonaId::BridgeAgent => Color::Blue,
        PersonaId::AirdropScout => Color::Yellow,
        PersonaId::YieldHunter => Color::Green,
        PersonaId::ReputationAgent => Color::Rgb {
            r: 255,
            g: 140,
            b: 0,
        },
    }
}

impl ChatRenderer {
    /// Create a new renderer with an optional accent color for the persona.
    pub fn new(accent_color: Option<Color>) -> Self {
        let mut skin = MadSkin::default_dark();

        if let Some(color) = accent_color {
            let tc = Self::crossterm_to_termimad(color);
            skin.bold.set_fg(tc);
            skin.headers[0].set_fg(tc);
            skin.headers[1].set_fg(tc);
        }

        skin.inline_code
            .set_fg(termimad::crossterm::style::Color::Yellow);

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Render a complete markdown reply with syntax-highlighted code blocks.
    pub fn render_final(&self, markdown: &str) -> String {
        let mut output = String::new();
        let mut in_code_block = false;
        let mut code_lang = String::new();
        let mut code_buf = String::new();

        for line in markdown.lines() {
            let is_fence = line.trim_start().starts_with("```");
            if is_fence && !in_code_block {
                in_code_block = true;
                code_lang = line.trim().trim_start_matches('`').trim().to_string();
                code_buf.clear();
            } else if is_fence {
                in_code_block = false;
                output.push_str(&self.highlight_code(&code_buf, &code_lang));
                output.push('\n');
            } else if in_code_block {
                code_buf.push_str(line);
                code_buf.push('\n');
            } else {
                output.push_str(&self.skin.term_text(line).to_string());
            }
        }

        // Unclosed fence: show what we have.
        if in_code_block && !code_buf.is_empty() {
            output.push_str(&self.highlight_code(&code_buf, &code_lang));
        }

        output
    }

    /// Render a proposal as a bordered card.
    pub fn render_proposal(&self, proposal: &Proposal) -> String {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL_CONDENSED);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new(format!("{} {}", kind_marker(proposal.kind), proposal.kind))
                .fg(comfy_table::Color::Cyan),
            Cell::new(&proposal.summary),
        ]);

        if let Some(protocol) = &proposal.protocol {
            table.add_row(vec![Cell::new("Protocol"), Cell::new(protocol)]);
        }
        if let Some(steps) = &proposal.steps {
            for (i, step) in steps.iter().enumerate() {
                let text = match &step.description {
                    Some(desc) => format!("{} ({desc})", step.label),
                    None => step.label.clone(),
                };
                table.add_row(vec![Cell::new(format!("Step {}", i + 1)), Cell::new(text)]);
            }
        }
        table.add_row(vec![Cell::new("Est. gas"), Cell::new(&proposal.estimated_gas)]);
        table.add_row(vec![
            Cell::new("Fee"),
            Cell::new(format!("${:.2}", proposal.fee_usd)).fg(comfy_table::Color::Green),
        ]);

        table.to_string()
    }

    /// Render a wallet snapshot as a holdings table.
    pub fn render_wallet(&self, wallet: &WalletSnapshot) -> String {
        if !wallet.is_connected {
            return format!("  {}", console::style("Wallet not connected.").dim());
        }

        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL_CONDENSED);
        table.set_header(vec!["Token", "Balance", "Price", "Value", "24h"]);
        for h in &wallet.holdings {
            let change = Cell::new(format!("{:+.2}%", h.change_24h_pct)).fg(
                if h.change_24h_pct >= 0.0 {
                    comfy_table::Color::Green
                } else {
                    comfy_table::Color::Red
                },
            );
            table.add_row(vec![
                Cell::new(&h.symbol),
                Cell::new(h.balance),
                Cell::new(format!("${}", h.unit_price)),
                Cell::new(format!("${:.2}", h.value_usd)),
                change,
            ]);
        }

        format!(
            "  {} {}\n{table}\n  {} ${:.2}",
            console::style("Address:").bold(),
            wallet.address.as_deref().unwrap_or("unknown"),
            console::style("Total:").bold(),
            wallet.total_value_usd,
        )
    }

    /// Print the footer after an agent reply.
    ///
    /// Format: "| {time}s . {model}"
    pub fn print_reply_footer(&self, response_ms: u64, model: &str) {
        let seconds = response_ms as f64 / 1000.0;
        println!(
            "\n  {} {:.1}s {} {}",
            console::style("|").dim(),
            console::style(seconds).dim(),
            console::style("\u{00b7}").dim(),
            console::style(model).dim(),
        );
    }

    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = if lang.is_empty() {
            self.syntax_set.find_syntax_plain_text()
        } else {
            self.syntax_set
                .find_syntax_by_token(lang)
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
        };

        let mut output = format!("  {}\n", console::style(format!("--- {lang} ---")).dim());
        let Some(theme) = self.theme_set.themes.get("base16-ocean.dark") else {
            for line in code.lines() {
                output.push_str(&format!("  {line}\n"));
            }
            return output;
        };
        let mut h = HighlightLines::new(syntax, theme);

        for line in code.lines() {
            let ranges: Vec<(Style, &str)> = h
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&format!("  {escaped}\x1b[0m\n"));
        }

        output
    }

    fn crossterm_to_termimad(color: Color) -> termimad::crossterm::style::Color {
        match color {
            Color::Cyan => termimad::crossterm::style::Color::Cyan,
            Color::Green => termimad::crossterm::style::Color::Green,
            Color::Yellow => termimad::crossterm::style::Color::Yellow,
            Color::Magenta => termimad::crossterm::style::Color::Magenta,
            Color::Blue => termimad::crossterm::style::Color::Blue,
            Color::Red => termimad::crossterm::style::Color::Red,
            Color::Rgb { r, g, b } => termimad::crossterm::style::Color::Rgb { r, g, b },
            _ => termimad::crossterm::style::Color::Cyan,
        }
    }
}

fn kind_marker(kind: ProposalKind) -> &'static str {
    match kind {
        ProposalKind::Swap => "⇄",
        ProposalKind::Bridge => "⛓",
        ProposalKind::Vote => "✔",
        ProposalKind::Mint => "✦",
        ProposalKind::Deposit => "⬇",
    }
}

/// A "thinking..." spinner driven by a session's processing flag.
///
/// The spinner starts when the flag turns on and clears when it turns off.
pub struct ThinkingIndicator {
    spinner: ProgressBar,
    watcher: JoinHandle<()>,
}

impl ThinkingIndicator {
    pub fn watch(mut processing: watch::Receiver<bool>, message: &str) -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());

        let bar = spinner.clone();
        let watcher = tokio::spawn(async move {
            while processing.changed().await.is_ok() {
                if *processing.borrow_and_update() {
                    bar.enable_steady_tick(Duration::from_millis(80));
                } else {
                    bar.finish_and_clear();
                    break;
                }
            }
        });

        Self { spinner, watcher }
    }

    pub fn stop(self) {
        self.watcher.abort();
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use castagents_types::proposal::ProposalStep;
    use castagents_types::wallet::Holding;

    use super::*;

    fn proposal() -> Proposal {
        Proposal {
            kind: ProposalKind::Bridge,
            summary: "Bridge 100 USDC to Base".to_string(),
            steps: Some(vec![ProposalStep {
                label: "Approve USDC".to_string(),
                description: Some("one-time allowance".to_string()),
            }]),
            data: serde_json::Value::Null,
            estimated_gas: "0.0002 ETH".to_string(),
            fee_usd: 0.5,
            protocol: Some("Relay.link".to_string()),
        }
    }

    #[test]
    fn test_render_proposal_lists_fields() {
        let out = ChatRenderer::new(None).render_proposal(&proposal());
        assert!(out.contains("BRIDGE"));
        assert!(out.contains("Bridge 100 USDC to Base"));
        assert!(out.contains("Relay.link"));
        assert!(out.contains("Approve USDC"));
        assert!(out.contains("one-time allowance"));
        assert!(out.contains("$0.50"));
    }

    #[test]
    fn test_render_wallet_disconnected() {
        let out = ChatRenderer::new(None).render_wallet(&WalletSnapshot::disconnected());
        assert!(out.contains("not connected"));
    }

    #[test]
    fn test_render_wallet_connected() {
        let wallet = WalletSnapshot::connected(
            "0xabc",
            vec![Holding {
                symbol: "ETH".to_string(),
                balance: 1.45,
                unit_price: 3200.0,
                value_usd: 4640.0,
                change_24h_pct: -1.5,
            }],
        );
        let out = ChatRenderer::new(None).render_wallet(&wallet);
        assert!(out.contains("0xabc"));
        assert!(out.contains("ETH"));
        assert!(out.contains("4640.00"));
    }

    #[test]
    fn test_render_final_keeps_prose() {
        let out = ChatRenderer::new(Some(Color::Magenta)).render_final("Slippage is **0.5%**.");
        assert!(out.contains("0.5%"));
    }

    #[tokio::test]
    async fn test_thinking_indicator_stops_when_flag_clears() {
        let (tx, rx) = watch::channel(false);
        let indicator = ThinkingIndicator::watch(rx, "thinking...");
        tx.send_replace(true);
        tx.send_replace(false);
        tokio::time::timeout(Duration::from_secs(1), async {
            while !indicator.watcher.is_finished() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
        indicator.stop();
    }
}

//! Welcome banner shown when a chat starts or the agent changes.

use console::style;

use castagents_types::persona::Persona;
use castagents_types::wallet::WalletSnapshot;

/// Print the persona banner with model, wallet status and starter prompts.
pub fn print_welcome_banner(persona: &Persona, model: &str, wallet: &WalletSnapshot) {
    println!();
    println!(
        "  {} {}",
        style(format!("[{}]", persona.icon)).dim(),
        style(&persona.name).cyan().bold()
    );
    println!("  {}", style(&persona.description).dim());
    println!();
    println!("  {}  {}", style("Model:").bold(), style(model).dim());

    let wallet_line = if wallet.is_connected {
        format!(
            "{} (${:.2})",
            wallet.address.as_deref().unwrap_or("unknown"),
            wallet.total_value_usd
        )
    } else {
        "not connected (/wallet connect)".to_string()
    };
    println!("  {} {}", style("Wallet:").bold(), style(wallet_line).dim());

    if !persona.starter_prompts.is_empty() {
        println!();
        println!("  {}", style("Try asking:").bold());
        for prompt in &persona.starter_prompts {
            println!("    {} {}", style("•").dim(), prompt);
        }
    }

    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}

//! User registration command.

use anyhow::{bail, Result};
use console::style;

use parley_core::repository::user::UserRepository;

use crate::state::AppState;

/// Register `name` as a new user.
pub async fn add_user(state: &AppState, name: &str, json: bool) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("username must not be empty");
    }

    let user = state.orchestrator.users().create_user(name).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} User '{}' created",
        style("✓").green().bold(),
        style(&user.username).cyan()
    );
    println!("  {}  {}", style("ID:").bold(), style(user.id.to_string()).dim());
    println!();

    Ok(())
}

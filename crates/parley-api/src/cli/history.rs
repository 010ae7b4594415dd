//! Conversation history command.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use parley_core::text::preview;
use parley_types::chat::{HistoryEntry, ERROR_INTENT};

use crate::state::AppState;

const COLUMN_CHARS: usize = 48;

/// Print every recorded turn for `user`, newest first.
pub async fn show_history(state: &AppState, user: &str, json: bool) -> Result<()> {
    let entries = state.orchestrator.get_chat_history(user).await?;
    print_history(user, &entries, json)
}

pub fn print_history(user: &str, entries: &[HistoryEntry], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!();
        println!("  No conversation history for '{}'.", style(user).cyan());
        println!();
        return Ok(());
    }

    println!();
    println!("{}", history_table(entries));
    println!("  {} turn(s)", entries.len());
    println!();

    Ok(())
}

fn history_table(entries: &[HistoryEntry]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("When").fg(Color::White),
        Cell::new("Query").fg(Color::White),
        Cell::new("Reply").fg(Color::White),
        Cell::new("Intent").fg(Color::White),
    ]);

    for entry in entries {
        let intent_cell = if entry.intent == ERROR_INTENT {
            Cell::new(&entry.intent).fg(Color::Red)
        } else {
            Cell::new(&entry.intent).fg(Color::Cyan)
        };

        table.add_row(vec![
            Cell::new(entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
            Cell::new(preview(&entry.query, COLUMN_CHARS)),
            Cell::new(preview(&entry.reply, COLUMN_CHARS)),
            intent_cell,
        ]);
    }

    table
}

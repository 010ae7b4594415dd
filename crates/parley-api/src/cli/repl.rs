//! Interactive chat session over stdin.
//!
//! Every line is sent through the shared orchestrator, so repeated
//! messages in one session hit the response cache. The expiry sweeper runs
//! in the background for the lifetime of the session.

use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Result};
use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use parley_core::cache::{spawn_sweeper, CacheStats};
use parley_core::repository::user::UserRepository;
use parley_types::error::ChatError;

use crate::cli::chat::print_response;
use crate::cli::history::print_history;
use crate::state::AppState;

/// One parsed line of REPL input.
#[derive(Debug, PartialEq)]
pub enum ReplInput {
    Message(String),
    Stats,
    History,
    Quit,
    Blank,
    Unknown(String),
}

pub fn parse_input(line: &str) -> ReplInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplInput::Blank;
    }
    match trimmed {
        "/quit" | "/exit" => ReplInput::Quit,
        "/stats" => ReplInput::Stats,
        "/history" => ReplInput::History,
        cmd if cmd.starts_with('/') => ReplInput::Unknown(cmd.to_string()),
        _ => ReplInput::Message(line.to_string()),
    }
}

/// Run an interactive session as `user` until `/quit`, EOF or Ctrl+C.
pub async fn run_repl(state: &AppState, user: &str, json: bool, quiet: bool) -> Result<()> {
    if state.orchestrator.users().find_by_username(user).await?.is_none() {
        bail!(ChatError::UserNotFound(user.to_string()));
    }

    let cancel = CancellationToken::new();
    let sweeper = state.cache.is_enabled().then(|| {
        spawn_sweeper(
            Arc::clone(&state.cache),
            state.config.cache.sweep_interval(),
            cancel.clone(),
        )
    });

    let interactive = !json && !quiet;
    if interactive {
        println!();
        println!(
            "  {} Chatting as '{}' ({})",
            style("›").cyan().bold(),
            style(user).cyan(),
            style(state.data_dir.display()).dim()
        );
        println!("  {}", style("/stats  /history  /quit").dim());
        println!();
    }

    let result = read_loop(state, user, json, interactive).await;

    cancel.cancel();
    if let Some(handle) = sweeper {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "Cache sweeper task failed");
        }
    }

    tracing::info!(stats = ?state.cache.stats(), "Session ended");
    result
}

async fn read_loop(state: &AppState, user: &str, json: bool, interactive: bool) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if interactive {
            print!("{} ", style("you>").bold());
            std::io::stdout().flush()?;
        }

        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => match line? {
                Some(line) => line,
                None => break,
            },
        };

        match parse_input(&line) {
            ReplInput::Blank => continue,
            ReplInput::Quit => break,
            ReplInput::Stats => print_stats(&state.cache.stats(), state.cache.len(), json)?,
            ReplInput::History => {
                let entries = state.orchestrator.get_chat_history(user).await?;
                print_history(user, &entries, json)?;
            }
            ReplInput::Unknown(cmd) => {
                eprintln!("  {} unknown command {cmd}", style("?").yellow());
            }
            ReplInput::Message(message) => {
                match state.orchestrator.process_message(user, &message).await {
                    Ok(response) => print_response(&response, json)?,
                    Err(e @ ChatError::UserNotFound(_)) => return Err(e.into()),
                    Err(e) => eprintln!("  {} {e}", style("error:").red().bold()),
                }
            }
        }
    }

    Ok(())
}

fn print_stats(stats: &CacheStats, entries: usize, json: bool) -> Result<()> {
    if json {
        let value = serde_json::json!({
            "entries": entries,
            "hits": stats.hits,
            "misses": stats.misses,
            "admissions": stats.admissions,
            "rejections": stats.rejections,
            "evictions": stats.evictions,
            "expirations": stats.expirations,
            "faults": stats.faults,
            "hit_ratio": stats.hit_ratio(),
        });
        println!("{}", serde_json::to_string(&value)?);
        return Ok(());
    }

    println!();
    println!("  {}", style("── Cache ──").dim());
    println!("  Entries:     {entries}");
    println!(
        "  Hits:        {} ({:.0}%)",
        style(stats.hits).green(),
        stats.hit_ratio() * 100.0
    );
    println!("  Misses:      {}", stats.misses);
    println!("  Admissions:  {}", stats.admissions);
    println!("  Rejections:  {}", stats.rejections);
    println!("  Evictions:   {}", stats.evictions);
    println!("  Expirations: {}", stats.expirations);
    if stats.faults > 0 {
        println!("  Faults:      {}", style(stats.faults).red());
    }
    println!();

    Ok(())
}

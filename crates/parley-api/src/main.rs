//! Parley CLI entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, initializes tracing, the database and the chat
//! orchestrator, then dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;

use cli::{Cli, Commands, UserCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    parley_observe::tracing_setup::init_tracing(cli::log_directives(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;

    parley_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // `config` only needs the resolved configuration, not the database.
    if let Commands::Config = cli.command {
        let data_dir = parley_infra::config::resolve_data_dir();
        let config = parley_infra::config::load_config(&data_dir).await;
        return cli::config::show_config(&data_dir, &config, cli.json);
    }

    let state = AppState::init().await?;

    match cli.command {
        Commands::User { command } => match command {
            UserCommand::Add { name } => cli::user::add_user(&state, &name, cli.json).await?,
        },

        Commands::Chat { user, message } => {
            let message = message.join(" ");
            cli::chat::chat_once(&state, &user, &message, cli.json).await?;
        }

        Commands::History { user } => {
            cli::history::show_history(&state, &user, cli.json).await?;
        }

        Commands::Repl { user } => {
            cli::repl::run_repl(&state, &user, cli.json, cli.quiet).await?;
        }

        Commands::Config => unreachable!("handled above"),
    }

    Ok(())
}

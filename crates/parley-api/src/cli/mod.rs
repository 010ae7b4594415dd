//! CLI command definitions and dispatch for the `parley` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod config;
pub mod history;
pub mod repl;
pub mod user;

use clap::{Parser, Subcommand};

/// Chat with the reply backend, with history and response caching.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "PARLEY_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage users.
    User {
        #[command(subcommand)]
        command: UserCommand,
    },

    /// Send a single message and print the reply.
    Chat {
        /// Username to chat as.
        user: String,

        /// Message text (remaining words are joined with spaces).
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        message: Vec<String>,
    },

    /// Show the full conversation history for a user, newest first.
    History {
        /// Username whose history to show.
        user: String,
    },

    /// Interactive session reading messages from stdin.
    Repl {
        /// Username to chat as.
        user: String,
    },

    /// Print the effective configuration.
    Config,
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Register a new user.
    Add {
        /// Username to register.
        name: String,
    },
}

/// Tracing directives for the given verbosity flags.
pub fn log_directives(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info,parley_core=debug,parley_infra=debug",
        _ => "trace",
    }
}

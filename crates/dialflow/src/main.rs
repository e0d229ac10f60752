// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dialflow - a sequential autodial engine for filtered customer lists.
//!
//! This is the binary entry point for the Dialflow engine.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod run;
mod shutdown;
mod status;

/// Dialflow - a sequential autodial engine for filtered customer lists.
#[derive(Parser, Debug)]
#[command(name = "dialflow", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the engine: resume any persisted session and keep dialing.
    Run {
        /// Start a new session immediately instead of waiting for one.
        #[arg(long)]
        start: bool,
    },
    /// Show the persisted session state.
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match dialflow_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            dialflow_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.engine.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Some(Commands::Run { start }) => run::run(config, start).await,
        Some(Commands::Status) => status::status(config).await,
        None => {
            println!("dialflow: use --help for available commands");
            Ok(())
        }
    };

    if let Err(error) = result {
        eprintln!("dialflow: {error}");
        std::process::exit(1);
    }
}

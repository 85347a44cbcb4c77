// SPDX-FileCopyrightText: 2026 Vanish Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vanish - self-hosted one-time secret sharing.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vanish_config::VanishConfig;

/// Vanish - share secrets through expiring encrypted links.
#[derive(Parser, Debug)]
#[command(name = "vanish", version, about, long_about = None)]
struct Cli {
    /// Config file to load instead of the XDG lookup.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server and the expiry sweeper.
    Serve,
    /// Delete expired secrets and stale rate-limit records now.
    Cleanup,
    /// Show store statistics.
    Stats {
        /// Output JSON for scripting.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// Print a fresh 64-hex-character encryption key.
    GenerateKey,
    /// Delete every rate-limit record.
    ClearRateLimits,
}

fn load_config(path: Option<&PathBuf>) -> VanishConfig {
    let loaded = match path {
        Some(p) => vanish_config::load_and_validate_path(p),
        None => vanish_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            vanish_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("vanish: use --help for available commands");
        return;
    };

    let setup = || {
        let config = load_config(cli.config.as_ref());
        serve::init_tracing(&config.logging.level);
        config
    };

    let result = match command {
        // No config needed, so a key can be generated before one exists.
        Commands::GenerateKey => commands::run_generate_key(),
        Commands::Serve => serve::run_serve(setup()).await,
        Commands::Cleanup => commands::run_cleanup(&setup()).await,
        Commands::Stats { json, plain } => commands::run_stats(&setup(), json, plain).await,
        Commands::ClearRateLimits => commands::run_clear_rate_limits(&setup()).await,
    };

    if let Err(e) = result {
        eprintln!("vanish: {e}");
        std::process::exit(1);
    }
}

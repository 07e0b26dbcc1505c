// Copyright 2026 Pandavote Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use pandavote::ballot::Decision;
use pandavote::cli;
use pandavote::election::ElectionConfig;

#[derive(Parser)]
#[command(
    name = "pandavote",
    about = "Pandavote — automated ballot runner for the Great Bear Council panda election",
    version,
    after_help = "Run 'pandavote vote --decision live' to save the pandas."
)]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit all five council votes and record the result
    Vote {
        /// Fate of the pandas: the final group's vote
        #[arg(long, value_enum)]
        decision: Decision,
        /// Base URL of the election site
        #[arg(long, default_value = "https://panda.belvo.io")]
        base_url: String,
        /// Trial key appended to the voting form URL
        #[arg(long, default_value = "A3F3D333452DF83D32A387F3FC3-GUBA")]
        trial_key: String,
        /// Directory for the result JSON file
        #[arg(long, default_value = "results")]
        results_dir: PathBuf,
        /// Per-request timeout in milliseconds
        #[arg(long, default_value = "10000")]
        timeout_ms: u64,
        /// Attempts per voter before giving up
        #[arg(long, default_value = "3")]
        max_attempts: u32,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose, args.quiet);

    let result = match args.command {
        Commands::Vote {
            decision,
            base_url,
            trial_key,
            results_dir,
            timeout_ms,
            max_attempts,
        } => {
            let config = ElectionConfig {
                base_url,
                trial_key,
                timeout_ms,
                max_attempts,
            };
            cli::vote_cmd::run(decision, config, &results_dir).await
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "pandavote", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        eprintln!("  Error: {e:#}");
        std::process::exit(1);
    }

    result
}


fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

// ABOUTME: Entry point for the caravel CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use caravel::error::Result;
use cli::{Cli, Commands};
use commands::RunArgs;
use caravel::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let output = Output::new(mode);

    if let Err(e) = run(cli, output) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, output: Output) -> Result<()> {
    let cwd = env::current_dir()?;

    match cli.command {
        Commands::Check { framework } => commands::check(&cwd, framework, output),
        Commands::Run {
            platform,
            multi,
            no_migrations,
            strict,
        } => commands::run(
            &cwd,
            RunArgs {
                platform,
                multi,
                no_migrations,
                strict,
            },
            output,
        ),
        Commands::Rollback => commands::rollback(&cwd, output),
        Commands::Info => commands::info(&cwd, output),
    }
}

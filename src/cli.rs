// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "caravel")]
#[command(about = "Deploy Python web applications to multiple cloud platforms")]
#[command(version)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output for CI
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Emit JSON lines instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check deployment readiness
    Check {
        /// Framework to check (flask, django, fastapi); auto-detected if omitted
        #[arg(short, long)]
        framework: Option<String>,
    },

    /// Deploy the application
    Run {
        /// Target platform (falls back to the configured platform)
        #[arg(short, long)]
        platform: Option<String>,

        /// Deploy to several platforms in sequence
        #[arg(long, num_args = 1.., value_name = "PLATFORM")]
        multi: Vec<String>,

        /// Skip database migrations
        #[arg(long)]
        no_migrations: bool,

        /// Re-run framework readiness gates during deploy
        #[arg(long)]
        strict: bool,
    },

    /// Rollback to the previous deployment checkpoint
    Rollback,

    /// Show project deployment information
    Info,
}

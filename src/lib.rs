// ABOUTME: Library root for caravel - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod checks;
pub mod config;
pub mod error;
pub mod migrate;
pub mod orchestrator;
pub mod output;
pub mod platform;
pub mod rollback;
pub mod snapshot;

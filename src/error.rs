// ABOUTME: Application-wide error types for caravel.
// ABOUTME: Uses thiserror for ergonomic error handling.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("application is not ready for deployment")]
    NotReady,

    #[error("deployment failed for {0}")]
    DeploymentFailed(String),

    #[error("rollback failed")]
    RollbackFailed,

    #[error("could not detect framework; pass --framework explicitly")]
    FrameworkNotDetected,

    #[error("no platform specified and none found in configuration")]
    NoPlatform,

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    Snapshot(#[from] crate::snapshot::SnapshotError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

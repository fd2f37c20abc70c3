// ABOUTME: File-backed store for deployment checkpoints.
// ABOUTME: Creates, enumerates, prunes, and restores project snapshots.

mod archive;
mod meta;

pub use archive::{EXCLUDED_DIRS, EXCLUDED_SUFFIXES};
pub use meta::MetaValue;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hidden history directory at the project root.
pub const HISTORY_DIR: &str = ".deployment";

/// Subdirectory of the history dir holding snapshot archives.
pub const ARTIFACTS_DIR: &str = "artifacts";

/// Default number of checkpoints retained by the pruning sweep.
pub const DEFAULT_KEEP_COUNT: usize = 5;

const ARCHIVE_SUFFIX: &str = ".tar.gz";

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode deployment state: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no artifact snapshot available for rollback")]
    MissingArtifact,

    #[error("artifact missing on disk: {0}")]
    ArtifactNotFound(PathBuf),
}

/// Persisted record of one successful deploy attempt.
///
/// Immutable once written: restoring a checkpoint mutates the live project
/// tree, never the stored record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentState {
    /// `{platform}_{UTC timestamp to the second}`, plus a sequence suffix
    /// when two checkpoints for the same platform land in the same second.
    pub id: String,
    /// Lower-cased platform identifier.
    pub platform: String,
    /// UTC creation time.
    pub timestamp: DateTime<Utc>,
    /// Best-effort commit hash from the working tree; absence is not an error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_commit: Option<String>,
    /// Project-relative path to the snapshot archive. Absent when archiving
    /// failed; such a checkpoint exists for auditing but cannot be restored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_path: Option<String>,
    /// Caller-supplied metadata, flattened into the sidecar record.
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Durable, file-backed history of deployment checkpoints.
pub struct SnapshotStore {
    project_root: PathBuf,
}

impl SnapshotStore {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn history_dir(&self) -> PathBuf {
        self.project_root.join(HISTORY_DIR)
    }

    fn artifacts_dir(&self) -> PathBuf {
        self.history_dir().join(ARTIFACTS_DIR)
    }

    /// Create a checkpoint for a deployment that just succeeded.
    ///
    /// Archiving failures are tolerated: the sidecar record is still written
    /// without an `artifact_path`. Only a failure to write the sidecar itself
    /// is an error. A retention sweep runs after every successful write.
    pub fn create_checkpoint(
        &self,
        platform: &str,
        metadata: BTreeMap<String, MetaValue>,
    ) -> Result<DeploymentState, SnapshotError> {
        let now = Utc::now();
        let id = self.generate_id(platform, now);
        tracing::info!("Saving deployment state: {id}");

        let artifact_path = match self.create_snapshot(&id) {
            Ok(relative) => Some(relative),
            Err(e) => {
                tracing::error!("Unable to create snapshot: {e}");
                None
            }
        };

        let state = DeploymentState {
            id: id.clone(),
            platform: platform.to_lowercase(),
            timestamp: now,
            git_commit: current_git_commit(&self.project_root),
            artifact_path,
            metadata: metadata
                .into_iter()
                .map(|(k, v)| (k, v.into_json()))
                .collect(),
        };

        let history = self.history_dir();
        std::fs::create_dir_all(&history)?;
        let sidecar = history.join(format!("{id}.json"));
        let payload = serde_json::to_string_pretty(&state)?;
        std::fs::write(&sidecar, payload)?;
        tracing::info!("Deployment state saved to {}", sidecar.display());

        self.prune(DEFAULT_KEEP_COUNT);
        Ok(state)
    }

    /// The most recent checkpoint, or None if the history is absent or empty.
    ///
    /// Selection is by sidecar modification time, not id ordering; ids are
    /// timestamp strings that sort consistently with mtime in practice.
    pub fn previous(&self) -> Option<DeploymentState> {
        let newest = self.sidecars_newest_first().into_iter().next()?;
        match std::fs::read_to_string(&newest) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(state) => Some(state),
                Err(e) => {
                    tracing::warn!("Error reading deployment history: {e}");
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Error reading deployment history: {e}");
                None
            }
        }
    }

    /// Extract a checkpoint's archive over the live project tree.
    pub fn restore(&self, state: &DeploymentState) -> Result<(), SnapshotError> {
        let relative = state
            .artifact_path
            .as_deref()
            .ok_or(SnapshotError::MissingArtifact)?;
        let artifact = self.project_root.join(relative);
        if !artifact.exists() {
            return Err(SnapshotError::ArtifactNotFound(artifact));
        }

        tracing::info!("Restoring files from snapshot {}", artifact.display());
        archive::unpack_over(&artifact, &self.project_root)?;
        Ok(())
    }

    /// Retention sweep: keep the `keep_count` most recently modified sidecars,
    /// delete older ones and any archive whose id is not among the retained
    /// set. Idempotent and safe to call when the history directory is empty.
    pub fn prune(&self, keep_count: usize) {
        let sidecars = self.sidecars_newest_first();
        if sidecars.is_empty() {
            return;
        }

        let retained: BTreeSet<String> = sidecars
            .iter()
            .take(keep_count)
            .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();

        for sidecar in sidecars.iter().skip(keep_count) {
            if let Err(e) = std::fs::remove_file(sidecar) {
                tracing::warn!("Error cleaning old deployments: {e}");
            } else {
                tracing::debug!("Removed old deployment record: {}", sidecar.display());
            }
        }

        let artifacts = self.artifacts_dir();
        let Ok(entries) = std::fs::read_dir(&artifacts) else {
            return;
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            let Some(id) = name.strip_suffix(ARCHIVE_SUFFIX) else {
                continue;
            };
            if !retained.contains(id) {
                if let Err(e) = std::fs::remove_file(entry.path()) {
                    tracing::warn!("Error cleaning old deployments: {e}");
                } else {
                    tracing::debug!("Removed old snapshot: {name}");
                }
            }
        }
    }

    fn create_snapshot(&self, id: &str) -> Result<String, SnapshotError> {
        let artifacts = self.artifacts_dir();
        std::fs::create_dir_all(&artifacts)?;
        let dest = artifacts.join(format!("{id}{ARCHIVE_SUFFIX}"));
        archive::pack_tree(&self.project_root, &dest)?;
        Ok(format!("{HISTORY_DIR}/{ARTIFACTS_DIR}/{id}{ARCHIVE_SUFFIX}"))
    }

    /// Ids are second-granularity timestamps. Rapid repeated deploys to the
    /// same platform get a sequence suffix instead of overwriting the
    /// earlier sidecar.
    fn generate_id(&self, platform: &str, now: DateTime<Utc>) -> String {
        let base = format!(
            "{}_{}",
            platform.to_lowercase(),
            now.format("%Y%m%d%H%M%S")
        );
        let history = self.history_dir();
        if !history.join(format!("{base}.json")).exists() {
            return base;
        }
        let mut seq = 2;
        loop {
            let candidate = format!("{base}_{seq}");
            if !history.join(format!("{candidate}.json")).exists() {
                return candidate;
            }
            seq += 1;
        }
    }

    /// Sidecar paths sorted most-recently-modified first. Mtime ties break
    /// on file name, which orders sequence-suffixed ids correctly.
    fn sidecars_newest_first(&self) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(self.history_dir()) else {
            return Vec::new();
        };

        let mut sidecars: Vec<(std::time::SystemTime, PathBuf)> = entries
            .flatten()
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
            .filter_map(|e| {
                let mtime = e.metadata().ok()?.modified().ok()?;
                Some((mtime, e.path()))
            })
            .collect();

        sidecars.sort_by(|a, b| b.cmp(a));
        sidecars.into_iter().map(|(_, path)| path).collect()
    }
}

/// Best-effort resolution of the current git commit. Absence of git, a
/// non-repository root, or a failed invocation all yield None.
fn current_git_commit(project_root: &Path) -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(project_root)
        .output();
    match output {
        Ok(output) if output.status.success() => {
            let commit = String::from_utf8_lossy(&output.stdout).trim().to_string();
            (!commit.is_empty()).then_some(commit)
        }
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("Unable to resolve git commit: {e}");
            None
        }
    }
}

// ABOUTME: Rollback coordination over the snapshot store.
// ABOUTME: Restores the newest checkpoint and triggers platform redeploys.

use crate::snapshot::{DeploymentState, SnapshotStore};

/// Callback that redeploys a restored snapshot for its platform.
pub type RedeployCallback<'a> = &'a dyn Fn(&DeploymentState) -> bool;

/// Restore the most recent checkpoint and optionally redeploy it.
///
/// Fails with no side effects when no checkpoint exists. When a redeploy
/// callback is supplied it receives the full restored state and its boolean
/// result propagates: a successful restore followed by a failed redeploy is
/// an overall rollback failure. The restored files are left in place either
/// way, so the tree reflects the last known-good snapshot.
pub fn rollback_to_previous(store: &SnapshotStore, callback: Option<RedeployCallback>) -> bool {
    tracing::warn!("Initiating rollback to previous deployment...");

    let Some(previous) = store.previous() else {
        tracing::error!("No previous deployment found to rollback to");
        return false;
    };

    if let Err(e) = store.restore(&previous) {
        tracing::error!("Failed to restore snapshot: {e}");
        return false;
    }

    if let Some(callback) = callback {
        tracing::info!("Triggering platform-specific rollback callback...");
        if !callback(&previous) {
            tracing::error!("Rollback callback reported failure");
            return false;
        }
    }

    tracing::info!("Rollback completed");
    true
}

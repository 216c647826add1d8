//! Removal of orphaned collections behind an explicit confirmation gate

use crate::reconcile::CollectionRecord;
use tracing::{info, warn};
use vecmend_core::error::Error;
use vecmend_storage::VectorIndexStore;

/// One orphaned collection staged for deletion
pub struct CleanupCandidate {
    pub name: String,
    pub dataset_id: String,
    /// Approximate object count, best effort; `0` when the count query failed
    pub object_count: u64,
}

/// Everything the caller needs to show before deciding
pub struct CleanupPlan {
    pub candidates: Vec<CleanupCandidate>,
}

/// Per-collection results of a cleanup run
pub struct CleanupReport {
    pub deleted: Vec<String>,
    pub failed: Vec<(String, Error)>,
    /// `true` when the caller declined confirmation; nothing was deleted
    pub cancelled: bool,
}

/// Stage the orphaned collections for deletion, annotated with best-effort
/// object counts. A failed count query reports `0` and never blocks the
/// listing.
pub async fn build_cleanup_plan(
    store: &dyn VectorIndexStore,
    orphaned: &[CollectionRecord],
) -> CleanupPlan {
    let mut candidates = Vec::with_capacity(orphaned.len());
    for record in orphaned {
        let object_count = store.object_count(&record.name).await;
        candidates.push(CleanupCandidate {
            name: record.name.clone(),
            dataset_id: record.key.as_str().to_string(),
            object_count,
        });
    }
    CleanupPlan { candidates }
}

/// Delete the planned collections.
///
/// The confirmation callback is a mandatory gate, not UI sugar: deletion is
/// irreversible and driven by a cross-store join that may be stale, so no
/// delete is ever issued without an affirmative answer. One failed deletion
/// does not stop the remaining candidates.
pub async fn remove_orphans<F>(
    store: &dyn VectorIndexStore,
    plan: &CleanupPlan,
    confirm: F,
) -> CleanupReport
where
    F: FnOnce(&CleanupPlan) -> bool,
{
    let mut report = CleanupReport {
        deleted: Vec::new(),
        failed: Vec::new(),
        cancelled: false,
    };

    if plan.candidates.is_empty() {
        return report;
    }

    if !confirm(plan) {
        info!("Cleanup cancelled, no collections deleted");
        report.cancelled = true;
        return report;
    }

    for candidate in &plan.candidates {
        match store.delete_collection(&candidate.name).await {
            Ok(()) => report.deleted.push(candidate.name.clone()),
            Err(e) => {
                warn!("Failed to delete {}: {e}", candidate.name);
                report.failed.push((candidate.name.clone(), e));
            }
        }
    }

    report
}

//! Sequential batch repair driver

use crate::repair::{repair_collection, RepairError, RepairMode, RepairOutcome};
use std::time::Duration;
use tracing::warn;
use vecmend_storage::VectorIndexStore;

/// Pause between applied repairs, to avoid overloading the vector-index
/// service during a batch run
pub const REPAIR_PAUSE: Duration = Duration::from_millis(500);

/// Per-collection outcomes of one batch run, in listing order
pub struct BatchReport {
    pub outcomes: Vec<(String, Result<RepairOutcome, RepairError>)>,
}

impl BatchReport {
    /// Names whose terminal state is `Repaired`
    pub fn repaired(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|(name, result)| {
                matches!(result, Ok(RepairOutcome::Repaired)).then_some(name.as_str())
            })
            .collect()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|(_, r)| r.is_ok()).count()
    }

    pub fn failed(&self) -> Vec<(&str, &RepairError)> {
        self.outcomes
            .iter()
            .filter_map(|(name, result)| result.as_ref().err().map(|e| (name.as_str(), e)))
            .collect()
    }
}

/// Repair `names` one at a time, in listing order.
///
/// No reordering, no retries; a sibling failure never aborts the batch.
pub async fn run_batch_repair(
    store: &dyn VectorIndexStore,
    names: &[String],
    mode: RepairMode,
) -> BatchReport {
    let mut outcomes = Vec::with_capacity(names.len());

    for (index, name) in names.iter().enumerate() {
        let result = repair_collection(store, name, mode).await;
        if let Err(e) = &result {
            warn!("Repair failed: {e}");
        }
        outcomes.push((name.clone(), result));

        if mode == RepairMode::Apply && index + 1 < names.len() {
            tokio::time::sleep(REPAIR_PAUSE).await;
        }
    }

    BatchReport { outcomes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{current_schema, legacy_schema};
    use pretty_assertions::assert_eq;
    use vecmend_storage::MockVectorStore;

    const A: &str = "Vector_index_a1_a2_a3_a4_a5_Node";
    const B: &str = "Vector_index_b1_b2_b3_b4_b5_Node";
    const C: &str = "Vector_index_c1_c2_c3_c4_c5_Node";

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn batch_continues_past_individual_failures() {
        let store = MockVectorStore::new()
            .with_collection(legacy_schema(A))
            .with_collection(legacy_schema(B))
            .with_collection(legacy_schema(C))
            .failing_delete(B);

        let report = run_batch_repair(&store, &names(&[A, B, C]), RepairMode::Apply).await;

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.repaired(), vec![A, C]);
        assert_eq!(report.succeeded(), 2);

        let failed = report.failed();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0, B);
        assert!(matches!(failed[0].1, RepairError::Delete { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn outcomes_keep_listing_order() {
        let store = MockVectorStore::new()
            .with_collection(current_schema(A))
            .with_collection(legacy_schema(B));

        let report = run_batch_repair(&store, &names(&[A, B]), RepairMode::Apply).await;

        let order: Vec<&str> = report.outcomes.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(order, vec![A, B]);
        assert!(matches!(
            report.outcomes[0].1,
            Ok(RepairOutcome::AlreadyCurrent)
        ));
        assert!(matches!(report.outcomes[1].1, Ok(RepairOutcome::Repaired)));
    }

    #[tokio::test]
    async fn simulate_mode_never_mutates() {
        let store = MockVectorStore::new()
            .with_collection(legacy_schema(A))
            .with_collection(legacy_schema(B));

        let report = run_batch_repair(&store, &names(&[A, B]), RepairMode::Simulate).await;

        assert_eq!(report.succeeded(), 2);
        assert!(report.repaired().is_empty());
        assert_eq!(
            store.calls(),
            vec![format!("get:{A}"), format!("get:{B}")]
        );
    }
}

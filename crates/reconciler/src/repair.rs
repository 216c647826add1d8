//! Destructive rebuild of one legacy-format collection

use thiserror::Error;
use tracing::{debug, info};
use vecmend_core::error::Error as CoreError;
use vecmend_core::schema::SchemaFormat;
use vecmend_storage::VectorIndexStore;

/// Whether a repair actually mutates the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairMode {
    /// Report what would happen; never delete or create
    Simulate,
    Apply,
}

/// Terminal state of one successful repair attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairOutcome {
    /// Collection was rebuilt under the current schema dialect. Its vectors
    /// are gone; the operator must trigger re-embedding out of band.
    Repaired,
    /// Schema was already current; no delete or create was issued
    AlreadyCurrent,
    /// Simulate mode: the collection would have been rebuilt
    WouldRepair,
}

/// Per-collection repair failure, split by the step that failed.
///
/// `Create` is the delete-succeeded-create-failed state: the collection is
/// gone until the repair is re-run for this name, so it must stay
/// distinguishable from the other two.
#[derive(Error, Debug)]
pub enum RepairError {
    #[error("fetching schema for {name} failed: {source}")]
    Fetch { name: String, source: CoreError },

    #[error("deleting {name} failed: {source}")]
    Delete { name: String, source: CoreError },

    #[error("recreating {name} after deletion failed, re-run repair for this collection: {source}")]
    Create { name: String, source: CoreError },
}

/// Rebuild one collection under the current schema dialect.
///
/// Step ordering is fixed: fetch, format check, delete, create. Deletion is
/// never attempted before the fetched schema confirms it is needed, and
/// creation is never attempted unless deletion definitively succeeded.
pub async fn repair_collection(
    store: &dyn VectorIndexStore,
    name: &str,
    mode: RepairMode,
) -> Result<RepairOutcome, RepairError> {
    debug!("Fetching schema for {name}");
    let schema = store
        .get_collection(name)
        .await
        .map_err(|source| RepairError::Fetch {
            name: name.to_string(),
            source,
        })?;

    if schema.format() == SchemaFormat::Current {
        // Another process may have repaired it since the scan.
        info!("{name} is already in the current format, skipping");
        return Ok(RepairOutcome::AlreadyCurrent);
    }

    if mode == RepairMode::Simulate {
        return Ok(RepairOutcome::WouldRepair);
    }

    debug!("Deleting {name}");
    store
        .delete_collection(name)
        .await
        .map_err(|source| RepairError::Delete {
            name: name.to_string(),
            source,
        })?;

    let rebuilt = schema.to_current_format();
    debug!("Recreating {name} with the current schema dialect");
    store
        .create_collection(&rebuilt)
        .await
        .map_err(|source| RepairError::Create {
            name: name.to_string(),
            source,
        })?;

    info!("Repaired {name}; embeddings must be regenerated");
    Ok(RepairOutcome::Repaired)
}

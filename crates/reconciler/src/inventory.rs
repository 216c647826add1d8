//! Inventory reads over the two external stores
//!
//! Both read paths degrade to empty results with a logged warning instead of
//! propagating connectivity failures. The registry read additionally carries
//! an explicit availability flag so destructive decisions can tell "the
//! registry is empty" apart from "the registry could not be queried".

use std::collections::{HashMap, HashSet};
use tracing::warn;
use vecmend_core::is_managed_collection;
use vecmend_core::schema::CollectionSchema;
use vecmend_storage::{DatasetRegistry, VectorIndexStore};

/// Result of one schema-listing pass
pub struct CollectionInventory {
    /// Number of collections the service reported, managed or not
    pub total: usize,
    /// The managed subsequence, in service order
    pub managed: Vec<CollectionSchema>,
}

/// Fetch the full schema listing and keep the managed collections.
///
/// A failed listing yields an empty inventory for this call only; there are
/// no retries.
pub async fn managed_collections(store: &dyn VectorIndexStore) -> CollectionInventory {
    match store.list_collections().await {
        Ok(all) => {
            let total = all.len();
            let managed = all
                .into_iter()
                .filter(|c| is_managed_collection(&c.class))
                .collect();
            CollectionInventory { total, managed }
        }
        Err(e) => {
            warn!("Schema listing unavailable: {e}");
            CollectionInventory {
                total: 0,
                managed: Vec::new(),
            }
        }
    }
}

/// Dataset id set plus the query-succeeded signal
pub struct RegistryIds {
    pub ids: HashSet<String>,
    /// `false` when the id query failed; orphan detection must then stand down
    pub available: bool,
}

impl RegistryIds {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}

pub async fn registry_ids(registry: &dyn DatasetRegistry) -> RegistryIds {
    match registry.dataset_ids().await {
        Ok(ids) => RegistryIds {
            ids,
            available: true,
        },
        Err(e) => {
            warn!("Dataset registry unavailable, orphan detection disabled: {e}");
            RegistryIds {
                ids: HashSet::new(),
                available: false,
            }
        }
    }
}

/// Best-effort name lookup; an empty map on failure, partial otherwise.
/// Missing ids render as a placeholder at the report layer.
pub async fn resolve_dataset_names(
    registry: &dyn DatasetRegistry,
    ids: &[String],
) -> HashMap<String, String> {
    if ids.is_empty() {
        return HashMap::new();
    }
    match registry.dataset_names(ids).await {
        Ok(names) => names,
        Err(e) => {
            warn!("Dataset name lookup failed: {e}");
            HashMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{current_schema, legacy_schema, plain_schema};
    use pretty_assertions::assert_eq;
    use vecmend_storage::{MockRegistry, MockVectorStore};

    #[tokio::test]
    async fn listing_keeps_only_managed_collections_in_order() {
        let store = MockVectorStore::new()
            .with_collection(legacy_schema("Vector_index_a_b_c_d_e_Node"))
            .with_collection(plain_schema("Article"))
            .with_collection(current_schema("Vector_index_f_g_h_i_j_Node"));

        let inventory = managed_collections(&store).await;
        assert_eq!(inventory.total, 3);
        let names: Vec<&str> = inventory.managed.iter().map(|c| c.class.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Vector_index_a_b_c_d_e_Node",
                "Vector_index_f_g_h_i_j_Node"
            ]
        );
    }

    #[tokio::test]
    async fn failed_listing_degrades_to_empty_inventory() {
        let store = MockVectorStore::new()
            .with_collection(legacy_schema("Vector_index_a_b_c_d_e_Node"))
            .failing_listing();

        let inventory = managed_collections(&store).await;
        assert_eq!(inventory.total, 0);
        assert!(inventory.managed.is_empty());
    }

    #[tokio::test]
    async fn registry_ids_carry_the_availability_signal() {
        let registry = MockRegistry::new().with_dataset("a-b-c-d-e", "docs");
        let ids = registry_ids(&registry).await;
        assert!(ids.available);
        assert!(ids.contains("a-b-c-d-e"));

        let offline = MockRegistry::new().with_dataset("a-b-c-d-e", "docs").unavailable();
        let ids = registry_ids(&offline).await;
        assert!(!ids.available);
        assert!(ids.ids.is_empty());
    }

    #[tokio::test]
    async fn name_resolution_is_best_effort() {
        let registry = MockRegistry::new().with_dataset("a-b-c-d-e", "docs");
        let names =
            resolve_dataset_names(&registry, &["a-b-c-d-e".to_string(), "missing".to_string()])
                .await;
        assert_eq!(names.len(), 1);
        assert_eq!(names["a-b-c-d-e"], "docs");

        let offline = MockRegistry::new().unavailable();
        let names = resolve_dataset_names(&offline, &["a-b-c-d-e".to_string()]).await;
        assert!(names.is_empty());
    }
}

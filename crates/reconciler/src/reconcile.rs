//! Pure reconciliation of classified collections against the dataset registry

use crate::inventory::RegistryIds;
use vecmend_core::schema::{CollectionSchema, CorrelationKey, SchemaFormat};

/// Classified view of one managed collection
#[derive(Debug, Clone)]
pub struct CollectionRecord {
    pub name: String,
    pub key: CorrelationKey,
    pub format: SchemaFormat,
    /// Creation time recovered from auto-schema descriptions, for reports
    pub created_at: Option<String>,
}

impl CollectionRecord {
    pub fn from_schema(schema: &CollectionSchema) -> Self {
        Self {
            name: schema.class.clone(),
            key: CorrelationKey::from_collection_name(&schema.class),
            format: schema.format(),
            created_at: schema.created_at(),
        }
    }
}

/// Disjoint partition of the managed-collection universe
#[derive(Debug, Default)]
pub struct ReconciliationReport {
    /// Legacy-format collections that must be rebuilt
    pub needs_repair: Vec<CollectionRecord>,
    /// Current-format collections with no matching dataset record
    pub orphaned: Vec<CollectionRecord>,
    /// Current-format collections with a matching dataset record
    pub healthy: Vec<CollectionRecord>,
    /// Collections whose name cannot be correlated to any dataset; reported
    /// but excluded from every automated action
    pub unresolvable: Vec<CollectionRecord>,
}

impl ReconciliationReport {
    pub fn managed_total(&self) -> usize {
        self.needs_repair.len()
            + self.orphaned.len()
            + self.healthy.len()
            + self.unresolvable.len()
    }
}

/// Partition the managed collections.
///
/// Legacy format wins over everything else: a legacy collection is queued
/// for repair and only re-enters orphan consideration on a later run.
/// Orphan status is only assigned under a successful registry read; when the
/// registry could not be queried, every candidate counts as healthy rather
/// than risking deletion over a connectivity blip.
pub fn reconcile(managed: &[CollectionSchema], registry: &RegistryIds) -> ReconciliationReport {
    let mut report = ReconciliationReport::default();

    for schema in managed {
        let record = CollectionRecord::from_schema(schema);
        if record.format == SchemaFormat::Legacy {
            report.needs_repair.push(record);
            continue;
        }

        let id = record.key.id().map(str::to_string);
        match id {
            None => report.unresolvable.push(record),
            Some(id) if registry.available && !registry.contains(&id) => {
                report.orphaned.push(record)
            }
            Some(_) => report.healthy.push(record),
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{current_schema, legacy_schema};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    const DATASET_ID: &str = "aaaa-bbbb-cccc-dddd-eeee";

    fn registry_with(ids: &[&str]) -> RegistryIds {
        RegistryIds {
            ids: ids.iter().map(|id| id.to_string()).collect(),
            available: true,
        }
    }

    fn unavailable_registry() -> RegistryIds {
        RegistryIds {
            ids: HashSet::new(),
            available: false,
        }
    }

    #[test]
    fn partition_is_exhaustive_and_disjoint() {
        let managed = vec![
            legacy_schema("Vector_index_1111_2222_3333_4444_5555_Node"),
            current_schema("Vector_index_aaaa_bbbb_cccc_dddd_eeee_Node"),
            current_schema("Vector_index_ffff_gggg_hhhh_iiii_jjjj_Node"),
            current_schema("Vector_index_short_Node"),
        ];
        let report = reconcile(&managed, &registry_with(&[DATASET_ID]));

        assert_eq!(report.needs_repair.len(), 1);
        assert_eq!(report.healthy.len(), 1);
        assert_eq!(report.orphaned.len(), 1);
        assert_eq!(report.unresolvable.len(), 1);
        assert_eq!(report.managed_total(), managed.len());
    }

    #[test]
    fn known_dataset_routes_on_schema_format() {
        let managed = vec![current_schema("Vector_index_aaaa_bbbb_cccc_dddd_eeee_Node")];
        let report = reconcile(&managed, &registry_with(&[DATASET_ID]));
        assert_eq!(report.healthy.len(), 1);
        assert_eq!(report.healthy[0].key.as_str(), DATASET_ID);

        let managed = vec![legacy_schema("Vector_index_aaaa_bbbb_cccc_dddd_eeee_Node")];
        let report = reconcile(&managed, &registry_with(&[DATASET_ID]));
        assert_eq!(report.needs_repair.len(), 1);
    }

    #[test]
    fn absent_dataset_marks_the_collection_orphaned() {
        let managed = vec![current_schema("Vector_index_ffff_gggg_hhhh_iiii_jjjj_Node")];
        let report = reconcile(&managed, &registry_with(&[DATASET_ID]));
        assert_eq!(report.orphaned.len(), 1);
        assert_eq!(report.orphaned[0].key.as_str(), "ffff-gggg-hhhh-iiii-jjjj");
    }

    #[test]
    fn unavailable_registry_never_produces_orphans() {
        let managed = vec![
            current_schema("Vector_index_ffff_gggg_hhhh_iiii_jjjj_Node"),
            current_schema("Vector_index_aaaa_bbbb_cccc_dddd_eeee_Node"),
        ];
        let report = reconcile(&managed, &unavailable_registry());
        assert!(report.orphaned.is_empty());
        assert_eq!(report.healthy.len(), 2);
    }

    #[test]
    fn legacy_format_wins_over_orphan_and_unknown_status() {
        // Orphaned by id, but legacy: repair comes first.
        let managed = vec![legacy_schema("Vector_index_ffff_gggg_hhhh_iiii_jjjj_Node")];
        let report = reconcile(&managed, &registry_with(&[DATASET_ID]));
        assert_eq!(report.needs_repair.len(), 1);
        assert!(report.orphaned.is_empty());

        // Unresolvable name, but legacy: still repairable, repair is keyed by
        // the collection name alone.
        let managed = vec![legacy_schema("Vector_index_short_Node")];
        let report = reconcile(&managed, &registry_with(&[DATASET_ID]));
        assert_eq!(report.needs_repair.len(), 1);
        assert!(report.unresolvable.is_empty());
    }

    #[test]
    fn unresolvable_names_are_excluded_from_orphan_detection() {
        let managed = vec![current_schema("Vector_index_short_Node")];
        let report = reconcile(&managed, &registry_with(&[DATASET_ID]));
        assert_eq!(report.unresolvable.len(), 1);
        assert!(report.orphaned.is_empty());
    }

    #[test]
    fn records_carry_reporting_metadata() {
        let managed = vec![legacy_schema("Vector_index_aaaa_bbbb_cccc_dddd_eeee_Node")];
        let report = reconcile(&managed, &registry_with(&[]));
        let record = &report.needs_repair[0];
        assert_eq!(record.name, "Vector_index_aaaa_bbbb_cccc_dddd_eeee_Node");
        assert_eq!(record.format, SchemaFormat::Legacy);
        assert_eq!(record.created_at.as_deref(), Some("Mon Oct  2 10:00:00 2023"));
    }
}

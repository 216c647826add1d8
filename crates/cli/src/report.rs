//! Human-readable rendering of structured reconciliation results
//!
//! The core crates return outcome enums and record lists; everything printed
//! to the terminal lives here.

use std::collections::HashMap;
use vecmend_core::config::Config;
use vecmend_reconciler::{
    BatchReport, CleanupPlan, CleanupReport, CollectionRecord, ReconciliationReport, RepairMode,
    RepairOutcome,
};

const NAME_UNAVAILABLE: &str = "(name unavailable)";
const RULE_WIDTH: usize = 70;

fn heading(title: &str) {
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("{title}");
    println!("{}", "=".repeat(RULE_WIDTH));
}

pub(crate) fn print_scan_header(config: &Config) {
    heading("Scanning vector-index collections");
    println!("Endpoint: {}", config.weaviate.endpoint);
    println!(
        "Auth:     {}",
        if config.weaviate.api_key.is_some() {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!();
}

pub(crate) fn print_scan(
    total: usize,
    report: &ReconciliationReport,
    registry_available: bool,
    names: &HashMap<String, String>,
) {
    println!("Total collections:   {total}");
    println!("Managed collections: {}", report.managed_total());
    println!(
        "Current format:      {}",
        report.managed_total() - report.needs_repair.len()
    );
    println!("Needing repair:      {}", report.needs_repair.len());
    if registry_available {
        println!("Orphaned:            {}", report.orphaned.len());
    } else {
        println!("Orphaned:            unknown (registry unreachable)");
    }
    println!();

    if !report.needs_repair.is_empty() {
        println!("Collections needing repair:");
        println!("{}", "-".repeat(RULE_WIDTH));
        for (index, record) in report.needs_repair.iter().enumerate() {
            let name = names
                .get(record.key.as_str())
                .map(String::as_str)
                .unwrap_or(NAME_UNAVAILABLE);
            println!("{:2}. {}", index + 1, record.name);
            println!("    Dataset ID: {}", record.key);
            println!("    Name:       {name}");
            println!(
                "    Created:    {}",
                record.created_at.as_deref().unwrap_or("unknown")
            );
            println!();
        }
    }

    if !report.unresolvable.is_empty() {
        println!("Collections that cannot be correlated to a dataset (left untouched):");
        for record in &report.unresolvable {
            println!("  - {}", record.name);
        }
        println!();
    }
}

pub(crate) fn print_repair_warning(count: usize) {
    println!("This will delete and recreate {count} collections.");
    println!("Vector data will be cleared; embeddings must be regenerated afterwards.");
    println!("This action cannot be undone.");
    println!();
}

pub(crate) fn print_batch_summary(batch: &BatchReport, mode: RepairMode) {
    println!();
    heading(if mode == RepairMode::Simulate {
        "Summary (dry run)"
    } else {
        "Summary"
    });
    println!("Succeeded: {}", batch.succeeded());
    println!("Failed:    {}", batch.failed().len());

    let failed = batch.failed();
    if !failed.is_empty() {
        println!();
        println!("Failed collections:");
        for (name, error) in failed {
            println!("  - {name}: {error}");
        }
    }
}

pub(crate) fn print_reembed_checklist(
    records: &[CollectionRecord],
    batch: &BatchReport,
    names: &HashMap<String, String>,
) {
    let repaired = batch.repaired();
    if repaired.is_empty() {
        return;
    }

    println!();
    heading("Next steps: regenerate embeddings");
    println!("Repaired collections start empty; re-embed the following datasets:");
    println!();
    for record in records
        .iter()
        .filter(|r| repaired.contains(&r.name.as_str()))
    {
        let name = names
            .get(record.key.as_str())
            .map(String::as_str)
            .unwrap_or(NAME_UNAVAILABLE);
        println!("  - {name}");
        println!("    ID: {}", record.key);
    }
}

pub(crate) fn print_single_outcome(name: &str, outcome: RepairOutcome) {
    match outcome {
        RepairOutcome::Repaired => {
            println!("Repaired {name}.");
            println!("Remember to regenerate embeddings for this collection.");
        }
        RepairOutcome::AlreadyCurrent => {
            println!("{name} is already in the current format, nothing to do.");
        }
        RepairOutcome::WouldRepair => {
            println!("{name} would be deleted and recreated.");
        }
    }
}

pub(crate) fn print_cleanup_plan(plan: &CleanupPlan) {
    println!("Orphaned collections (no matching dataset record):");
    println!("{}", "-".repeat(RULE_WIDTH));
    for candidate in &plan.candidates {
        println!("  - {}", candidate.name);
        println!("    Dataset ID: {}", candidate.dataset_id);
        println!("    Objects:    {}", candidate.object_count);
    }
    println!();
}

pub(crate) fn print_cleanup_report(report: &CleanupReport) {
    if report.cancelled {
        println!("Cancelled.");
        return;
    }
    for name in &report.deleted {
        println!("Deleted {name}");
    }
    for (name, error) in &report.failed {
        println!("Failed to delete {name}: {error}");
    }
    println!();
    println!(
        "Cleanup complete: {} deleted, {} failed.",
        report.deleted.len(),
        report.failed.len()
    );
}

pub(crate) fn print_reembed_names(
    records: &[CollectionRecord],
    names: &HashMap<String, String>,
) {
    if records.is_empty() {
        println!("No collections need repair.");
        return;
    }

    heading("Datasets needing re-embedding");
    for record in records {
        let name = names
            .get(record.key.as_str())
            .map(String::as_str)
            .unwrap_or(NAME_UNAVAILABLE);
        println!();
        println!("- {name}");
        println!("  ID:         {}", record.key);
        println!("  Collection: {}", record.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecmend_core::schema::{CorrelationKey, SchemaFormat};

    fn record(name: &str, format: SchemaFormat) -> CollectionRecord {
        CollectionRecord {
            name: name.to_string(),
            key: CorrelationKey::from_collection_name(name),
            format,
            created_at: Some("Mon Oct  2 10:00:00 2023".to_string()),
        }
    }

    #[test]
    fn scan_report_renders_without_panicking() {
        let report = ReconciliationReport {
            needs_repair: vec![record(
                "Vector_index_a1_a2_a3_a4_a5_Node",
                SchemaFormat::Legacy,
            )],
            orphaned: vec![record(
                "Vector_index_b1_b2_b3_b4_b5_Node",
                SchemaFormat::Current,
            )],
            healthy: Vec::new(),
            unresolvable: vec![record("Vector_index_short_Node", SchemaFormat::Current)],
        };
        let mut names = HashMap::new();
        names.insert("a1-a2-a3-a4-a5".to_string(), "docs".to_string());

        print_scan(5, &report, true, &names);
        print_scan(5, &report, false, &HashMap::new());
        print_reembed_names(&report.needs_repair, &names);
    }

    #[test]
    fn cleanup_views_render_without_panicking() {
        use vecmend_reconciler::CleanupCandidate;

        let plan = CleanupPlan {
            candidates: vec![CleanupCandidate {
                name: "Vector_index_b1_b2_b3_b4_b5_Node".to_string(),
                dataset_id: "b1-b2-b3-b4-b5".to_string(),
                object_count: 7,
            }],
        };
        print_cleanup_plan(&plan);

        let cleanup = CleanupReport {
            deleted: vec!["Vector_index_b1_b2_b3_b4_b5_Node".to_string()],
            failed: Vec::new(),
            cancelled: false,
        };
        print_cleanup_report(&cleanup);
    }
}

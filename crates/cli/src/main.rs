//! vecmend - vector-index schema reconciliation and repair
//!
//! Detects index collections created under the obsolete schema dialect,
//! rebuilds them under the current one, and cross-checks the collection
//! inventory against the dataset registry to find orphans.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod report;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use std::collections::HashMap;
use tracing::{info, warn};
use vecmend_core::config::Config;
use vecmend_reconciler::{
    build_cleanup_plan, managed_collections, reconcile, registry_ids, remove_orphans,
    repair_collection, resolve_dataset_names, run_batch_repair, ReconciliationReport, RegistryIds,
    RepairMode,
};
use vecmend_storage::{
    create_dataset_registry, create_vector_store, DatasetRegistry, VectorIndexStore,
};

#[derive(Parser)]
#[command(name = "vecmend")]
#[command(about = "Reconcile and repair vector-index collections")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan and list collections needing repair
    Scan,
    /// Simulate the batch repair without touching the service
    DryRun,
    /// Repair all legacy-format collections (requires confirmation)
    Fix,
    /// Repair a single collection by name
    FixOne {
        /// Collection name, e.g. Vector_index_..._Node
        name: String,
    },
    /// Find and remove orphaned collections (requires confirmation)
    Cleanup,
    /// List dataset names needing re-embedding
    ListNames,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = Config::from_env().context("Failed to read configuration")?;
    config.validate()?;

    match cli.command {
        Some(Commands::Scan) => scan(&config).await,
        Some(Commands::DryRun) => batch_fix(&config, RepairMode::Simulate).await,
        Some(Commands::Fix) => batch_fix(&config, RepairMode::Apply).await,
        Some(Commands::FixOne { name }) => fix_one(&config, &name).await,
        Some(Commands::Cleanup) => cleanup(&config).await,
        Some(Commands::ListNames) => list_names(&config).await,
        None => {
            println!("Run 'vecmend scan' to inspect collections, or --help for more options");
            Ok(())
        }
    }
}

/// Initialize logging system
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "vecmend={level},vecmend_core={level},vecmend_storage={level},vecmend_reconciler={level}"
        ))
        .init();
}

/// Everything one scan pass produces
struct ScanOutput {
    /// Collections the service reported, managed or not
    total: usize,
    report: ReconciliationReport,
    registry: RegistryIds,
    /// Dataset names resolved for the needs-repair set
    names: HashMap<String, String>,
}

/// Probe the service, read both inventories, and reconcile.
///
/// Returns `None` when the vector-index service is not reachable; no command
/// can do anything useful then.
async fn run_scan(
    store: &dyn VectorIndexStore,
    registry: &dyn DatasetRegistry,
    config: &Config,
) -> Option<ScanOutput> {
    report::print_scan_header(config);

    if !store.ready().await {
        warn!(
            "Vector-index service at {} is not reachable",
            config.weaviate.endpoint
        );
        return None;
    }

    let inventory = managed_collections(store).await;
    let ids = registry_ids(registry).await;
    let reconciled = reconcile(&inventory.managed, &ids);

    let repair_ids: Vec<String> = reconciled
        .needs_repair
        .iter()
        .filter_map(|r| r.key.id().map(str::to_string))
        .collect();
    let names = resolve_dataset_names(registry, &repair_ids).await;

    Some(ScanOutput {
        total: inventory.total,
        report: reconciled,
        registry: ids,
        names,
    })
}

/// Scan and report, no changes
async fn scan(config: &Config) -> Result<()> {
    let store = create_vector_store(&config.weaviate)?;
    let registry = create_dataset_registry(&config.registry)?;

    let Some(output) = run_scan(store.as_ref(), registry.as_ref(), config).await else {
        return Ok(());
    };

    report::print_scan(
        output.total,
        &output.report,
        output.registry.available,
        &output.names,
    );

    if output.report.needs_repair.is_empty() {
        println!("No collections need repair.");
    }
    Ok(())
}

/// Repair every legacy-format collection, or simulate doing so
async fn batch_fix(config: &Config, mode: RepairMode) -> Result<()> {
    let store = create_vector_store(&config.weaviate)?;
    let registry = create_dataset_registry(&config.registry)?;

    let Some(output) = run_scan(store.as_ref(), registry.as_ref(), config).await else {
        return Ok(());
    };

    report::print_scan(
        output.total,
        &output.report,
        output.registry.available,
        &output.names,
    );

    if output.report.needs_repair.is_empty() {
        println!("No collections need repair.");
        return Ok(());
    }

    // The batch rebuild is irreversible; simulate mode skips the gate.
    if mode == RepairMode::Apply {
        report::print_repair_warning(output.report.needs_repair.len());
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Proceed with repairing {} collections?",
                output.report.needs_repair.len()
            ))
            .default(false)
            .interact()
            .map_err(|e| anyhow!("Failed to read confirmation: {e}"))?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
        info!("User confirmed batch repair, proceeding");
    }

    let names: Vec<String> = output
        .report
        .needs_repair
        .iter()
        .map(|r| r.name.clone())
        .collect();
    let batch = run_batch_repair(store.as_ref(), &names, mode).await;

    report::print_batch_summary(&batch, mode);

    if mode == RepairMode::Apply {
        // Resolve names again for the repaired subset; the scan-time map
        // already covers them but a partial failure may have shrunk the set.
        let repaired = batch.repaired();
        let repaired_ids: Vec<String> = output
            .report
            .needs_repair
            .iter()
            .filter(|r| repaired.contains(&r.name.as_str()))
            .filter_map(|r| r.key.id().map(str::to_string))
            .collect();
        let dataset_names = resolve_dataset_names(registry.as_ref(), &repaired_ids).await;
        report::print_reembed_checklist(&output.report.needs_repair, &batch, &dataset_names);
    }
    Ok(())
}

/// Repair one explicitly named collection
async fn fix_one(config: &Config, name: &str) -> Result<()> {
    let store = create_vector_store(&config.weaviate)?;

    info!("Repairing {name}");
    match repair_collection(store.as_ref(), name, RepairMode::Apply).await {
        Ok(outcome) => {
            report::print_single_outcome(name, outcome);
            Ok(())
        }
        Err(e) => Err(anyhow!("Repair of {name} failed: {e}")),
    }
}

/// Find orphaned collections and delete them after confirmation
async fn cleanup(config: &Config) -> Result<()> {
    let store = create_vector_store(&config.weaviate)?;
    let registry = create_dataset_registry(&config.registry)?;

    let Some(output) = run_scan(store.as_ref(), registry.as_ref(), config).await else {
        return Ok(());
    };

    if !output.registry.available {
        println!("Dataset registry could not be queried; orphan cleanup is disabled.");
        return Ok(());
    }

    if output.report.orphaned.is_empty() {
        println!("No orphaned collections found.");
        return Ok(());
    }

    let plan = build_cleanup_plan(store.as_ref(), &output.report.orphaned).await;
    report::print_cleanup_plan(&plan);

    let cleanup_report = remove_orphans(store.as_ref(), &plan, |plan| {
        Confirm::new()
            .with_prompt(format!(
                "Delete {} orphaned collections?",
                plan.candidates.len()
            ))
            .default(false)
            .interact()
            .unwrap_or(false)
    })
    .await;

    report::print_cleanup_report(&cleanup_report);
    Ok(())
}

/// List the datasets whose collections still need repair and re-embedding
async fn list_names(config: &Config) -> Result<()> {
    let store = create_vector_store(&config.weaviate)?;
    let registry = create_dataset_registry(&config.registry)?;

    let Some(output) = run_scan(store.as_ref(), registry.as_ref(), config).await else {
        return Ok(());
    };

    report::print_reembed_names(&output.report.needs_repair, &output.names);
    Ok(())
}

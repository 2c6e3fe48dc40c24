//! Notification replay against a fixture-loaded study.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tracing::{info, warn};

use gridstudy::FixtureBackend;
use gridstudy_core::config::AppConfig;
use gridstudy_core::error::{AppError, ErrorKind};
use gridstudy_core::types::EquipmentType;
use gridstudy_directory::DirectoryExplorer;
use gridstudy_equipment::{EquipmentCache, StudyStore};
use gridstudy_realtime::{DispatchOutcome, NotificationDispatcher};

use crate::output::{self, OutputFormat};

/// Arguments for the replay command
#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Fixture file with directories and equipments
    #[arg(long)]
    pub fixture: PathBuf,

    /// Notification file, one JSON envelope per line
    #[arg(long)]
    pub notifications: PathBuf,
}

/// Per-kind cache summary row
#[derive(Debug, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
struct CacheRow {
    #[tabled(rename = "type")]
    equipment_type: EquipmentType,
    nodes: usize,
    records: usize,
}

/// Replay result
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplayReport {
    outcomes: BTreeMap<String, usize>,
    equipments: Vec<CacheRow>,
    directories: usize,
}

/// Execute the replay command
pub async fn execute(
    args: &ReplayArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let backend = Arc::new(FixtureBackend::from_file(&args.fixture)?);
    let store = Arc::new(StudyStore::new(&config.equipment));
    let explorer = Arc::new(DirectoryExplorer::new(backend.clone(), config.directory.clone()));

    let slots = backend.preload(&store).await?;
    explorer.refresh_roots().await?;
    info!(slots, "Equipment cache preloaded");

    let dispatcher = NotificationDispatcher::new(store.clone(), backend.clone(), config.realtime.clone())
        .with_explorer(explorer.clone());

    let text = std::fs::read_to_string(&args.notifications).map_err(|e| {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to read '{}'", args.notifications.display()),
            e,
        )
    })?;

    let mut report = ReplayReport::default();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let label = match dispatcher.handle_raw(line).await {
            Ok(DispatchOutcome::Applied) => "applied",
            Ok(DispatchOutcome::Ignored) => "ignored",
            Ok(DispatchOutcome::Deduplicated) => "deduplicated",
            Ok(DispatchOutcome::ServerError(_)) => "serverError",
            Err(e) => {
                warn!(line = index + 1, "Notification failed: {}", e);
                output::print_warning(&format!("line {}: {}", index + 1, e));
                "failed"
            }
        };
        *report.outcomes.entry(label.to_string()).or_default() += 1;
    }

    report.equipments = summarize(&store.state());
    report.directories = explorer.tree().len();

    match format {
        OutputFormat::Json => output::print_item(&report, format),
        OutputFormat::Table => {
            output::print_list(&report.equipments, format);
            println!("Notifications:");
            for (outcome, count) in &report.outcomes {
                output::print_kv(outcome, &count.to_string());
            }
            output::print_kv("directories known", &report.directories.to_string());
        }
    }
    Ok(())
}

fn summarize(cache: &EquipmentCache) -> Vec<CacheRow> {
    EquipmentType::ALL
        .iter()
        .filter_map(|ty| {
            let slot = cache.by_type(*ty)?;
            (!slot.is_empty()).then(|| CacheRow {
                equipment_type: *ty,
                nodes: slot.nodes_id().len(),
                records: slot.record_count(),
            })
        })
        .collect()
}

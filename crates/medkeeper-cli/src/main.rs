//! `medkeeper`: command-line front end over the demo unit.
//!
//! Usage:
//!   medkeeper [--config <file>] [--json] <command>
//!
//! Configuration comes from the optional TOML file, then `MEDKEEPER__*`
//! environment variables. Log level follows `RUST_LOG` (default `info`).

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use medkeeper_core::models::{format_display_date, MedicationCategory};
use medkeeper_core::search::{dashboard, list_batches, search};
use medkeeper_core::store::MedicationEdit;
use medkeeper_core::{read_sheet, reminders, Store, StoreConfig, StoreState};

/// Pharmacy-unit medication records.
#[derive(Parser, Debug)]
#[command(name = "medkeeper", about = "Pharmacy-unit patient medication records")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Patient counts and batches needing attention.
    Dashboard,
    /// Search patients and medication records.
    Search { term: String },
    /// List batches, soonest expiry first.
    Batches {
        #[arg(long, default_value = "")]
        filter: String,
    },
    /// Import batches from a spreadsheet or CSV file.
    ImportBatches { file: PathBuf },
    /// Import regimen definitions from a spreadsheet or CSV file.
    ImportRegimens { file: PathBuf },
    /// Depo injections due within the configured horizon.
    Reminders,
    /// Walk through a few edits with undo and redo.
    DemoHistory,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = StoreConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    let today = chrono::Local::now().date_naive();
    let mut state = StoreState::demo(today);
    state.refresh_batch_statuses(today, config.expiring_soon_days);
    let mut store = Store::new(state, config);
    info!(today = %format_display_date(today), "opened demo unit");

    match cli.command {
        Commands::Dashboard => {
            let summary = dashboard(store.state());
            if cli.json {
                return print_json(&summary);
            }
            println!("Active patients:   {}", summary.active_patients);
            println!("Archived patients: {}", summary.archived_patients);
            println!("Expired batches:   {}", summary.expired_count());
            for batch in &summary.attention_batches {
                println!(
                    "  {:<10} {:<12} {:<28} {}  {}",
                    batch.batch_id,
                    batch.medication_code,
                    batch.medication_name,
                    format_display_date(batch.expiry_date),
                    batch.status
                );
            }
        }
        Commands::Search { term } => {
            store.set_search_term(term.as_str());
            let results = search(store.state(), store.search_term());
            if cli.json {
                return print_json(&results);
            }
            if results.is_empty() {
                println!("No results found.");
            }
            for patient in &results.patients {
                println!("patient     {:<6} {:<24} {}", patient.id, patient.name, patient.station);
            }
            for hit in &results.medications {
                println!(
                    "medication  {:<6} {:<24} [{}] {} {}",
                    hit.patient_id,
                    hit.patient_name,
                    hit.category,
                    hit.record.medication_code,
                    hit.record.medication_name
                );
            }
        }
        Commands::Batches { filter } => {
            let batches = list_batches(store.state(), &filter, None);
            if cli.json {
                return print_json(&batches);
            }
            for batch in batches {
                println!(
                    "{:<10} {:<12} {:<28} {}  {}",
                    batch.batch_id,
                    batch.medication_code,
                    batch.medication_name,
                    format_display_date(batch.expiry_date),
                    batch.status
                );
            }
        }
        Commands::ImportBatches { file } => {
            let rows = read_sheet(&file).with_context(|| format!("failed to read {}", file.display()))?;
            let report = store.import_batches(&rows, today)?;
            return print_report(cli.json, &report, "batch(es)");
        }
        Commands::ImportRegimens { file } => {
            let rows = read_sheet(&file).with_context(|| format!("failed to read {}", file.display()))?;
            let report = store.import_regimens(&rows)?;
            return print_report(cli.json, &report, "regimen(s)");
        }
        Commands::Reminders => {
            let horizon = store.config().reminder_horizon_days;
            let due = reminders::due_reminders(store.state(), today, horizon);
            if cli.json {
                return print_json(&due);
            }
            if due.is_empty() {
                println!("No depo injections due in the next {} days.", horizon);
            }
            for reminder in due {
                println!(
                    "{}  {:<6} {:<24} {:<5} {}",
                    format_display_date(reminder.due),
                    reminder.patient_id,
                    reminder.patient_name,
                    reminder.station,
                    reminder.medication_name
                );
            }
        }
        Commands::DemoHistory => demo_history(&mut store, today)?,
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_report(json: bool, report: &medkeeper_core::ImportReport, what: &str) -> anyhow::Result<()> {
    if json {
        return print_json(report);
    }
    println!(
        "{} {} imported. {} invalid row(s) skipped.",
        report.added, what, report.skipped
    );
    Ok(())
}

/// Add a daily row for the first patient, fill it in, then step back and
/// forward through the history.
fn demo_history(store: &mut Store, today: NaiveDate) -> anyhow::Result<()> {
    let patient_id = store
        .state()
        .patients
        .first()
        .map(|p| p.id.clone())
        .context("demo unit has no patients")?;

    let row = store.add_medication_row(&patient_id, MedicationCategory::Daily)?;
    let update = store.update_medication_record(
        &patient_id,
        MedicationCategory::Daily,
        &row,
        MedicationEdit::Code("ASP81".into()),
        today,
    )?;
    store.update_medication_record(
        &patient_id,
        MedicationCategory::Daily,
        &row,
        MedicationEdit::Regimen("1+0+0".into()),
        today,
    )?;
    println!(
        "Added ASP81 to {} (duplicate in list: {}); undo depth {}",
        patient_id,
        update.duplicate_code,
        store.history().undo_depth()
    );

    let daily_len = |store: &Store| {
        store
            .patient(&patient_id)
            .map(|p| p.medications.daily.len())
            .unwrap_or(0)
    };
    while store.undo() {
        println!("undo  -> daily list has {} row(s)", daily_len(store));
    }
    while store.redo() {
        println!("redo  -> daily list has {} row(s)", daily_len(store));
    }
    Ok(())
}

//! Spreadsheet import for the batch and regimen pages.
//!
//! Batch sheets carry `medicationCode`, `medicationName`, `batchId` and
//! `expiryDate` columns; regimen sheets carry `code` and `meaning`. Rows that
//! fail validation are skipped and counted, never fatal.

mod sheet;

pub use sheet::*;

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{excel_serial_to_date, parse_display_date, Batch, RegimenDefinition};
use crate::store::{Store, StoreResult};

/// Import errors.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Workbook has no worksheets")]
    NoWorksheet,
}

pub type ImportResult<T> = Result<T, ImportError>;

/// Outcome of an import.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ImportReport {
    pub added: usize,
    pub skipped: usize,
}

impl Store {
    /// Add every valid batch row. A row needs all four columns, a batch id
    /// not already known (including earlier rows of the same sheet), and an
    /// expiry given as an Excel serial or `dd/MM/yyyy` text.
    pub fn import_batches(&mut self, rows: &[SheetRow], today: NaiveDate) -> StoreResult<ImportReport> {
        let window = self.config().expiring_soon_days;
        let mut known: HashSet<String> = self
            .state()
            .batches
            .iter()
            .map(|b| b.batch_id.clone())
            .collect();

        let mut report = ImportReport::default();
        let mut batches = Vec::new();
        for row in rows {
            match batch_from_row(row, &known, today, window) {
                Ok(batch) => {
                    known.insert(batch.batch_id.clone());
                    batches.push(batch);
                    report.added += 1;
                }
                Err(reason) => {
                    warn!(line = row.line, reason, "skipped batch row");
                    report.skipped += 1;
                }
            }
        }

        self.mutate_if_changed("import batches", |state| {
            let changed = !batches.is_empty();
            state.batches.extend(batches);
            state.sort_batches_by_expiry();
            Ok(((), changed))
        })?;
        info!(added = report.added, skipped = report.skipped, "imported batches");
        Ok(report)
    }

    /// Add every row with text `code` and `meaning`. Codes may repeat.
    pub fn import_regimens(&mut self, rows: &[SheetRow]) -> StoreResult<ImportReport> {
        let mut report = ImportReport::default();
        let mut regimens = Vec::new();
        for row in rows {
            let code = row.get("code").and_then(Cell::as_text);
            let meaning = row.get("meaning").and_then(Cell::as_text);
            match (code, meaning) {
                (Some(code), Some(meaning)) => {
                    regimens.push(RegimenDefinition::new(code, meaning.to_string()));
                    report.added += 1;
                }
                _ => {
                    warn!(line = row.line, "skipped regimen row without text code and meaning");
                    report.skipped += 1;
                }
            }
        }

        self.mutate_if_changed("import regimens", |state| {
            let changed = !regimens.is_empty();
            state.regimens.extend(regimens);
            Ok(((), changed))
        })?;
        info!(added = report.added, skipped = report.skipped, "imported regimens");
        Ok(report)
    }
}

fn batch_from_row(
    row: &SheetRow,
    known: &HashSet<String>,
    today: NaiveDate,
    window: u32,
) -> Result<Batch, &'static str> {
    let code = row.get("medicationCode").and_then(Cell::to_display);
    let name = row.get("medicationName").and_then(Cell::to_display);
    let batch_id = row.get("batchId").and_then(Cell::to_display);
    let (Some(code), Some(name), Some(batch_id)) = (code, name, batch_id) else {
        return Err("missing column value");
    };
    if known.contains(&batch_id) {
        return Err("duplicate batch id");
    }
    let expiry = match row.get("expiryDate") {
        Some(Cell::Number(serial)) => excel_serial_to_date(*serial),
        Some(Cell::Text(text)) => parse_display_date(text),
        _ => return Err("missing column value"),
    }
    .ok_or("unparsable expiry date")?;

    Ok(Batch::new(&code, name, batch_id, expiry, today, window))
}

//! MedKeeper Core Library
//!
//! Patient-medication record keeping for a pharmacy unit: patient charts
//! with regular, daily and depo medication lists, medication batches with
//! expiry tracking, regimen codes, stations and patient categories.
//!
//! # Architecture
//!
//! ```text
//!   UI / CLI ──► MedKeeper (FFI object) ──► Store ──► StoreState (snapshot)
//!                                             │
//!                                             ├── History (undo / redo snapshots)
//!                                             └── view state (search term, station filter)
//!
//!   search, reminders, grid ── read-only views over StoreState
//!   import ── spreadsheet rows ──► Store (one history entry per import)
//! ```
//!
//! # Core Principle
//!
//! **Every successful edit is exactly one undo step.** Failed edits change
//! nothing and record nothing.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Patient, MedicationRecord, Batch, etc.)
//! - [`store`]: The record store and every editing operation
//! - [`history`]: Snapshot undo/redo stacks
//! - [`search`]: Global search, table listings, dashboard, suggestions
//! - [`import`]: Spreadsheet import of batches and regimens
//! - [`reminders`]: Depo injection reminders
//! - [`grid`]: Keyboard navigation in editable tables
//! - [`seed`]: Demo data
//! - [`config`]: Store configuration

pub mod config;
pub mod grid;
pub mod history;
pub mod import;
pub mod models;
pub mod reminders;
pub mod search;
pub mod seed;
pub mod store;

// Re-export commonly used types
pub use config::StoreConfig;
pub use history::History;
pub use import::{read_sheet, ImportError, ImportReport};
pub use models::{
    Batch, BatchStatus, BoxRecord, FrequencyUnit, Medication, MedicationCategory, MedicationRecord,
    NotificationSchedule, Patient, PatientCategory, RegimenDefinition, Station,
};
pub use store::{Store, StoreError, StoreState};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;

use models::{format_display_date, parse_display_date};
use store::{
    AddPatientOutcome, BatchEdit, BoxField, MedicationEdit, NewBatch, NewBox, NewPatient,
    PatientField, RegimenField, StationFilter,
};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MedKeeperError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Import error: {0}")]
    ImportError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for MedKeeperError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => MedKeeperError::NotFound(e.to_string()),
            StoreError::MissingField(_) | StoreError::InvalidInput(_) => {
                MedKeeperError::InvalidInput(e.to_string())
            }
            StoreError::DuplicatePatient(_)
            | StoreError::DuplicateBatch(_)
            | StoreError::DuplicateName { .. } => MedKeeperError::Duplicate(e.to_string()),
        }
    }
}

impl From<ImportError> for MedKeeperError {
    fn from(e: ImportError) -> Self {
        MedKeeperError::ImportError(e.to_string())
    }
}

impl From<::config::ConfigError> for MedKeeperError {
    fn from(e: ::config::ConfigError) -> Self {
        MedKeeperError::ConfigError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for MedKeeperError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        MedKeeperError::Internal(format!("Lock poisoned: {}", e))
    }
}

fn parse_date_arg(text: &str) -> Result<NaiveDate, MedKeeperError> {
    parse_display_date(text)
        .ok_or_else(|| MedKeeperError::InvalidInput(format!("'{}' is not a dd/MM/yyyy date", text)))
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

fn wrap(store: Store) -> Arc<MedKeeper> {
    Arc::new(MedKeeper {
        store: Arc::new(Mutex::new(store)),
    })
}

/// Open a store seeded with the demo unit.
#[uniffi::export]
pub fn open_demo_store() -> Arc<MedKeeper> {
    let config = StoreConfig::default();
    let mut state = StoreState::demo(today());
    state.refresh_batch_statuses(today(), config.expiring_soon_days);
    wrap(Store::new(state, config))
}

/// Open an empty store.
#[uniffi::export]
pub fn open_empty_store() -> Arc<MedKeeper> {
    wrap(Store::default())
}

/// Open a demo store configured from a TOML file and the environment.
#[uniffi::export]
pub fn open_store_with_config(config_path: Option<String>) -> Result<Arc<MedKeeper>, MedKeeperError> {
    let config = StoreConfig::load(config_path.as_deref().map(Path::new))?;
    let mut state = StoreState::demo(today());
    state.refresh_batch_statuses(today(), config.expiring_soon_days);
    Ok(wrap(Store::new(state, config)))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe store wrapper for FFI.
#[derive(uniffi::Object)]
pub struct MedKeeper {
    store: Arc<Mutex<Store>>,
}

impl MedKeeper {
    fn lock(&self) -> Result<MutexGuard<'_, Store>, MedKeeperError> {
        Ok(self.store.lock()?)
    }
}

#[uniffi::export]
impl MedKeeper {
    // =========================================================================
    // History
    // =========================================================================

    /// Revert the last edit. Returns false when there is nothing to undo.
    pub fn undo(&self) -> Result<bool, MedKeeperError> {
        Ok(self.lock()?.undo())
    }

    /// Re-apply the last undone edit.
    pub fn redo(&self) -> Result<bool, MedKeeperError> {
        Ok(self.lock()?.redo())
    }

    pub fn can_undo(&self) -> Result<bool, MedKeeperError> {
        Ok(self.lock()?.can_undo())
    }

    pub fn can_redo(&self) -> Result<bool, MedKeeperError> {
        Ok(self.lock()?.can_redo())
    }

    // =========================================================================
    // Search & Dashboard
    // =========================================================================

    /// Set the global search term and return its results.
    pub fn search(&self, term: String) -> Result<FfiSearchResults, MedKeeperError> {
        let mut store = self.lock()?;
        store.set_search_term(term.as_str());
        let results = search::search(store.state(), &term);
        Ok(FfiSearchResults {
            patients: results.patients.into_iter().map(FfiPatient::from).collect(),
            medications: results
                .medications
                .into_iter()
                .map(|hit| FfiMedicationHit {
                    patient_id: hit.patient_id.to_string(),
                    patient_name: hit.patient_name.to_string(),
                    category: hit.category.into(),
                    record: hit.record.into(),
                })
                .collect(),
        })
    }

    pub fn dashboard(&self) -> Result<FfiDashboard, MedKeeperError> {
        let store = self.lock()?;
        let summary = search::dashboard(store.state());
        Ok(FfiDashboard {
            active_patients: summary.active_patients as u32,
            archived_patients: summary.archived_patients as u32,
            attention_batches: summary.attention_batches.into_iter().map(FfiBatch::from).collect(),
        })
    }

    /// Catalog suggestions for a medication code or name cell.
    pub fn suggest_medications(&self, term: String, limit: u32) -> Result<Vec<FfiMedication>, MedKeeperError> {
        let store = self.lock()?;
        Ok(search::suggest_medications(store.state(), &term, limit as usize)
            .into_iter()
            .map(|s| FfiMedication::from(s.item))
            .collect())
    }

    /// Distinct regimen codes for a regimen cell.
    pub fn suggest_regimen_codes(&self, term: String) -> Result<Vec<String>, MedKeeperError> {
        let store = self.lock()?;
        Ok(search::suggest_regimen_codes(store.state(), &term)
            .into_iter()
            .map(|s| s.item.to_string())
            .collect())
    }

    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Active patients under the current station filter.
    pub fn list_patients(&self) -> Result<Vec<FfiPatient>, MedKeeperError> {
        let store = self.lock()?;
        Ok(search::list_patients(store.state(), None, store.station_filter())
            .into_iter()
            .map(FfiPatient::from)
            .collect())
    }

    /// Filter the patient list to one station, or clear the filter with `None`.
    pub fn set_station_filter(&self, station: Option<String>) -> Result<(), MedKeeperError> {
        let filter = station.map(StationFilter::Station).unwrap_or_default();
        self.lock()?.set_station_filter(filter);
        Ok(())
    }

    pub fn get_patient(&self, id: String) -> Result<Option<FfiPatient>, MedKeeperError> {
        let store = self.lock()?;
        Ok(store.patient(&id).map(FfiPatient::from))
    }

    pub fn add_patient(&self, patient: FfiNewPatient) -> Result<FfiAddPatientOutcome, MedKeeperError> {
        let outcome = self.lock()?.add_patient(NewPatient {
            id: patient.id,
            name: patient.name,
            station: patient.station,
            special_notes: patient.special_notes,
        })?;
        Ok(match outcome {
            AddPatientOutcome::Added => FfiAddPatientOutcome::Added,
            AddPatientOutcome::ExistsInArchive(p) => FfiAddPatientOutcome::ExistsInArchive {
                patient: FfiPatient::from(&p),
            },
        })
    }

    pub fn update_patient(&self, id: String, field: FfiPatientField, value: String) -> Result<(), MedKeeperError> {
        self.lock()?.update_patient(&id, field.into(), &value)?;
        Ok(())
    }

    pub fn set_patient_category(
        &self,
        id: String,
        category_id: String,
        selected: bool,
    ) -> Result<(), MedKeeperError> {
        self.lock()?.set_patient_category(&id, &category_id, selected)?;
        Ok(())
    }

    pub fn archive_patient(&self, id: String) -> Result<(), MedKeeperError> {
        self.lock()?.archive_patient(&id)?;
        Ok(())
    }

    pub fn restore_archived_patient(&self, id: String) -> Result<(), MedKeeperError> {
        self.lock()?.restore_archived_patient(&id)?;
        Ok(())
    }

    pub fn delete_archived_patient(&self, id: String) -> Result<(), MedKeeperError> {
        self.lock()?.delete_archived_patient(&id)?;
        Ok(())
    }

    pub fn list_archives(&self, term: String) -> Result<Vec<FfiPatient>, MedKeeperError> {
        let store = self.lock()?;
        Ok(search::list_archives(store.state(), &term)
            .into_iter()
            .map(FfiPatient::from)
            .collect())
    }

    // =========================================================================
    // Box Operations
    // =========================================================================

    pub fn add_box(&self, patient_id: String, new_box: FfiNewBox) -> Result<String, MedKeeperError> {
        let pack_date = parse_date_arg(&new_box.pack_date)?;
        Ok(self.lock()?.add_box(
            &patient_id,
            NewBox {
                box_id: new_box.box_id,
                cycle: new_box.cycle,
                pack_date,
                notes: new_box.notes,
            },
        )?)
    }

    pub fn update_box(
        &self,
        patient_id: String,
        box_record_id: String,
        field: FfiBoxField,
        value: String,
    ) -> Result<(), MedKeeperError> {
        self.lock()?
            .update_box(&patient_id, &box_record_id, field.into(), &value)?;
        Ok(())
    }

    pub fn remove_box(&self, patient_id: String, box_record_id: String) -> Result<(), MedKeeperError> {
        self.lock()?.remove_box(&patient_id, &box_record_id)?;
        Ok(())
    }

    // =========================================================================
    // Medication Record Operations
    // =========================================================================

    /// Prepend a blank row to one of a patient's lists. Returns the row id.
    pub fn add_medication_row(
        &self,
        patient_id: String,
        category: FfiMedicationCategory,
    ) -> Result<String, MedKeeperError> {
        Ok(self.lock()?.add_medication_row(&patient_id, category.into())?)
    }

    pub fn remove_medication_row(
        &self,
        patient_id: String,
        category: FfiMedicationCategory,
        record_id: String,
    ) -> Result<(), MedKeeperError> {
        self.lock()?
            .remove_medication_row(&patient_id, category.into(), &record_id)?;
        Ok(())
    }

    /// Edit one cell of a medication record. Returns true when the edited
    /// code now appears more than once in the list.
    pub fn update_medication_record(
        &self,
        patient_id: String,
        category: FfiMedicationCategory,
        record_id: String,
        edit: FfiMedicationEdit,
    ) -> Result<bool, MedKeeperError> {
        let edit = MedicationEdit::try_from(edit)?;
        let update = self.lock()?.update_medication_record(
            &patient_id,
            category.into(),
            &record_id,
            edit,
            today(),
        )?;
        Ok(update.duplicate_code)
    }

    /// Every meaning recorded for a regimen code.
    pub fn regimen_meanings(&self, code: String) -> Result<Vec<String>, MedKeeperError> {
        let store = self.lock()?;
        Ok(store
            .regimen_meanings(&code)
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    pub fn upsert_medication(&self, medication: FfiMedication) -> Result<(), MedKeeperError> {
        self.lock()?
            .upsert_medication(Medication::new(&medication.code, &medication.name))?;
        Ok(())
    }

    // =========================================================================
    // Batch Operations
    // =========================================================================

    /// Batches matching `term`, soonest expiry first.
    pub fn list_batches(&self, term: String) -> Result<Vec<FfiBatch>, MedKeeperError> {
        let store = self.lock()?;
        Ok(search::list_batches(store.state(), &term, None)
            .into_iter()
            .map(FfiBatch::from)
            .collect())
    }

    pub fn add_batch(&self, batch: FfiNewBatch) -> Result<String, MedKeeperError> {
        Ok(self.lock()?.add_batch(
            NewBatch {
                medication_code: batch.medication_code,
                medication_name: batch.medication_name,
                batch_id: batch.batch_id,
                expiry_date: batch.expiry_date,
            },
            today(),
        )?)
    }

    pub fn update_batch(&self, id: String, edit: FfiBatchEdit) -> Result<(), MedKeeperError> {
        self.lock()?.update_batch(&id, edit.into(), today())?;
        Ok(())
    }

    pub fn remove_batch(&self, id: String) -> Result<(), MedKeeperError> {
        self.lock()?.remove_batch(&id)?;
        Ok(())
    }

    /// Recompute batch statuses for today. Returns how many changed.
    pub fn refresh_batch_statuses(&self) -> Result<u32, MedKeeperError> {
        Ok(self.lock()?.refresh_batch_statuses(today())? as u32)
    }

    /// Catalog name for a code, for the add-batch form.
    pub fn medication_name_for_code(&self, code: String) -> Result<Option<String>, MedKeeperError> {
        Ok(self.lock()?.medication_name_for_code(&code))
    }

    // =========================================================================
    // Regimen Operations
    // =========================================================================

    pub fn list_regimens(&self, term: String) -> Result<Vec<FfiRegimen>, MedKeeperError> {
        let store = self.lock()?;
        Ok(search::list_regimens(store.state(), &term, None)
            .into_iter()
            .map(FfiRegimen::from)
            .collect())
    }

    pub fn add_regimen(&self, code: String, meaning: String) -> Result<String, MedKeeperError> {
        Ok(self.lock()?.add_regimen(&code, &meaning)?)
    }

    pub fn update_regimen(&self, id: String, field: FfiRegimenField, value: String) -> Result<(), MedKeeperError> {
        self.lock()?.update_regimen(&id, field.into(), &value)?;
        Ok(())
    }

    pub fn delete_regimen(&self, id: String) -> Result<(), MedKeeperError> {
        self.lock()?.delete_regimen(&id)?;
        Ok(())
    }

    // =========================================================================
    // Station & Category Operations
    // =========================================================================

    pub fn list_stations(&self, term: String) -> Result<Vec<FfiNamedEntry>, MedKeeperError> {
        let store = self.lock()?;
        Ok(search::list_stations(store.state(), &term)
            .into_iter()
            .map(|s| FfiNamedEntry {
                id: s.id.clone(),
                name: s.name.clone(),
            })
            .collect())
    }

    pub fn add_station(&self, name: String) -> Result<String, MedKeeperError> {
        Ok(self.lock()?.add_station(&name)?)
    }

    pub fn rename_station(&self, id: String, name: String) -> Result<(), MedKeeperError> {
        self.lock()?.rename_station(&id, &name)?;
        Ok(())
    }

    pub fn delete_station(&self, id: String) -> Result<(), MedKeeperError> {
        self.lock()?.delete_station(&id)?;
        Ok(())
    }

    pub fn list_categories(&self, term: String) -> Result<Vec<FfiNamedEntry>, MedKeeperError> {
        let store = self.lock()?;
        Ok(search::list_categories(store.state(), &term)
            .into_iter()
            .map(|c| FfiNamedEntry {
                id: c.id.clone(),
                name: c.name.clone(),
            })
            .collect())
    }

    pub fn add_category(&self, name: String) -> Result<String, MedKeeperError> {
        Ok(self.lock()?.add_category(&name)?)
    }

    pub fn rename_category(&self, id: String, name: String) -> Result<(), MedKeeperError> {
        self.lock()?.rename_category(&id, &name)?;
        Ok(())
    }

    pub fn delete_category(&self, id: String) -> Result<(), MedKeeperError> {
        self.lock()?.delete_category(&id)?;
        Ok(())
    }

    // =========================================================================
    // Import & Reminders
    // =========================================================================

    /// Import batches from the first sheet of a spreadsheet or CSV file.
    pub fn import_batches(&self, path: String) -> Result<FfiImportReport, MedKeeperError> {
        let rows = read_sheet(Path::new(&path))?;
        let report = self.lock()?.import_batches(&rows, today())?;
        Ok(report.into())
    }

    /// Import regimen definitions from the first sheet of a file.
    pub fn import_regimens(&self, path: String) -> Result<FfiImportReport, MedKeeperError> {
        let rows = read_sheet(Path::new(&path))?;
        let report = self.lock()?.import_regimens(&rows)?;
        Ok(report.into())
    }

    /// Depo injections due within the configured horizon.
    pub fn due_reminders(&self) -> Result<Vec<FfiReminder>, MedKeeperError> {
        let store = self.lock()?;
        let horizon = store.config().reminder_horizon_days;
        Ok(reminders::due_reminders(store.state(), today(), horizon)
            .into_iter()
            .map(FfiReminder::from)
            .collect())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe medication list selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiMedicationCategory {
    Regular,
    Daily,
    Depo,
}

impl From<FfiMedicationCategory> for MedicationCategory {
    fn from(category: FfiMedicationCategory) -> Self {
        match category {
            FfiMedicationCategory::Regular => MedicationCategory::Regular,
            FfiMedicationCategory::Daily => MedicationCategory::Daily,
            FfiMedicationCategory::Depo => MedicationCategory::Depo,
        }
    }
}

impl From<MedicationCategory> for FfiMedicationCategory {
    fn from(category: MedicationCategory) -> Self {
        match category {
            MedicationCategory::Regular => FfiMedicationCategory::Regular,
            MedicationCategory::Daily => FfiMedicationCategory::Daily,
            MedicationCategory::Depo => FfiMedicationCategory::Depo,
        }
    }
}

/// FFI-safe catalog entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedication {
    pub code: String,
    pub name: String,
}

impl From<&Medication> for FfiMedication {
    fn from(medication: &Medication) -> Self {
        Self {
            code: medication.code.clone(),
            name: medication.name.clone(),
        }
    }
}

/// FFI-safe medication record. Dates are `dd/MM/yyyy`.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicationRecord {
    pub id: String,
    pub medication_code: String,
    pub medication_name: String,
    pub dose: String,
    pub regimen: String,
    pub regimen_meaning: Option<String>,
    pub notes: String,
    pub batch_id: String,
    pub expiry_date: Option<String>,
    pub notify: bool,
    pub notification_start: Option<String>,
    pub frequency_value: Option<u32>,
    pub frequency_unit: Option<String>,
}

impl From<&MedicationRecord> for FfiMedicationRecord {
    fn from(record: &MedicationRecord) -> Self {
        let schedule = record.schedule.as_ref();
        Self {
            id: record.id.clone(),
            medication_code: record.medication_code.clone(),
            medication_name: record.medication_name.clone(),
            dose: record.dose.clone(),
            regimen: record.regimen.clone(),
            regimen_meaning: record.regimen_meaning.clone(),
            notes: record.notes.clone(),
            batch_id: record.batch_id.clone(),
            expiry_date: record.expiry_date.map(format_display_date),
            notify: record.notifies(),
            notification_start: schedule.and_then(|s| s.start_date).map(format_display_date),
            frequency_value: schedule.and_then(|s| s.frequency_value),
            frequency_unit: schedule.map(|s| s.frequency_unit.to_string()),
        }
    }
}

/// FFI-safe medication-record cell edit. Dates are `dd/MM/yyyy`.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiMedicationEdit {
    Code { value: String },
    Name { value: String },
    Dose { value: String },
    Regimen { value: String },
    RegimenMeaning { value: String },
    Notes { value: String },
    BatchId { value: String },
    Notify { value: bool },
    NotificationStart { value: Option<String> },
    FrequencyValue { value: Option<u32> },
    FrequencyUnit { value: String },
}

impl TryFrom<FfiMedicationEdit> for MedicationEdit {
    type Error = MedKeeperError;

    fn try_from(edit: FfiMedicationEdit) -> Result<Self, Self::Error> {
        Ok(match edit {
            FfiMedicationEdit::Code { value } => MedicationEdit::Code(value),
            FfiMedicationEdit::Name { value } => MedicationEdit::Name(value),
            FfiMedicationEdit::Dose { value } => MedicationEdit::Dose(value),
            FfiMedicationEdit::Regimen { value } => MedicationEdit::Regimen(value),
            FfiMedicationEdit::RegimenMeaning { value } => MedicationEdit::RegimenMeaning(value),
            FfiMedicationEdit::Notes { value } => MedicationEdit::Notes(value),
            FfiMedicationEdit::BatchId { value } => MedicationEdit::BatchId(value),
            FfiMedicationEdit::Notify { value } => MedicationEdit::Notify(value),
            FfiMedicationEdit::NotificationStart { value } => MedicationEdit::NotificationStart(
                value.as_deref().map(parse_date_arg).transpose()?,
            ),
            FfiMedicationEdit::FrequencyValue { value } => MedicationEdit::FrequencyValue(value),
            FfiMedicationEdit::FrequencyUnit { value } => MedicationEdit::FrequencyUnit(
                value.parse().map_err(MedKeeperError::InvalidInput)?,
            ),
        })
    }
}

/// FFI-safe box record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBox {
    pub id: String,
    pub box_id: String,
    pub cycle: String,
    pub pack_date: String,
    pub notes: String,
}

impl From<&BoxRecord> for FfiBox {
    fn from(record: &BoxRecord) -> Self {
        Self {
            id: record.id.clone(),
            box_id: record.box_id.clone(),
            cycle: record.cycle.clone(),
            pack_date: format_display_date(record.pack_date),
            notes: record.notes.clone(),
        }
    }
}

/// FFI-safe patient with all three medication lists.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub name: String,
    pub station: String,
    pub category_ids: Vec<String>,
    pub special_notes: String,
    pub regular: Vec<FfiMedicationRecord>,
    pub daily: Vec<FfiMedicationRecord>,
    pub depo: Vec<FfiMedicationRecord>,
    pub boxes: Vec<FfiBox>,
}

impl From<&Patient> for FfiPatient {
    fn from(patient: &Patient) -> Self {
        let records = |list: &[MedicationRecord]| -> Vec<FfiMedicationRecord> {
            list.iter().map(FfiMedicationRecord::from).collect()
        };
        Self {
            id: patient.id.clone(),
            name: patient.name.clone(),
            station: patient.station.clone(),
            category_ids: patient.category_ids.clone(),
            special_notes: patient.special_notes.clone(),
            regular: records(&patient.medications.regular),
            daily: records(&patient.medications.daily),
            depo: records(&patient.medications.depo),
            boxes: patient.boxes.iter().map(FfiBox::from).collect(),
        }
    }
}

/// FFI-safe new-patient form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewPatient {
    pub id: String,
    pub name: String,
    pub station: String,
    pub special_notes: String,
}

/// FFI-safe result of adding a patient.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiAddPatientOutcome {
    Added,
    ExistsInArchive { patient: FfiPatient },
}

#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiPatientField {
    Name,
    Station,
    SpecialNotes,
}

impl From<FfiPatientField> for PatientField {
    fn from(field: FfiPatientField) -> Self {
        match field {
            FfiPatientField::Name => PatientField::Name,
            FfiPatientField::Station => PatientField::Station,
            FfiPatientField::SpecialNotes => PatientField::SpecialNotes,
        }
    }
}

/// FFI-safe new-box form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewBox {
    pub box_id: String,
    pub cycle: String,
    pub pack_date: String,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiBoxField {
    BoxId,
    Cycle,
    PackDate,
    Notes,
}

impl From<FfiBoxField> for BoxField {
    fn from(field: FfiBoxField) -> Self {
        match field {
            FfiBoxField::BoxId => BoxField::BoxId,
            FfiBoxField::Cycle => BoxField::Cycle,
            FfiBoxField::PackDate => BoxField::PackDate,
            FfiBoxField::Notes => BoxField::Notes,
        }
    }
}

/// FFI-safe batch.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBatch {
    pub id: String,
    pub medication_code: String,
    pub medication_name: String,
    pub batch_id: String,
    pub expiry_date: String,
    pub status: String,
}

impl From<&Batch> for FfiBatch {
    fn from(batch: &Batch) -> Self {
        Self {
            id: batch.id.clone(),
            medication_code: batch.medication_code.clone(),
            medication_name: batch.medication_name.clone(),
            batch_id: batch.batch_id.clone(),
            expiry_date: format_display_date(batch.expiry_date),
            status: batch.status.label().to_string(),
        }
    }
}

/// FFI-safe new-batch form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewBatch {
    pub medication_code: String,
    pub medication_name: String,
    pub batch_id: String,
    pub expiry_date: String,
}

#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiBatchEdit {
    Code { value: String },
    Name { value: String },
    Expiry { value: String },
}

impl From<FfiBatchEdit> for BatchEdit {
    fn from(edit: FfiBatchEdit) -> Self {
        match edit {
            FfiBatchEdit::Code { value } => BatchEdit::Code(value),
            FfiBatchEdit::Name { value } => BatchEdit::Name(value),
            FfiBatchEdit::Expiry { value } => BatchEdit::Expiry(value),
        }
    }
}

/// FFI-safe regimen definition.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRegimen {
    pub id: String,
    pub code: String,
    pub meaning: String,
}

impl From<&RegimenDefinition> for FfiRegimen {
    fn from(regimen: &RegimenDefinition) -> Self {
        Self {
            id: regimen.id.clone(),
            code: regimen.code.clone(),
            meaning: regimen.meaning.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiRegimenField {
    Code,
    Meaning,
}

impl From<FfiRegimenField> for RegimenField {
    fn from(field: FfiRegimenField) -> Self {
        match field {
            FfiRegimenField::Code => RegimenField::Code,
            FfiRegimenField::Meaning => RegimenField::Meaning,
        }
    }
}

/// FFI-safe station or patient category.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNamedEntry {
    pub id: String,
    pub name: String,
}

/// FFI-safe medication search hit.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicationHit {
    pub patient_id: String,
    pub patient_name: String,
    pub category: FfiMedicationCategory,
    pub record: FfiMedicationRecord,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSearchResults {
    pub patients: Vec<FfiPatient>,
    pub medications: Vec<FfiMedicationHit>,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDashboard {
    pub active_patients: u32,
    pub archived_patients: u32,
    pub attention_batches: Vec<FfiBatch>,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiImportReport {
    pub added: u32,
    pub skipped: u32,
}

impl From<ImportReport> for FfiImportReport {
    fn from(report: ImportReport) -> Self {
        Self {
            added: report.added as u32,
            skipped: report.skipped as u32,
        }
    }
}

/// FFI-safe depo reminder.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReminder {
    pub patient_id: String,
    pub patient_name: String,
    pub station: String,
    pub record_id: String,
    pub medication_code: String,
    pub medication_name: String,
    pub due: String,
}

impl From<reminders::Reminder> for FfiReminder {
    fn from(reminder: reminders::Reminder) -> Self {
        Self {
            patient_id: reminder.patient_id,
            patient_name: reminder.patient_name,
            station: reminder.station,
            record_id: reminder.record_id,
            medication_code: reminder.medication_code,
            medication_name: reminder.medication_name,
            due: format_display_date(reminder.due),
        }
    }
}

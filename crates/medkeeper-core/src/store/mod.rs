//! In-memory record store with undo/redo.
//!
//! All entities live in a single [`StoreState`] snapshot. Every operation
//! that changes data goes through [`Store::mutate`], which applies the change
//! to a copy and, only if the operation succeeds, installs the copy and
//! pushes the replaced snapshot onto the history. A failed operation leaves
//! both the state and the history untouched.

mod batches;
mod lookups;
mod medications;
mod patients;
mod regimens;

pub use batches::*;
pub use medications::*;
pub use patients::*;
pub use regimens::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::history::History;
use crate::models::{
    Batch, Medication, PatientCategory, Patient, RegimenDefinition, Station,
};

/// Store errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("A patient with M.R. {0} already exists in the active list")]
    DuplicatePatient(String),

    #[error("A batch with ID {0} already exists")]
    DuplicateBatch(String),

    #[error("A {kind} named {name} already exists")]
    DuplicateName { kind: &'static str, name: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Everything the unit keeps, as one undoable snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreState {
    pub patients: Vec<Patient>,
    pub archived_patients: Vec<Patient>,
    /// Medication catalog used to auto-fill names and codes
    pub medications: Vec<Medication>,
    pub batches: Vec<Batch>,
    pub regimens: Vec<RegimenDefinition>,
    pub stations: Vec<Station>,
    pub patient_categories: Vec<PatientCategory>,
}

impl StoreState {
    pub(crate) fn patient_mut(&mut self, id: &str) -> StoreResult<&mut Patient> {
        self.patients
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("patient {}", id)))
    }

    pub(crate) fn batch_mut(&mut self, id: &str) -> StoreResult<&mut Batch> {
        self.batches
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("batch {}", id)))
    }

    /// Sort batches by expiry, soonest first.
    pub fn sort_batches_by_expiry(&mut self) {
        self.batches.sort_by_key(|b| b.expiry_date);
    }

    /// Recompute every cached batch status. Returns how many changed.
    pub fn refresh_batch_statuses(&mut self, today: NaiveDate, window_days: u32) -> usize {
        self.batches
            .iter_mut()
            .map(|b| b.refresh_status(today, window_days))
            .filter(|changed| *changed)
            .count()
    }
}

/// Station filter applied to the patient list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StationFilter {
    #[default]
    All,
    Station(String),
}

impl StationFilter {
    pub fn matches(&self, station: &str) -> bool {
        match self {
            StationFilter::All => true,
            StationFilter::Station(name) => name == station,
        }
    }
}

/// The record store: current state, history and view state.
#[derive(Debug, Clone)]
pub struct Store {
    state: StoreState,
    history: History<StoreState>,
    config: StoreConfig,
    /// Global search box; not part of the undo history
    search_term: String,
    station_filter: StationFilter,
}

impl Default for Store {
    fn default() -> Self {
        Self::with_state(StoreState::default())
    }
}

impl Store {
    /// Create a store over an initial state. Batches are ordered by expiry.
    pub fn new(mut state: StoreState, config: StoreConfig) -> Self {
        state.sort_batches_by_expiry();
        let station_filter = config
            .default_station_filter
            .clone()
            .map(StationFilter::Station)
            .unwrap_or_default();
        Self {
            state,
            history: History::new(config.history_limit),
            config,
            search_term: String::new(),
            station_filter,
        }
    }

    /// Create a store with default configuration.
    pub fn with_state(state: StoreState) -> Self {
        Self::new(state, StoreConfig::default())
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn into_state(self) -> StoreState {
        self.state
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Apply `f` to a copy of the state and commit it as one history entry.
    pub fn mutate<T, F>(&mut self, action: &str, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut StoreState) -> StoreResult<T>,
    {
        self.mutate_if_changed(action, |state| f(state).map(|value| (value, true)))
    }

    /// Like [`Store::mutate`], but `f` reports whether anything changed and
    /// unchanged results are not recorded.
    pub fn mutate_if_changed<T, F>(&mut self, action: &str, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut StoreState) -> StoreResult<(T, bool)>,
    {
        let mut next = self.state.clone();
        let (value, changed) = f(&mut next)?;
        if changed {
            let previous = std::mem::replace(&mut self.state, next);
            self.history.record(previous);
            debug!(action, undo_depth = self.history.undo_depth(), "recorded history entry");
        }
        Ok(value)
    }

    /// Revert the last change. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let current = std::mem::take(&mut self.state);
        match self.history.undo(current) {
            Ok(previous) => {
                self.state = previous;
                info!(
                    undo_depth = self.history.undo_depth(),
                    redo_depth = self.history.redo_depth(),
                    "undo"
                );
                true
            }
            Err(current) => {
                self.state = current;
                false
            }
        }
    }

    /// Re-apply the last undone change. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let current = std::mem::take(&mut self.state);
        match self.history.redo(current) {
            Ok(next) => {
                self.state = next;
                info!(
                    undo_depth = self.history.undo_depth(),
                    redo_depth = self.history.redo_depth(),
                    "redo"
                );
                true
            }
            Err(current) => {
                self.state = current;
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History<StoreState> {
        &self.history
    }

    // =========================================================================
    // View state
    // =========================================================================

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn station_filter(&self) -> &StationFilter {
        &self.station_filter
    }

    pub fn set_station_filter(&mut self, filter: StationFilter) {
        self.station_filter = filter;
    }

    /// Jump to the patient list filtered to one station.
    pub fn focus_station(&mut self, station: &str) {
        self.station_filter = StationFilter::Station(station.to_string());
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.state.patients.iter().find(|p| p.id == id)
    }

    pub fn archived_patient(&self, id: &str) -> Option<&Patient> {
        self.state.archived_patients.iter().find(|p| p.id == id)
    }

    pub fn batch(&self, id: &str) -> Option<&Batch> {
        self.state.batches.iter().find(|b| b.id == id)
    }
}

//! Global search, per-view listings and the dashboard summary.
//!
//! Everything here is a read-only view over a [`StoreState`]; nothing is
//! recorded in history.

mod suggest;
mod table;

pub use suggest::*;
pub use table::*;

use std::cmp::Ordering;

use serde::Serialize;

use crate::models::{Batch, BatchStatus, MedicationCategory, MedicationRecord, Patient};
use crate::store::StoreState;

/// A medication record found by the global search.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MedicationHit<'a> {
    pub patient_id: &'a str,
    pub patient_name: &'a str,
    /// The list the record lives in
    pub category: MedicationCategory,
    pub record: &'a MedicationRecord,
}

/// Results of the global search box.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SearchResults<'a> {
    pub patients: Vec<&'a Patient>,
    pub medications: Vec<MedicationHit<'a>>,
}

impl SearchResults<'_> {
    pub fn is_empty(&self) -> bool {
        self.patients.is_empty() && self.medications.is_empty()
    }
}

/// Search active patients by name or M.R., and their medication records by
/// name or code. Case-insensitive substring match; an empty term finds nothing.
pub fn search<'a>(state: &'a StoreState, term: &str) -> SearchResults<'a> {
    if term.is_empty() {
        return SearchResults::default();
    }
    let term = term.to_lowercase();

    let patients = state
        .patients
        .iter()
        .filter(|p| contains(&p.name, &term) || contains(&p.id, &term))
        .collect();

    let medications = state
        .patients
        .iter()
        .flat_map(|patient| {
            patient
                .all_medications()
                .map(move |(category, record)| MedicationHit {
                    patient_id: &patient.id,
                    patient_name: &patient.name,
                    category,
                    record,
                })
        })
        .filter(|hit| {
            contains(&hit.record.medication_name, &term) || contains(&hit.record.medication_code, &term)
        })
        .collect();

    SearchResults {
        patients,
        medications,
    }
}

/// Case-insensitive substring test against an already lower-cased needle.
pub(crate) fn contains(haystack: &str, lower_needle: &str) -> bool {
    haystack.to_lowercase().contains(lower_needle)
}

/// Name order for listings: case-insensitive, ties broken by the exact text.
pub(crate) fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

// =========================================================================
// Dashboard
// =========================================================================

/// Figures shown on the dashboard.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardSummary<'a> {
    pub active_patients: usize,
    pub archived_patients: usize,
    /// Batches that are expired or expiring soon, soonest first
    pub attention_batches: Vec<&'a Batch>,
}

impl DashboardSummary<'_> {
    pub fn expired_count(&self) -> usize {
        self.attention_batches
            .iter()
            .filter(|b| b.status == BatchStatus::Expired)
            .count()
    }
}

pub fn dashboard(state: &StoreState) -> DashboardSummary<'_> {
    let mut attention_batches: Vec<&Batch> = state
        .batches
        .iter()
        .filter(|b| b.status != BatchStatus::Valid)
        .collect();
    attention_batches.sort_by_key(|b| b.expiry_date);

    DashboardSummary {
        active_patients: state.patients.len(),
        archived_patients: state.archived_patients.len(),
        attention_batches,
    }
}

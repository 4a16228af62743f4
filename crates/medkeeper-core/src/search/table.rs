//! Sortable, filterable listings for each table page.

use std::cmp::Ordering;

use super::{compare_names, contains};
use crate::models::{Batch, Patient, PatientCategory, RegimenDefinition, Station};
use crate::store::{StationFilter, StoreState};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// A clicked column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig<K> {
    pub key: K,
    pub direction: SortDirection,
}

impl<K: Copy + PartialEq> SortConfig<K> {
    pub fn ascending(key: K) -> Self {
        Self {
            key,
            direction: SortDirection::Ascending,
        }
    }

    /// Clicking the ascending column again flips it; anything else sorts
    /// ascending by `key`.
    pub fn toggle(current: Option<Self>, key: K) -> Self {
        match current {
            Some(c) if c.key == key && c.direction == SortDirection::Ascending => Self {
                key,
                direction: SortDirection::Descending,
            },
            _ => Self::ascending(key),
        }
    }

    fn apply(&self, ordering: Ordering) -> Ordering {
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientSortKey {
    Id,
    Name,
    Station,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchSortKey {
    Code,
    Name,
    BatchId,
    Expiry,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegimenSortKey {
    Code,
    Meaning,
}

/// The patient list: optional column sort, then the station filter.
pub fn list_patients<'a>(
    state: &'a StoreState,
    sort: Option<SortConfig<PatientSortKey>>,
    filter: &StationFilter,
) -> Vec<&'a Patient> {
    let mut rows: Vec<&Patient> = state
        .patients
        .iter()
        .filter(|p| filter.matches(&p.station))
        .collect();
    if let Some(sort) = sort {
        rows.sort_by(|a, b| {
            let ordering = match sort.key {
                PatientSortKey::Id => a.id.cmp(&b.id),
                PatientSortKey::Name => compare_names(&a.name, &b.name),
                PatientSortKey::Station => compare_names(&a.station, &b.station),
            };
            sort.apply(ordering)
        });
    }
    rows
}

/// The batch monitor. Defaults to soonest expiry first.
pub fn list_batches<'a>(
    state: &'a StoreState,
    term: &str,
    sort: Option<SortConfig<BatchSortKey>>,
) -> Vec<&'a Batch> {
    let term = term.to_lowercase();
    let mut rows: Vec<&Batch> = state
        .batches
        .iter()
        .filter(|b| {
            contains(&b.medication_name, &term)
                || contains(&b.medication_code, &term)
                || contains(&b.batch_id, &term)
        })
        .collect();
    let sort = sort.unwrap_or(SortConfig::ascending(BatchSortKey::Expiry));
    rows.sort_by(|a, b| {
        let ordering = match sort.key {
            BatchSortKey::Code => a.medication_code.cmp(&b.medication_code),
            BatchSortKey::Name => a.medication_name.cmp(&b.medication_name),
            BatchSortKey::BatchId => a.batch_id.cmp(&b.batch_id),
            BatchSortKey::Expiry => a.expiry_date.cmp(&b.expiry_date),
            BatchSortKey::Status => a.status.label().cmp(b.status.label()),
        };
        sort.apply(ordering)
    });
    rows
}

pub fn list_regimens<'a>(
    state: &'a StoreState,
    term: &str,
    sort: Option<SortConfig<RegimenSortKey>>,
) -> Vec<&'a RegimenDefinition> {
    let term = term.to_lowercase();
    let mut rows: Vec<&RegimenDefinition> = state
        .regimens
        .iter()
        .filter(|r| contains(&r.code, &term) || contains(&r.meaning, &term))
        .collect();
    if let Some(sort) = sort {
        rows.sort_by(|a, b| {
            let ordering = match sort.key {
                RegimenSortKey::Code => a.code.cmp(&b.code),
                RegimenSortKey::Meaning => a.meaning.cmp(&b.meaning),
            };
            sort.apply(ordering)
        });
    }
    rows
}

pub fn list_stations<'a>(state: &'a StoreState, term: &str) -> Vec<&'a Station> {
    let term = term.to_lowercase();
    let mut rows: Vec<&Station> = state
        .stations
        .iter()
        .filter(|s| contains(&s.name, &term))
        .collect();
    rows.sort_by(|a, b| compare_names(&a.name, &b.name));
    rows
}

pub fn list_categories<'a>(state: &'a StoreState, term: &str) -> Vec<&'a PatientCategory> {
    let term = term.to_lowercase();
    let mut rows: Vec<&PatientCategory> = state
        .patient_categories
        .iter()
        .filter(|c| contains(&c.name, &term))
        .collect();
    rows.sort_by(|a, b| compare_names(&a.name, &b.name));
    rows
}

pub fn list_archives<'a>(state: &'a StoreState, term: &str) -> Vec<&'a Patient> {
    let term = term.to_lowercase();
    let mut rows: Vec<&Patient> = state
        .archived_patients
        .iter()
        .filter(|p| contains(&p.name, &term) || contains(&p.id, &term))
        .collect();
    rows.sort_by(|a, b| compare_names(&a.name, &b.name));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn state() -> StoreState {
        let today = day(2025, 6, 1);
        let mut state = StoreState::default();
        for (id, name, station) in [("3", "Cara", "V1"), ("1", "Bob", "V2"), ("2", "Ann", "V1")] {
            state
                .patients
                .push(Patient::new(id.into(), name.into(), station.into(), String::new()));
        }
        state.batches = vec![
            Batch::new("MET500", "Metformin".into(), "MF-2".into(), day(2026, 3, 1), today, 30),
            Batch::new("ASP81", "Aspirin".into(), "AS-1".into(), day(2025, 9, 1), today, 30),
            Batch::new("MET500", "Metformin".into(), "MF-1".into(), day(2025, 7, 1), today, 30),
        ];
        state.regimens = vec![
            RegimenDefinition::new("BID", "twice daily".into()),
            RegimenDefinition::new("1+0+0", "morning".into()),
        ];
        state
    }

    #[test]
    fn test_toggle_flips_direction() {
        let first = SortConfig::toggle(None, PatientSortKey::Name);
        assert_eq!(first.direction, SortDirection::Ascending);
        let second = SortConfig::toggle(Some(first), PatientSortKey::Name);
        assert_eq!(second.direction, SortDirection::Descending);
        let third = SortConfig::toggle(Some(second), PatientSortKey::Name);
        assert_eq!(third.direction, SortDirection::Ascending);
        let other = SortConfig::toggle(Some(second), PatientSortKey::Id);
        assert_eq!(other, SortConfig::ascending(PatientSortKey::Id));
    }

    #[test]
    fn test_patients_unsorted_by_default_and_filtered() {
        let state = state();
        let all: Vec<_> = list_patients(&state, None, &StationFilter::All)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(all, vec!["3", "1", "2"]);

        let v1: Vec<_> = list_patients(
            &state,
            Some(SortConfig::ascending(PatientSortKey::Name)),
            &StationFilter::Station("V1".into()),
        )
        .iter()
        .map(|p| p.name.as_str())
        .collect();
        assert_eq!(v1, vec!["Ann", "Cara"]);
    }

    #[test]
    fn test_patients_descending() {
        let state = state();
        let sort = SortConfig {
            key: PatientSortKey::Id,
            direction: SortDirection::Descending,
        };
        let ids: Vec<_> = list_patients(&state, Some(sort), &StationFilter::All)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
    }

    #[test]
    fn test_batches_default_to_expiry_order() {
        let state = state();
        let ids: Vec<_> = list_batches(&state, "", None)
            .iter()
            .map(|b| b.batch_id.as_str())
            .collect();
        assert_eq!(ids, vec!["MF-1", "AS-1", "MF-2"]);
    }

    #[test]
    fn test_batch_term_matches_code_name_or_lot() {
        let state = state();
        assert_eq!(list_batches(&state, "metf", None).len(), 2);
        assert_eq!(list_batches(&state, "asp8", None).len(), 1);
        assert_eq!(list_batches(&state, "mf-2", None).len(), 1);
    }

    #[test]
    fn test_regimens_filter_and_sort() {
        let state = state();
        assert_eq!(list_regimens(&state, "TWICE", None).len(), 1);
        let codes: Vec<_> = list_regimens(&state, "", Some(SortConfig::ascending(RegimenSortKey::Code)))
            .iter()
            .map(|r| r.code.as_str())
            .collect();
        assert_eq!(codes, vec!["1+0+0", "BID"]);
    }

    #[test]
    fn test_patients_sorted_by_station() {
        let mut state = state();
        state
            .patients
            .push(Patient::new("4".into(), "Dee".into(), "icu".into(), String::new()));
        let sort = SortConfig::ascending(PatientSortKey::Station);
        let stations: Vec<_> = list_patients(&state, Some(sort), &StationFilter::All)
            .iter()
            .map(|p| p.station.as_str())
            .collect();
        assert_eq!(stations, vec!["icu", "V1", "V1", "V2"]);

        let sort = SortConfig::toggle(Some(sort), PatientSortKey::Station);
        let first = list_patients(&state, Some(sort), &StationFilter::All)[0];
        assert_eq!(first.station, "V2");
    }

    #[test]
    fn test_stations_sorted_ignoring_case() {
        let mut state = StoreState::default();
        for name in ["ward B", "ICU", "Ward A", "annex"] {
            state.stations.push(Station::new(name.into()));
        }
        let names: Vec<_> = list_stations(&state, "")
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["annex", "ICU", "Ward A", "ward B"]);
        assert_eq!(list_stations(&state, "WARD").len(), 2);
    }

    #[test]
    fn test_archives_sorted_by_name() {
        let mut state = state();
        state.archived_patients = std::mem::take(&mut state.patients);
        let names: Vec<_> = list_archives(&state, "")
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Ann", "Bob", "Cara"]);
        assert_eq!(list_archives(&state, "3").len(), 1);
    }
}

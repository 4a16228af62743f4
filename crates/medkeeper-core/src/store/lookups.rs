//! Station and patient-category dictionaries.
//!
//! Patients refer to stations by name and to categories by id. Renaming a
//! station or deleting a category does not touch patient rows.

use super::{Store, StoreError, StoreResult};
use crate::models::{PatientCategory, Station};
use crate::search::compare_names;

impl Store {
    // =========================================================================
    // Stations
    // =========================================================================

    pub fn add_station(&mut self, name: &str) -> StoreResult<String> {
        let name = validate_name("station", name, self.state.stations.iter().map(|s| s.name.as_str()))?;
        let station = Station::new(name);
        let id = station.id.clone();
        self.mutate("add station", |state| {
            state.stations.push(station);
            state.stations.sort_by(|a, b| compare_names(&a.name, &b.name));
            Ok(())
        })?;
        Ok(id)
    }

    pub fn rename_station(&mut self, id: &str, name: &str) -> StoreResult<()> {
        let others = self
            .state
            .stations
            .iter()
            .filter(|s| s.id != id)
            .map(|s| s.name.as_str());
        let name = validate_name("station", name, others)?;
        self.mutate("rename station", |state| {
            let station = state
                .stations
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| StoreError::NotFound(format!("station {}", id)))?;
            station.name = name;
            Ok(())
        })
    }

    pub fn delete_station(&mut self, id: &str) -> StoreResult<()> {
        self.mutate("delete station", |state| {
            let before = state.stations.len();
            state.stations.retain(|s| s.id != id);
            if state.stations.len() == before {
                return Err(StoreError::NotFound(format!("station {}", id)));
            }
            Ok(())
        })
    }

    // =========================================================================
    // Patient categories
    // =========================================================================

    pub fn add_category(&mut self, name: &str) -> StoreResult<String> {
        let name = validate_name(
            "category",
            name,
            self.state.patient_categories.iter().map(|c| c.name.as_str()),
        )?;
        let category = PatientCategory::new(name);
        let id = category.id.clone();
        self.mutate("add category", |state| {
            state.patient_categories.push(category);
            state.patient_categories.sort_by(|a, b| compare_names(&a.name, &b.name));
            Ok(())
        })?;
        Ok(id)
    }

    pub fn rename_category(&mut self, id: &str, name: &str) -> StoreResult<()> {
        let others = self
            .state
            .patient_categories
            .iter()
            .filter(|c| c.id != id)
            .map(|c| c.name.as_str());
        let name = validate_name("category", name, others)?;
        self.mutate("rename category", |state| {
            let category = state
                .patient_categories
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| StoreError::NotFound(format!("category {}", id)))?;
            category.name = name;
            Ok(())
        })
    }

    /// Delete a category. Patients keep the stale id.
    pub fn delete_category(&mut self, id: &str) -> StoreResult<()> {
        self.mutate("delete category", |state| {
            let before = state.patient_categories.len();
            state.patient_categories.retain(|c| c.id != id);
            if state.patient_categories.len() == before {
                return Err(StoreError::NotFound(format!("category {}", id)));
            }
            Ok(())
        })
    }
}

/// Trim `name` and reject blanks and case-insensitive duplicates.
fn validate_name<'a>(
    kind: &'static str,
    name: &str,
    existing: impl IntoIterator<Item = &'a str>,
) -> StoreResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::MissingField("name"));
    }
    let lower = name.to_lowercase();
    if existing.into_iter().any(|n| n.to_lowercase() == lower) {
        return Err(StoreError::DuplicateName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stations_sorted_after_add() {
        let mut store = Store::default();
        store.add_station("Ward B").unwrap();
        store.add_station("Ward A").unwrap();
        let names: Vec<_> = store.state().stations.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Ward A", "Ward B"]);
    }

    #[test]
    fn test_duplicate_station_name_rejected() {
        let mut store = Store::default();
        store.add_station("ICU").unwrap();
        let err = store.add_station(" icu ").unwrap_err();
        assert_eq!(
            err,
            StoreError::DuplicateName {
                kind: "station",
                name: "icu".into()
            }
        );
        assert_eq!(store.add_station(""), Err(StoreError::MissingField("name")));
    }

    #[test]
    fn test_rename_station_to_own_name_in_other_case() {
        let mut store = Store::default();
        let id = store.add_station("icu").unwrap();
        store.add_station("Ward A").unwrap();
        store.rename_station(&id, "ICU").unwrap();
        assert!(store.rename_station(&id, "ward a").is_err());
        assert_eq!(store.rename_station(&id, "  "), Err(StoreError::MissingField("name")));
        assert_eq!(store.state().stations.iter().find(|s| s.id == id).unwrap().name, "ICU");
    }

    #[test]
    fn test_delete_category_leaves_patient_ids() {
        use crate::store::NewPatient;

        let mut store = Store::default();
        let cat = store.add_category("Day Care").unwrap();
        store
            .add_patient(NewPatient {
                id: "1001".into(),
                name: "Zed".into(),
                ..NewPatient::default()
            })
            .unwrap();
        store.set_patient_category("1001", &cat, true).unwrap();
        store.delete_category(&cat).unwrap();

        assert!(store.state().patient_categories.is_empty());
        assert!(store.patient("1001").unwrap().has_category(&cat));
    }

    #[test]
    fn test_rename_and_delete_missing() {
        let mut store = Store::default();
        assert!(matches!(
            store.rename_category("CAT-x", "Other"),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.delete_station("STA-x"), Err(StoreError::NotFound(_))));
    }
}

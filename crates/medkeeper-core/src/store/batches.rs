//! Batch (lot) management.

use chrono::NaiveDate;
use tracing::{info, warn};

use super::{Store, StoreError, StoreResult};
use crate::models::{parse_display_date, Batch};

/// Form input for a new batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewBatch {
    pub medication_code: String,
    /// Filled from the catalog when empty
    pub medication_name: String,
    pub batch_id: String,
    /// `dd/MM/yyyy`
    pub expiry_date: String,
}

/// A single cell edit on a batch row.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEdit {
    Code(String),
    Name(String),
    /// `dd/MM/yyyy`; status is recomputed
    Expiry(String),
}

impl Store {
    /// Add a batch. Returns the new row id.
    pub fn add_batch(&mut self, new: NewBatch, today: NaiveDate) -> StoreResult<String> {
        if new.medication_code.trim().is_empty() {
            return Err(StoreError::MissingField("medication code"));
        }
        let batch_id = new.batch_id.trim().to_string();
        if batch_id.is_empty() {
            return Err(StoreError::MissingField("batch ID"));
        }
        let expiry = parse_display_date(&new.expiry_date).ok_or_else(|| {
            StoreError::InvalidInput(format!("expiry date '{}' is not dd/MM/yyyy", new.expiry_date))
        })?;
        if self.state.batches.iter().any(|b| b.batch_id == batch_id) {
            return Err(StoreError::DuplicateBatch(batch_id));
        }

        let name = if new.medication_name.trim().is_empty() {
            self.medication_name_for_code(&new.medication_code)
                .unwrap_or_default()
        } else {
            new.medication_name
        };
        let window = self.config.expiring_soon_days;
        let batch = Batch::new(&new.medication_code, name, batch_id, expiry, today, window);
        let id = batch.id.clone();

        self.mutate("add batch", |state| {
            state.batches.push(batch);
            state.sort_batches_by_expiry();
            Ok(())
        })?;
        info!(id = %id, "added batch");
        Ok(id)
    }

    /// Apply a cell edit to a batch. An expiry that does not parse is rejected.
    pub fn update_batch(&mut self, id: &str, edit: BatchEdit, today: NaiveDate) -> StoreResult<()> {
        let window = self.config.expiring_soon_days;
        let catalog_name = match &edit {
            BatchEdit::Code(code) => self.medication_name_for_code(code),
            _ => None,
        };
        self.mutate("update batch", |state| {
            let batch = state.batch_mut(id)?;
            match edit {
                BatchEdit::Code(code) => {
                    batch.medication_code = code.to_uppercase();
                    if let Some(name) = catalog_name {
                        batch.medication_name = name;
                    }
                }
                BatchEdit::Name(name) => batch.medication_name = name,
                BatchEdit::Expiry(text) => {
                    let expiry = parse_display_date(&text).ok_or_else(|| {
                        StoreError::InvalidInput(format!("expiry date '{}' is not dd/MM/yyyy", text))
                    })?;
                    batch.expiry_date = expiry;
                    batch.refresh_status(today, window);
                    state.sort_batches_by_expiry();
                }
            }
            Ok(())
        })
    }

    pub fn remove_batch(&mut self, id: &str) -> StoreResult<()> {
        self.mutate("remove batch", |state| {
            let before = state.batches.len();
            state.batches.retain(|b| b.id != id);
            if state.batches.len() == before {
                return Err(StoreError::NotFound(format!("batch {}", id)));
            }
            Ok(())
        })
    }

    /// Recompute every cached status for `today`. Returns how many changed;
    /// nothing is recorded when none did.
    pub fn refresh_batch_statuses(&mut self, today: NaiveDate) -> StoreResult<usize> {
        let window = self.config.expiring_soon_days;
        let changed = self.mutate_if_changed("refresh batch statuses", |state| {
            let changed = state.refresh_batch_statuses(today, window);
            Ok((changed, changed > 0))
        })?;
        if changed > 0 {
            warn!(changed, "batch statuses changed since last refresh");
        }
        Ok(changed)
    }

    /// Catalog name for a code, falling back to any batch with that code.
    pub fn medication_name_for_code(&self, code: &str) -> Option<String> {
        self.find_medication_by_code(code)
            .map(|m| m.name.clone())
            .or_else(|| {
                self.state
                    .batches
                    .iter()
                    .find(|b| b.matches_code(code))
                    .map(|b| b.medication_name.clone())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BatchStatus, Medication};
    use crate::store::StoreState;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        day(2025, 6, 1)
    }

    fn store() -> Store {
        let mut state = StoreState::default();
        state.medications.push(Medication::new("ASP81", "Aspirin 81mg"));
        Store::with_state(state)
    }

    fn new_batch(code: &str, batch_id: &str, expiry: &str) -> NewBatch {
        NewBatch {
            medication_code: code.into(),
            medication_name: String::new(),
            batch_id: batch_id.into(),
            expiry_date: expiry.into(),
        }
    }

    #[test]
    fn test_add_batch_fills_name_and_status() {
        let mut store = store();
        let id = store
            .add_batch(new_batch("asp81", "AS-1", "15/06/2025"), today())
            .unwrap();
        let batch = store.batch(&id).unwrap();
        assert_eq!(batch.medication_code, "ASP81");
        assert_eq!(batch.medication_name, "Aspirin 81mg");
        assert_eq!(batch.status, BatchStatus::ExpiringSoon);
    }

    #[test]
    fn test_batches_stay_sorted_by_expiry() {
        let mut store = store();
        store.add_batch(new_batch("ASP81", "LATE", "01/01/2027"), today()).unwrap();
        let early = store.add_batch(new_batch("ASP81", "EARLY", "01/01/2026"), today()).unwrap();
        assert_eq!(store.state().batches[0].id, early);

        store
            .update_batch(&early, BatchEdit::Expiry("01/01/2028".into()), today())
            .unwrap();
        assert_eq!(store.state().batches[1].id, early);
    }

    #[test]
    fn test_duplicate_batch_id_rejected() {
        let mut store = store();
        store.add_batch(new_batch("ASP81", "AS-1", "01/01/2026"), today()).unwrap();
        let err = store
            .add_batch(new_batch("ASP81", "AS-1", "01/02/2026"), today())
            .unwrap_err();
        assert_eq!(err, StoreError::DuplicateBatch("AS-1".into()));
        assert_eq!(store.history().undo_depth(), 1);
    }

    #[test]
    fn test_add_batch_validation() {
        let mut store = store();
        assert_eq!(
            store.add_batch(new_batch("ASP81", " ", "01/01/2026"), today()),
            Err(StoreError::MissingField("batch ID"))
        );
        assert!(matches!(
            store.add_batch(new_batch("ASP81", "AS-2", "2026-01-01"), today()),
            Err(StoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_invalid_expiry_edit_rejected() {
        let mut store = store();
        let id = store.add_batch(new_batch("ASP81", "AS-1", "01/01/2026"), today()).unwrap();
        let err = store
            .update_batch(&id, BatchEdit::Expiry("31/02/2026".into()), today())
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));
        assert_eq!(store.batch(&id).unwrap().expiry_date, day(2026, 1, 1));
    }

    #[test]
    fn test_expiry_edit_recomputes_status() {
        let mut store = store();
        let id = store.add_batch(new_batch("ASP81", "AS-1", "01/01/2026"), today()).unwrap();
        store
            .update_batch(&id, BatchEdit::Expiry("31/05/2025".into()), today())
            .unwrap();
        assert_eq!(store.batch(&id).unwrap().status, BatchStatus::Expired);
    }

    #[test]
    fn test_refresh_statuses_as_days_pass() {
        let mut store = store();
        store.add_batch(new_batch("ASP81", "AS-1", "01/08/2025"), today()).unwrap();
        let depth = store.history().undo_depth();

        assert_eq!(store.refresh_batch_statuses(today()).unwrap(), 0);
        assert_eq!(store.history().undo_depth(), depth);

        assert_eq!(store.refresh_batch_statuses(day(2025, 7, 15)).unwrap(), 1);
        assert_eq!(store.state().batches[0].status, BatchStatus::ExpiringSoon);
    }

    #[test]
    fn test_remove_batch() {
        let mut store = store();
        let id = store.add_batch(new_batch("ASP81", "AS-1", "01/01/2026"), today()).unwrap();
        store.remove_batch(&id).unwrap();
        assert!(store.batch(&id).is_none());
        assert!(matches!(store.remove_batch(&id), Err(StoreError::NotFound(_))));
    }
}

//! Regimen dictionary. A code may carry several meanings, one row each.

use super::{Store, StoreError, StoreResult};
use crate::models::RegimenDefinition;

/// Inline-editable regimen columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegimenField {
    Code,
    Meaning,
}

impl Store {
    /// Add a regimen definition. Returns its id.
    pub fn add_regimen(&mut self, code: &str, meaning: &str) -> StoreResult<String> {
        let code = code.trim();
        if code.is_empty() {
            return Err(StoreError::MissingField("code"));
        }
        let regimen = RegimenDefinition::new(code, meaning.trim().to_string());
        let id = regimen.id.clone();
        self.mutate("add regimen", |state| {
            state.regimens.push(regimen);
            Ok(())
        })?;
        Ok(id)
    }

    pub fn update_regimen(&mut self, id: &str, field: RegimenField, value: &str) -> StoreResult<()> {
        if field == RegimenField::Code && value.trim().is_empty() {
            return Err(StoreError::MissingField("code"));
        }
        self.mutate("update regimen", |state| {
            let regimen = state
                .regimens
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| StoreError::NotFound(format!("regimen {}", id)))?;
            match field {
                RegimenField::Code => regimen.code = value.trim().to_uppercase(),
                RegimenField::Meaning => regimen.meaning = value.to_string(),
            }
            Ok(())
        })
    }

    /// Delete a definition. Records already using the code keep their text.
    pub fn delete_regimen(&mut self, id: &str) -> StoreResult<()> {
        self.mutate("delete regimen", |state| {
            let before = state.regimens.len();
            state.regimens.retain(|r| r.id != id);
            if state.regimens.len() == before {
                return Err(StoreError::NotFound(format!("regimen {}", id)));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_may_repeat() {
        let mut store = Store::default();
        store.add_regimen("1+0+0", "tablet in the morning").unwrap();
        store.add_regimen("1+0+0", "capsule in the morning").unwrap();
        assert_eq!(store.regimen_meanings("1+0+0").len(), 2);
    }

    #[test]
    fn test_add_requires_code() {
        let mut store = Store::default();
        assert_eq!(
            store.add_regimen("  ", "whenever"),
            Err(StoreError::MissingField("code"))
        );
        assert!(!store.can_undo());
    }

    #[test]
    fn test_update_uppercases_code() {
        let mut store = Store::default();
        let id = store.add_regimen("bid", "twice daily").unwrap();
        store.update_regimen(&id, RegimenField::Code, "tid").unwrap();
        store
            .update_regimen(&id, RegimenField::Meaning, "three times daily")
            .unwrap();
        let regimen = &store.state().regimens[0];
        assert_eq!(regimen.code, "TID");
        assert_eq!(regimen.meaning, "three times daily");
    }

    #[test]
    fn test_update_rejects_blank_code() {
        let mut store = Store::default();
        let id = store.add_regimen("bid", "twice daily").unwrap();
        assert_eq!(
            store.update_regimen(&id, RegimenField::Code, " "),
            Err(StoreError::MissingField("code"))
        );
        store.update_regimen(&id, RegimenField::Meaning, "").unwrap();
        assert_eq!(store.state().regimens[0].code, "BID");
        assert_eq!(store.history().undo_depth(), 2);
    }

    #[test]
    fn test_delete_regimen() {
        let mut store = Store::default();
        let id = store.add_regimen("PRN", "as needed").unwrap();
        store.delete_regimen(&id).unwrap();
        assert!(store.state().regimens.is_empty());
        assert!(store.undo());
        assert_eq!(store.state().regimens.len(), 1);
    }
}

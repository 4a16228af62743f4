//! Medication-record operations on the patient detail page, plus the
//! medication catalog.
//!
//! Records reference catalog entries, batches and regimen definitions by
//! code only. Editing a code or name re-resolves the other fields from
//! those lookups; nothing is enforced beyond that.

use chrono::NaiveDate;
use tracing::{debug, info};

use super::{Store, StoreError, StoreResult};
use crate::models::{
    Batch, FrequencyUnit, Medication, MedicationCategory, MedicationRecord, RegimenDefinition,
    NO_BATCH,
};

/// A single cell edit on a medication record.
#[derive(Debug, Clone, PartialEq)]
pub enum MedicationEdit {
    /// Re-resolves name, batch and expiry
    Code(String),
    /// Re-resolves code, batch and expiry when the name is in the catalog
    Name(String),
    Dose(String),
    /// Regimen code; the meaning is reset to the first known meaning
    Regimen(String),
    RegimenMeaning(String),
    Notes(String),
    BatchId(String),
    Notify(bool),
    NotificationStart(Option<NaiveDate>),
    FrequencyValue(Option<u32>),
    FrequencyUnit(FrequencyUnit),
}

impl MedicationEdit {
    fn is_schedule_edit(&self) -> bool {
        matches!(
            self,
            MedicationEdit::Notify(_)
                | MedicationEdit::NotificationStart(_)
                | MedicationEdit::FrequencyValue(_)
                | MedicationEdit::FrequencyUnit(_)
        )
    }
}

/// What an edit did beyond changing the cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordUpdate {
    /// The new code already appears elsewhere in the same list
    pub duplicate_code: bool,
}

impl Store {
    /// Prepend a blank record to one of a patient's lists. Returns its id.
    pub fn add_medication_row(
        &mut self,
        patient_id: &str,
        category: MedicationCategory,
    ) -> StoreResult<String> {
        let record = MedicationRecord::blank(category);
        let record_id = record.id.clone();
        self.mutate("add medication row", |state| {
            state
                .patient_mut(patient_id)?
                .medications
                .get_mut(category)
                .insert(0, record);
            Ok(())
        })?;
        Ok(record_id)
    }

    /// Remove a record from a patient's list.
    pub fn remove_medication_row(
        &mut self,
        patient_id: &str,
        category: MedicationCategory,
        record_id: &str,
    ) -> StoreResult<()> {
        self.mutate("remove medication row", |state| {
            let list = state.patient_mut(patient_id)?.medications.get_mut(category);
            let before = list.len();
            list.retain(|r| r.id != record_id);
            if list.len() == before {
                return Err(StoreError::NotFound(format!("medication record {}", record_id)));
            }
            Ok(())
        })
    }

    /// Apply a cell edit to a medication record.
    pub fn update_medication_record(
        &mut self,
        patient_id: &str,
        category: MedicationCategory,
        record_id: &str,
        edit: MedicationEdit,
        today: NaiveDate,
    ) -> StoreResult<RecordUpdate> {
        if edit.is_schedule_edit() && category != MedicationCategory::Depo {
            return Err(StoreError::InvalidInput(
                "reminder schedules only apply to depo records".into(),
            ));
        }

        let update = self.mutate("update medication record", |state| {
            let index = state
                .patients
                .iter()
                .position(|p| p.id == patient_id)
                .ok_or_else(|| StoreError::NotFound(format!("patient {}", patient_id)))?;
            let lookups = Lookups {
                catalog: &state.medications,
                batches: &state.batches,
                regimens: &state.regimens,
                today,
            };
            let list = state.patients[index].medications.get_mut(category);
            let record = list
                .iter_mut()
                .find(|r| r.id == record_id)
                .ok_or_else(|| StoreError::NotFound(format!("medication record {}", record_id)))?;

            let code_changed = matches!(edit, MedicationEdit::Code(_));
            lookups.apply(record, edit);

            let mut update = RecordUpdate::default();
            if code_changed {
                let code = record.medication_code.clone();
                update.duplicate_code = reorder_after_code_change(list, record_id, &code);
            }
            Ok(update)
        })?;

        if update.duplicate_code {
            info!(patient_id, %category, "medication now appears more than once in the list");
        }
        Ok(update)
    }

    /// Every meaning recorded for a regimen code (case-insensitive).
    pub fn regimen_meanings(&self, code: &str) -> Vec<&str> {
        self.state
            .regimens
            .iter()
            .filter(|r| r.matches_code(code))
            .map(|r| r.meaning.as_str())
            .collect()
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Add a catalog entry, or rename the entry with the same code.
    pub fn upsert_medication(&mut self, medication: Medication) -> StoreResult<()> {
        if medication.code.trim().is_empty() {
            return Err(StoreError::MissingField("code"));
        }
        self.mutate("upsert medication", |state| {
            match state
                .medications
                .iter_mut()
                .find(|m| m.code.eq_ignore_ascii_case(&medication.code))
            {
                Some(existing) => existing.name = medication.name,
                None => state.medications.push(medication),
            }
            Ok(())
        })
    }

    pub fn find_medication_by_code(&self, code: &str) -> Option<&Medication> {
        find_by_code(&self.state.medications, code)
    }

    pub fn find_medication_by_name(&self, name: &str) -> Option<&Medication> {
        find_by_name(&self.state.medications, name)
    }
}

/// Read-only views used while a record is being edited.
struct Lookups<'a> {
    catalog: &'a [Medication],
    batches: &'a [Batch],
    regimens: &'a [RegimenDefinition],
    today: NaiveDate,
}

impl Lookups<'_> {
    fn apply(&self, record: &mut MedicationRecord, edit: MedicationEdit) {
        match edit {
            MedicationEdit::Code(code) => {
                record.medication_code = code.to_uppercase();
                if let Some(medication) = find_by_code(self.catalog, &code) {
                    record.medication_name = medication.name.clone();
                }
                self.assign_batch(record, &code);
            }
            MedicationEdit::Name(name) => {
                let matched = find_by_name(self.catalog, &name);
                record.medication_name = name;
                if let Some(medication) = matched {
                    if record.medication_code != medication.code {
                        record.medication_code = medication.code.clone();
                        self.assign_batch(record, &medication.code);
                    }
                }
            }
            MedicationEdit::Dose(dose) => record.dose = dose,
            MedicationEdit::Regimen(code) => {
                record.regimen = code.to_uppercase();
                record.regimen_meaning = Some(
                    self.regimens
                        .iter()
                        .find(|r| r.matches_code(&code))
                        .map(|r| r.meaning.clone())
                        .unwrap_or_default(),
                );
            }
            MedicationEdit::RegimenMeaning(meaning) => record.regimen_meaning = Some(meaning),
            MedicationEdit::Notes(notes) => record.notes = notes,
            MedicationEdit::BatchId(batch_id) => record.batch_id = batch_id,
            MedicationEdit::Notify(notify) => {
                record.schedule.get_or_insert_with(Default::default).notify = notify
            }
            MedicationEdit::NotificationStart(start) => {
                record.schedule.get_or_insert_with(Default::default).start_date = start
            }
            MedicationEdit::FrequencyValue(value) => {
                record.schedule.get_or_insert_with(Default::default).frequency_value = value
            }
            MedicationEdit::FrequencyUnit(unit) => {
                record.schedule.get_or_insert_with(Default::default).frequency_unit = unit
            }
        }
    }

    /// Point the record at the earliest-expiring dispensable batch of `code`.
    fn assign_batch(&self, record: &mut MedicationRecord, code: &str) {
        match pick_batch(self.batches, code, self.today) {
            Some(batch) => {
                debug!(code, batch_id = %batch.batch_id, "assigned batch");
                record.batch_id = batch.batch_id.clone();
                record.expiry_date = Some(batch.expiry_date);
            }
            None => {
                record.batch_id = NO_BATCH.to_string();
                record.expiry_date = None;
            }
        }
    }
}

/// The dispensable batch of `code` that expires first.
pub fn pick_batch<'a>(batches: &'a [Batch], code: &str, today: NaiveDate) -> Option<&'a Batch> {
    batches
        .iter()
        .filter(|b| b.matches_code(code) && b.is_dispensable(today))
        .min_by_key(|b| b.expiry_date)
}

fn find_by_code<'a>(catalog: &'a [Medication], code: &str) -> Option<&'a Medication> {
    catalog.iter().find(|m| m.code.eq_ignore_ascii_case(code))
}

fn find_by_name<'a>(catalog: &'a [Medication], name: &str) -> Option<&'a Medication> {
    let name = name.to_lowercase();
    catalog.iter().find(|m| m.name.to_lowercase() == name)
}

/// Re-sort a list after a code edit. Returns true if `code` is duplicated,
/// in which case the duplicated records are moved to the top.
fn reorder_after_code_change(list: &mut [MedicationRecord], record_id: &str, code: &str) -> bool {
    let duplicate = !code.is_empty()
        && list
            .iter()
            .any(|r| r.id != record_id && r.matches_code(code));

    if duplicate {
        list.sort_by(|a, b| {
            b.matches_code(code)
                .cmp(&a.matches_code(code))
                .then_with(|| a.medication_code.cmp(&b.medication_code))
        });
    } else {
        list.sort_by(|a, b| a.medication_code.cmp(&b.medication_code));
    }
    duplicate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Patient;
    use crate::store::StoreState;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        day(2025, 6, 1)
    }

    fn store() -> Store {
        let mut state = StoreState::default();
        state.medications = vec![
            Medication::new("LIS10", "Lisinopril 10mg"),
            Medication::new("MET500", "Metformin 500mg"),
            Medication::new("ASP81", "Aspirin 81mg"),
        ];
        state.batches = vec![
            Batch::new("LIS10", "Lisinopril 10mg".into(), "LP-LATE".into(), day(2025, 12, 1), today(), 30),
            Batch::new("LIS10", "Lisinopril 10mg".into(), "LP-EARLY".into(), day(2025, 7, 1), today(), 30),
            Batch::new("LIS10", "Lisinopril 10mg".into(), "LP-OLD".into(), day(2025, 5, 1), today(), 30),
            Batch::new("MET500", "Metformin 500mg".into(), "MF-DEAD".into(), today(), today(), 30),
        ];
        state.regimens = vec![
            RegimenDefinition::new("1+0+0", "tablet in the morning".into()),
            RegimenDefinition::new("1+0+0", "capsule in the morning".into()),
            RegimenDefinition::new("BID", "twice daily".into()),
        ];
        state
            .patients
            .push(Patient::new("1001".into(), "Zed".into(), "V1".into(), String::new()));
        Store::with_state(state)
    }

    fn edit(store: &mut Store, category: MedicationCategory, id: &str, edit: MedicationEdit) -> RecordUpdate {
        store
            .update_medication_record("1001", category, id, edit, today())
            .unwrap()
    }

    fn record<'a>(store: &'a Store, category: MedicationCategory, id: &str) -> &'a MedicationRecord {
        store
            .patient("1001")
            .unwrap()
            .medications
            .get(category)
            .iter()
            .find(|r| r.id == id)
            .unwrap()
    }

    #[test]
    fn test_new_rows_are_prepended() {
        let mut store = store();
        let first = store.add_medication_row("1001", MedicationCategory::Daily).unwrap();
        let second = store.add_medication_row("1001", MedicationCategory::Daily).unwrap();
        let daily = &store.patient("1001").unwrap().medications.daily;
        assert_eq!(daily[0].id, second);
        assert_eq!(daily[1].id, first);
    }

    #[test]
    fn test_code_edit_fills_name_and_earliest_dispensable_batch() {
        let mut store = store();
        let id = store.add_medication_row("1001", MedicationCategory::Regular).unwrap();
        let update = edit(&mut store, MedicationCategory::Regular, &id, MedicationEdit::Code("lis10".into()));
        assert!(!update.duplicate_code);

        let rec = record(&store, MedicationCategory::Regular, &id);
        assert_eq!(rec.medication_code, "LIS10");
        assert_eq!(rec.medication_name, "Lisinopril 10mg");
        assert_eq!(rec.batch_id, "LP-EARLY");
        assert_eq!(rec.expiry_date, Some(day(2025, 7, 1)));
    }

    #[test]
    fn test_code_without_dispensable_batch_gets_placeholder() {
        let mut store = store();
        let id = store.add_medication_row("1001", MedicationCategory::Daily).unwrap();
        // Only batch expires today, which is not dispensable
        edit(&mut store, MedicationCategory::Daily, &id, MedicationEdit::Code("MET500".into()));

        let rec = record(&store, MedicationCategory::Daily, &id);
        assert_eq!(rec.medication_name, "Metformin 500mg");
        assert_eq!(rec.batch_id, NO_BATCH);
        assert_eq!(rec.expiry_date, None);
    }

    #[test]
    fn test_unknown_code_keeps_typed_name() {
        let mut store = store();
        let id = store.add_medication_row("1001", MedicationCategory::Daily).unwrap();
        edit(&mut store, MedicationCategory::Daily, &id, MedicationEdit::Name("House blend".into()));
        edit(&mut store, MedicationCategory::Daily, &id, MedicationEdit::Code("frtx".into()));

        let rec = record(&store, MedicationCategory::Daily, &id);
        assert_eq!(rec.medication_code, "FRTX");
        assert_eq!(rec.medication_name, "House blend");
    }

    #[test]
    fn test_name_edit_resolves_code() {
        let mut store = store();
        let id = store.add_medication_row("1001", MedicationCategory::Regular).unwrap();
        edit(&mut store, MedicationCategory::Regular, &id, MedicationEdit::Name("lisinopril 10MG".into()));

        let rec = record(&store, MedicationCategory::Regular, &id);
        assert_eq!(rec.medication_code, "LIS10");
        assert_eq!(rec.batch_id, "LP-EARLY");
    }

    #[test]
    fn test_duplicate_code_is_reported_and_floated() {
        let mut store = store();
        let a = store.add_medication_row("1001", MedicationCategory::Daily).unwrap();
        let b = store.add_medication_row("1001", MedicationCategory::Daily).unwrap();
        let c = store.add_medication_row("1001", MedicationCategory::Daily).unwrap();
        edit(&mut store, MedicationCategory::Daily, &a, MedicationEdit::Code("ASP81".into()));
        edit(&mut store, MedicationCategory::Daily, &b, MedicationEdit::Code("MET500".into()));
        let update = edit(&mut store, MedicationCategory::Daily, &c, MedicationEdit::Code("met500".into()));
        assert!(update.duplicate_code);

        let codes: Vec<_> = store
            .patient("1001")
            .unwrap()
            .medications
            .daily
            .iter()
            .map(|r| r.medication_code.as_str())
            .collect();
        assert_eq!(codes, vec!["MET500", "MET500", "ASP81"]);
    }

    #[test]
    fn test_code_edit_sorts_list_by_code() {
        let mut store = store();
        let a = store.add_medication_row("1001", MedicationCategory::Regular).unwrap();
        let b = store.add_medication_row("1001", MedicationCategory::Regular).unwrap();
        edit(&mut store, MedicationCategory::Regular, &a, MedicationEdit::Code("MET500".into()));
        edit(&mut store, MedicationCategory::Regular, &b, MedicationEdit::Code("ASP81".into()));

        let regular = &store.patient("1001").unwrap().medications.regular;
        assert_eq!(regular[0].medication_code, "ASP81");
        assert_eq!(regular[1].medication_code, "MET500");
    }

    #[test]
    fn test_regimen_edit_takes_first_meaning() {
        let mut store = store();
        let id = store.add_medication_row("1001", MedicationCategory::Daily).unwrap();
        edit(&mut store, MedicationCategory::Daily, &id, MedicationEdit::Regimen("1+0+0".into()));
        assert_eq!(
            record(&store, MedicationCategory::Daily, &id).regimen_meaning.as_deref(),
            Some("tablet in the morning")
        );
        assert_eq!(store.regimen_meanings("1+0+0").len(), 2);

        edit(&mut store, MedicationCategory::Daily, &id, MedicationEdit::Regimen("q3d".into()));
        let rec = record(&store, MedicationCategory::Daily, &id);
        assert_eq!(rec.regimen, "Q3D");
        assert_eq!(rec.regimen_meaning.as_deref(), Some(""));
    }

    #[test]
    fn test_schedule_edits_only_on_depo() {
        let mut store = store();
        let daily = store.add_medication_row("1001", MedicationCategory::Daily).unwrap();
        let err = store
            .update_medication_record("1001", MedicationCategory::Daily, &daily, MedicationEdit::Notify(true), today())
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));

        let depo = store.add_medication_row("1001", MedicationCategory::Depo).unwrap();
        edit(&mut store, MedicationCategory::Depo, &depo, MedicationEdit::Notify(true));
        edit(&mut store, MedicationCategory::Depo, &depo, MedicationEdit::FrequencyValue(Some(12)));
        let schedule = record(&store, MedicationCategory::Depo, &depo).schedule.clone().unwrap();
        assert!(schedule.notify);
        assert_eq!(schedule.frequency_value, Some(12));
    }

    #[test]
    fn test_each_edit_is_one_undo_step() {
        let mut store = store();
        let id = store.add_medication_row("1001", MedicationCategory::Daily).unwrap();
        edit(&mut store, MedicationCategory::Daily, &id, MedicationEdit::Dose("2".into()));
        edit(&mut store, MedicationCategory::Daily, &id, MedicationEdit::Notes("with food".into()));

        assert!(store.undo());
        let rec = record(&store, MedicationCategory::Daily, &id);
        assert_eq!(rec.dose, "2");
        assert_eq!(rec.notes, "");
    }

    #[test]
    fn test_remove_missing_row() {
        let mut store = store();
        let err = store
            .remove_medication_row("1001", MedicationCategory::Depo, "REC-missing")
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_upsert_medication() {
        let mut store = store();
        store.upsert_medication(Medication::new("gab300", "Gabapentin 300mg")).unwrap();
        store.upsert_medication(Medication::new("GAB300", "Gabapentin 300 mg caps")).unwrap();
        assert_eq!(
            store.find_medication_by_code("Gab300").unwrap().name,
            "Gabapentin 300 mg caps"
        );
        assert!(store.find_medication_by_name("ASPIRIN 81MG").is_some());
    }
}

//! Undo/redo invariants over arbitrary edit sequences.

use chrono::NaiveDate;
use proptest::prelude::*;

use medkeeper_core::models::MedicationCategory;
use medkeeper_core::store::{MedicationEdit, PatientField};
use medkeeper_core::{Store, StoreState};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

#[derive(Debug, Clone)]
enum Op {
    AddStation(String),
    RenamePatient(usize, String),
    AddRow(usize),
    EditCode(usize, &'static str),
    Archive(usize),
    AddRegimen(String),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[A-Z]{1,4}".prop_map(Op::AddStation),
        (0..4usize, "[a-z]{1,8}").prop_map(|(i, n)| Op::RenamePatient(i, n)),
        (0..4usize).prop_map(Op::AddRow),
        (0..4usize, prop::sample::select(vec!["LIS10", "MET500", "ASP81", "ZZZ"]))
            .prop_map(|(i, c)| Op::EditCode(i, c)),
        (0..4usize).prop_map(Op::Archive),
        "[A-Z0-9+]{1,5}".prop_map(Op::AddRegimen),
    ]
}

/// Apply `op`; returns whether it succeeded (and so recorded one entry).
fn apply(store: &mut Store, op: &Op) -> bool {
    let patient_id = |i: usize, store: &Store| store.state().patients.get(i).map(|p| p.id.clone());
    match op {
        Op::AddStation(name) => store.add_station(name).is_ok(),
        Op::RenamePatient(i, name) => match patient_id(*i, store) {
            Some(id) => store.update_patient(&id, PatientField::Name, name).is_ok(),
            None => false,
        },
        Op::AddRow(i) => match patient_id(*i, store) {
            Some(id) => store.add_medication_row(&id, MedicationCategory::Daily).is_ok(),
            None => false,
        },
        Op::EditCode(i, code) => {
            let Some(id) = patient_id(*i, store) else {
                return false;
            };
            let Some(record_id) = store
                .patient(&id)
                .and_then(|p| p.medications.daily.first())
                .map(|r| r.id.clone())
            else {
                return false;
            };
            store
                .update_medication_record(
                    &id,
                    MedicationCategory::Daily,
                    &record_id,
                    MedicationEdit::Code(code.to_string()),
                    today(),
                )
                .is_ok()
        }
        Op::Archive(i) => match patient_id(*i, store) {
            Some(id) => store.archive_patient(&id).is_ok(),
            None => false,
        },
        Op::AddRegimen(code) => store.add_regimen(code, "meaning").is_ok(),
    }
}

proptest! {
    #[test]
    fn undo_all_restores_initial_state(ops in prop::collection::vec(op(), 0..20)) {
        let mut store = Store::with_state(StoreState::demo(today()));
        let initial = store.state().clone();

        let succeeded = ops.iter().filter(|op| apply(&mut store, op)).count();
        prop_assert_eq!(store.history().undo_depth(), succeeded);
        let last = store.state().clone();

        for _ in 0..succeeded {
            prop_assert!(store.undo());
        }
        prop_assert!(!store.can_undo());
        prop_assert_eq!(store.state(), &initial);

        for _ in 0..succeeded {
            prop_assert!(store.redo());
        }
        prop_assert!(!store.can_redo());
        prop_assert_eq!(store.state(), &last);
    }

    #[test]
    fn new_edit_after_undo_clears_redo(ops in prop::collection::vec(op(), 1..10)) {
        let mut store = Store::with_state(StoreState::demo(today()));
        let succeeded = ops.iter().filter(|op| apply(&mut store, op)).count();
        prop_assume!(succeeded > 0);

        prop_assert!(store.undo());
        prop_assert!(store.can_redo());
        store.add_station("FRESH-STATION").unwrap();
        prop_assert!(!store.can_redo());
    }
}

#[test]
fn test_failed_operations_leave_history_alone() {
    let mut store = Store::with_state(StoreState::demo(today()));
    assert!(store.add_station("V1").is_err());
    assert!(store.archive_patient("no-such-patient").is_err());
    assert!(store
        .update_medication_record(
            "1001",
            MedicationCategory::Regular,
            "REC002",
            MedicationEdit::Notify(true),
            today(),
        )
        .is_err());
    assert!(!store.can_undo());
}

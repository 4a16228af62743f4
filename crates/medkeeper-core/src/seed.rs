//! Demo data for a fresh unit: catalog, stations, categories, batches,
//! four patients and the regimen dictionary.
//!
//! Dates are relative to `today` so statuses and reminders look the same
//! whenever the demo runs.

use chrono::{Days, NaiveDate};

use crate::models::{
    Batch, BatchStatus, BoxRecord, FrequencyUnit, Medication, MedicationRecord, NotificationSchedule,
    Patient, PatientCategory, RegimenDefinition, Station, DEFAULT_EXPIRING_SOON_DAYS,
};
use crate::store::StoreState;

const MEDICATIONS: &[(&str, &str)] = &[
    ("LIS10", "Lisinopril 10mg"),
    ("MET500", "Metformin 500mg"),
    ("ATO40", "Atorvastatin 40mg"),
    ("ASP81", "Aspirin 81mg"),
    ("OME20", "Omeprazole 20mg"),
    ("SIM20", "Simvastatin 20mg"),
    ("AML5", "Amlodipine 5mg"),
    ("MET25", "Metoprolol 25mg"),
    ("HCTZ25", "Hydrochlorothiazide 25mg"),
    ("GAB300", "Gabapentin 300mg"),
    ("PALIP9", "Paliperidone 9mg"),
    ("FLU20", "Fluoxetine 20mg"),
    ("DEPO-T", "Testosterone Cypionate"),
    ("DEPO-P", "Medroxyprogesterone"),
    ("FRTX", "Free Text"),
    ("NVMD", "Non-Vialed Medication"),
];

const STATIONS: &[&str] = &["V1", "V2", "F1", "F2", "F3", "M1", "M2", "O", "ICU", "A1", "A2", "G"];

const CATEGORIES: &[(&str, &str)] = &[("CAT001", "Day Care"), ("CAT002", "Picnic"), ("CAT003", "متشابة")];

/// (row id, code, name, lot, days from today)
const BATCHES: &[(&str, &str, &str, &str, i64)] = &[
    ("BCH001", "LIS10", "Lisinopril 10mg", "LP202401", 20),
    ("BCH002", "MET500", "Metformin 500mg", "MF202312", -10),
    ("BCH003", "ATO40", "Atorvastatin 40mg", "AT202506", 300),
    ("BCH004", "ASP81", "Aspirin 81mg", "AS202402", 45),
    ("BCH005", "LIS10", "Lisinopril 10mg", "LP202408", 150),
    ("BCH006", "OME20", "Omeprazole 20mg", "OM202401", 15),
];

const REGIMENS: &[(&str, &str, &str)] = &[
    ("REG001", "1+0+0", "قرص صباحاً"),
    ("REG001-A", "1+0+0", "كبسولة صباحاً"),
    ("REG002", "0+1+0", "قرص ظهراً"),
    ("REG003", "0+0+1", "قرص مساءً"),
    ("REG004", "1+0+1", "قرص صباحاً ومساءً"),
    ("REG005", "1+1+0", "قرص صباحاً وظهراً"),
    ("REG006", "0+1+1", "قرص ظهراً ومساءً"),
    ("REG007", "1+1+1", "قرص صباحاً وظهراً ومساءً"),
    ("REG008", "1+0+2", "قرص صباحاً وقرصان مساءً"),
    ("REG009", "BID", "مرتين يومياً"),
    ("REG010", "TID", "ثلاث مرات يومياً"),
    ("REG011", "QID", "أربع مرات يومياً"),
    ("REG012", "Q4H", "كل 4 ساعات"),
    ("REG013", "Q6H", "كل 6 ساعات"),
    ("REG014", "Q8H", "كل 8 ساعات"),
    ("REG015", "Q2W", "كل أسبوعين"),
    ("REG016", "Q12W", "كل 12 أسبوع (3 أشهر)"),
    ("REG017", "PRN", "عند اللزوم"),
    ("REG018", "HS", "عند النوم"),
];

/// (id, code, name, dose, regimen, meaning, notes, lot)
type RecordRow = (&'static str, &'static str, &'static str, &'static str, &'static str, &'static str, &'static str, &'static str);

fn offset(today: NaiveDate, days: i64) -> NaiveDate {
    let shifted = if days >= 0 {
        today.checked_add_days(Days::new(days as u64))
    } else {
        today.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(today)
}

fn records(rows: &[RecordRow], batches: &[Batch]) -> Vec<MedicationRecord> {
    rows.iter()
        .map(|&(id, code, name, dose, regimen, meaning, notes, lot)| MedicationRecord {
            id: id.to_string(),
            medication_code: code.to_string(),
            medication_name: name.to_string(),
            dose: dose.to_string(),
            regimen: regimen.to_string(),
            regimen_meaning: Some(meaning.to_string()),
            notes: notes.to_string(),
            batch_id: lot.to_string(),
            expiry_date: batches.iter().find(|b| b.batch_id == lot).map(|b| b.expiry_date),
            schedule: None,
        })
        .collect()
}

fn depo(row: RecordRow, start: NaiveDate, every_weeks: u32) -> MedicationRecord {
    let mut record = records(&[row], &[]).remove(0);
    record.schedule = Some(NotificationSchedule {
        notify: true,
        start_date: Some(start),
        frequency_value: Some(every_weeks),
        frequency_unit: FrequencyUnit::Weeks,
    });
    record
}

fn patient(id: &str, name: &str, station: &str, categories: &[&str], notes: &str) -> Patient {
    let mut patient = Patient::new(id.into(), name.into(), station.into(), notes.into());
    patient.category_ids = categories.iter().map(|c| c.to_string()).collect();
    patient
}

fn weekly_box(id: &str, box_id: &str, pack_date: NaiveDate, notes: &str) -> BoxRecord {
    BoxRecord {
        id: id.into(),
        box_id: box_id.into(),
        cycle: "Weekly".into(),
        pack_date,
        notes: notes.into(),
    }
}

impl StoreState {
    /// A populated unit for demos and tests.
    pub fn demo(today: NaiveDate) -> Self {
        let batches: Vec<Batch> = BATCHES
            .iter()
            .map(|&(id, code, name, lot, days)| {
                let expiry_date = offset(today, days);
                Batch {
                    id: id.into(),
                    medication_code: code.into(),
                    medication_name: name.into(),
                    batch_id: lot.into(),
                    expiry_date,
                    status: BatchStatus::compute(expiry_date, today, DEFAULT_EXPIRING_SOON_DAYS),
                }
            })
            .collect();

        let mut john = patient("1001", "جون دو", "V1", &["CAT001"], "لديه حساسية من البنسلين.");
        john.medications.regular = records(
            &[
                ("REC002", "LIS10", "Lisinopril 10mg", "1", "1+0+0", "قرص صباحاً", "Monitor blood pressure.", "LP202401"),
                ("REC003", "ATO40", "Atorvastatin 40mg", "1", "0+0+1", "قرص مساءً", "Check lipids in 3 months.", "AT202506"),
            ],
            &batches,
        );
        john.medications.daily = records(
            &[
                ("REC001", "MET500", "Metformin 500mg", "1", "1+0+1", "قرص صباحاً ومساءً", "Initial prescription.", "MF202312"),
                ("REC004", "ASP81", "Aspirin 81mg", "1", "1+0+0", "قرص صباحاً", "Take with food.", "AS202402"),
                ("REC005", "OME20", "Omeprazole 20mg", "1", "1+0+0", "كبسولة صباحاً", "Review need after 8 weeks.", "OM202401"),
            ],
            &batches,
        );
        john.medications.depo = vec![depo(
            ("REC021", "DEPO-P", "Medroxyprogesterone", "150", "Q12W", "كل 12 أسبوع", "Next injection due soon.", ""),
            today,
            12,
        )];
        john.boxes = vec![weekly_box("BOX001", "JD-W22", offset(today, -7), "Packed for current week.")];

        let mut jane = patient("1002", "جين سميث", "F1", &["CAT002", "CAT003"], "يفضل الأدوية السائلة.");
        jane.medications.regular = records(
            &[
                ("REC007", "AML5", "Amlodipine 5mg", "1", "1+0+0", "قرص صباحاً", "Patient reports mild ankle swelling.", ""),
                ("REC008", "MET25", "Metoprolol 25mg", "1", "BID", "مرتين يومياً", "Patient to self-monitor heart rate.", ""),
            ],
            &batches,
        );
        jane.medications.daily = records(
            &[
                ("REC006", "SIM20", "Simvastatin 20mg", "1", "0+0+1", "قرص مساءً", "Advised to avoid grapefruit juice.", ""),
                ("REC009", "HCTZ25", "Hydrochlorothiazide 25mg", "1", "1+0+0", "قرص صباحاً", "Take with a glass of water.", ""),
                ("REC010", "GAB300", "Gabapentin 300mg", "1", "TID", "3 مرات يومياً", "May cause drowsiness.", ""),
            ],
            &batches,
        );
        jane.boxes = vec![weekly_box("BOX002", "JS-W22", offset(today, -7), "Contains all daily meds.")];

        let mut michael = patient("1003", "مايكل جونسون", "ICU", &[], "");
        michael.medications.regular = records(
            &[("REC012", "LIS10", "Lisinopril 10mg", "1", "1+0+0", "قرص صباحاً", "Patient reports a dry cough.", "LP202408")],
            &batches,
        );
        michael.medications.daily = records(
            &[
                ("REC011", "MET500", "Metformin 500mg", "2", "0+0+2", "قرصان مساءً", "Counselled on managing GI side effects.", ""),
                ("REC013", "ASP81", "Aspirin 81mg", "1", "1+0+0", "قرص صباحاً", "", "AS202402"),
                ("REC014", "SIM20", "Simvastatin 20mg", "1", "0+0+1", "قرص مساءً", "", ""),
                ("REC015", "ATO40", "Atorvastatin 40mg", "1", "0+0+1", "قرص مساءً", "", "AT202506"),
            ],
            &batches,
        );
        michael.medications.depo = vec![depo(
            ("REC022", "DEPO-T", "Testosterone Cypionate", "200", "Q2W", "كل أسبوعين", "Patient self-administers.", ""),
            offset(today, -14),
            2,
        )];

        let mut emily = patient("1004", "إميلي ديفيس", "G", &[], "يحتاج إلى مساعدة في تناول الدواء.");
        emily.medications.regular = records(
            &[
                ("REC019", "MET25", "Metoprolol 25mg", "1", "BID", "مرتين يومياً", "", ""),
                ("REC020", "OME20", "Omeprazole 20mg", "1", "1+0+0", "كبسولة صباحاً", "", "OM202401"),
            ],
            &batches,
        );
        emily.medications.daily = records(
            &[
                ("REC016", "AML5", "Amlodipine 5mg", "1", "1+0+0", "قرص صباحاً", "", ""),
                ("REC017", "HCTZ25", "Hydrochlorothiazide 25mg", "1", "1+0+0", "قرص صباحاً", "", ""),
                ("REC018", "GAB300", "Gabapentin 300mg", "1", "TID", "3 مرات يومياً", "", ""),
            ],
            &batches,
        );

        let mut state = Self {
            patients: vec![john, jane, michael, emily],
            archived_patients: Vec::new(),
            medications: MEDICATIONS
                .iter()
                .map(|&(code, name)| Medication::new(code, name))
                .collect(),
            batches,
            regimens: REGIMENS
                .iter()
                .map(|&(id, code, meaning)| RegimenDefinition {
                    id: id.into(),
                    code: code.into(),
                    meaning: meaning.into(),
                })
                .collect(),
            stations: STATIONS
                .iter()
                .enumerate()
                .map(|(i, name)| Station {
                    id: format!("STA{:03}", i + 1),
                    name: name.to_string(),
                })
                .collect(),
            patient_categories: CATEGORIES
                .iter()
                .map(|&(id, name)| PatientCategory {
                    id: id.into(),
                    name: name.into(),
                })
                .collect(),
        };
        state.sort_batches_by_expiry();
        state
    }
}

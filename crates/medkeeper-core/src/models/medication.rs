//! Medication catalog entries and per-patient medication records.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Batch id written on a record whose code has no dispensable batch.
pub const NO_BATCH: &str = "N/A";

/// A medication known to the unit's catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    /// Short code (e.g., "LIS10")
    pub code: String,
    /// Display name (e.g., "Lisinopril 10mg")
    pub name: String,
}

impl Medication {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_uppercase(),
            name: name.to_string(),
        }
    }
}

/// Which of a patient's three medication lists a record lives in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MedicationCategory {
    /// Scheduled medications taken on a regular basis
    Regular,
    /// Medications taken every day
    Daily,
    /// Long-acting injectables with a reminder schedule
    Depo,
}

impl MedicationCategory {
    pub const ALL: [MedicationCategory; 3] = [
        MedicationCategory::Regular,
        MedicationCategory::Daily,
        MedicationCategory::Depo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MedicationCategory::Regular => "regular",
            MedicationCategory::Daily => "daily",
            MedicationCategory::Depo => "depo",
        }
    }
}

impl fmt::Display for MedicationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MedicationCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "regular" => Ok(MedicationCategory::Regular),
            "daily" => Ok(MedicationCategory::Daily),
            "depo" => Ok(MedicationCategory::Depo),
            other => Err(format!("unknown medication category: {}", other)),
        }
    }
}

/// Unit of a depo reminder frequency.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyUnit {
    Days,
    #[default]
    Weeks,
    Months,
}

impl FromStr for FrequencyUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "days" | "day" => Ok(FrequencyUnit::Days),
            "weeks" | "week" => Ok(FrequencyUnit::Weeks),
            "months" | "month" => Ok(FrequencyUnit::Months),
            other => Err(format!("unknown frequency unit: {}", other)),
        }
    }
}

impl fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FrequencyUnit::Days => "days",
            FrequencyUnit::Weeks => "weeks",
            FrequencyUnit::Months => "months",
        })
    }
}

/// Reminder schedule carried by depo records.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NotificationSchedule {
    /// Reminders are only produced when set
    pub notify: bool,
    /// Date of the first injection
    pub start_date: Option<NaiveDate>,
    /// Every N units; None until the cell is filled in
    pub frequency_value: Option<u32>,
    pub frequency_unit: FrequencyUnit,
}

/// One medication line on a patient's chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationRecord {
    pub id: String,
    pub medication_code: String,
    pub medication_name: String,
    pub dose: String,
    /// Regimen code (e.g., "1+0+1")
    pub regimen: String,
    pub regimen_meaning: Option<String>,
    pub notes: String,
    /// Batch lot number, `NO_BATCH`, or empty
    pub batch_id: String,
    pub expiry_date: Option<NaiveDate>,
    /// Present on depo records only
    pub schedule: Option<NotificationSchedule>,
}

impl MedicationRecord {
    /// An empty row for the given list.
    pub fn blank(category: MedicationCategory) -> Self {
        Self {
            id: super::new_id("REC"),
            medication_code: String::new(),
            medication_name: String::new(),
            dose: String::new(),
            regimen: String::new(),
            regimen_meaning: None,
            notes: String::new(),
            batch_id: String::new(),
            expiry_date: None,
            schedule: (category == MedicationCategory::Depo).then(NotificationSchedule::default),
        }
    }

    /// Case-insensitive medication code match.
    pub fn matches_code(&self, code: &str) -> bool {
        self.medication_code.eq_ignore_ascii_case(code)
    }

    /// Whether reminders are switched on for this record.
    pub fn notifies(&self) -> bool {
        self.schedule.as_ref().is_some_and(|s| s.notify)
    }
}

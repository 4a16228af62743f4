//! Patient models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::medication::{MedicationCategory, MedicationRecord};

/// A patient on the unit, keyed by medical record (M.R.) number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// M.R. number - entered by staff, unique among active patients
    pub id: String,
    pub name: String,
    /// Station name (stations are referenced by name, not id)
    pub station: String,
    pub category_ids: Vec<String>,
    pub special_notes: String,
    pub medications: MedicationList,
    pub boxes: Vec<BoxRecord>,
}

impl Patient {
    /// Create a patient with empty medication lists.
    pub fn new(id: String, name: String, station: String, special_notes: String) -> Self {
        Self {
            id,
            name,
            station,
            category_ids: Vec::new(),
            special_notes,
            medications: MedicationList::default(),
            boxes: Vec::new(),
        }
    }

    pub fn has_category(&self, category_id: &str) -> bool {
        self.category_ids.iter().any(|id| id == category_id)
    }

    /// Case-insensitive M.R. comparison.
    pub fn has_id(&self, id: &str) -> bool {
        self.id.to_lowercase() == id.to_lowercase()
    }

    /// Every record across regular, daily and depo lists, in that order.
    pub fn all_medications(&self) -> impl Iterator<Item = (MedicationCategory, &MedicationRecord)> {
        self.medications.iter()
    }
}

/// The three medication lists of a patient.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MedicationList {
    pub regular: Vec<MedicationRecord>,
    pub daily: Vec<MedicationRecord>,
    pub depo: Vec<MedicationRecord>,
}

impl MedicationList {
    pub fn get(&self, category: MedicationCategory) -> &Vec<MedicationRecord> {
        match category {
            MedicationCategory::Regular => &self.regular,
            MedicationCategory::Daily => &self.daily,
            MedicationCategory::Depo => &self.depo,
        }
    }

    pub fn get_mut(&mut self, category: MedicationCategory) -> &mut Vec<MedicationRecord> {
        match category {
            MedicationCategory::Regular => &mut self.regular,
            MedicationCategory::Daily => &mut self.daily,
            MedicationCategory::Depo => &mut self.depo,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MedicationCategory, &MedicationRecord)> {
        MedicationCategory::ALL
            .into_iter()
            .flat_map(move |category| self.get(category).iter().map(move |r| (category, r)))
    }

    pub fn len(&self) -> usize {
        self.regular.len() + self.daily.len() + self.depo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A packed medication box handed to the patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoxRecord {
    pub id: String,
    /// Label written on the box (e.g., "JD-W22")
    pub box_id: String,
    /// Packing cycle (e.g., "Weekly")
    pub cycle: String,
    pub pack_date: NaiveDate,
    pub notes: String,
}

impl BoxRecord {
    pub fn new(box_id: String, cycle: String, pack_date: NaiveDate, notes: String) -> Self {
        Self {
            id: super::new_id("BOX"),
            box_id,
            cycle,
            pack_date,
            notes,
        }
    }
}

//! Patient operations: the patient list, detail header, boxes and archives.

use chrono::NaiveDate;
use tracing::info;

use super::{Store, StoreError, StoreResult};
use crate::models::{parse_display_date, BoxRecord, Patient};
use crate::search::compare_names;

/// Form input for a new patient.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPatient {
    /// M.R. number (required)
    pub id: String,
    pub name: String,
    pub station: String,
    pub special_notes: String,
}

/// Result of submitting the new-patient form.
#[derive(Debug, Clone, PartialEq)]
pub enum AddPatientOutcome {
    Added,
    /// The M.R. belongs to an archived patient; nothing was added.
    /// Offer [`Store::restore_archived_patient`] instead.
    ExistsInArchive(Patient),
}

/// Inline-editable patient columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientField {
    Name,
    Station,
    SpecialNotes,
}

/// Form input for a new box record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBox {
    pub box_id: String,
    pub cycle: String,
    pub pack_date: NaiveDate,
    pub notes: String,
}

/// Inline-editable box columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxField {
    BoxId,
    Cycle,
    /// `dd/MM/yyyy`
    PackDate,
    Notes,
}

impl Store {
    /// Add a patient from the new-patient form.
    pub fn add_patient(&mut self, new: NewPatient) -> StoreResult<AddPatientOutcome> {
        if new.id.trim().is_empty() {
            return Err(StoreError::MissingField("M.R."));
        }
        if self.state.patients.iter().any(|p| p.has_id(&new.id)) {
            return Err(StoreError::DuplicatePatient(new.id));
        }
        if let Some(archived) = self
            .state
            .archived_patients
            .iter()
            .find(|p| p.has_id(&new.id))
        {
            info!(id = %archived.id, "new patient matches an archived record");
            return Ok(AddPatientOutcome::ExistsInArchive(archived.clone()));
        }

        let patient = Patient::new(new.id, new.name, new.station, new.special_notes);
        self.mutate("add patient", |state| {
            state.patients.push(patient);
            Ok(())
        })?;
        Ok(AddPatientOutcome::Added)
    }

    /// Edit one column of an active patient.
    pub fn update_patient(&mut self, id: &str, field: PatientField, value: &str) -> StoreResult<()> {
        self.mutate("update patient", |state| {
            let patient = state.patient_mut(id)?;
            let target = match field {
                PatientField::Name => &mut patient.name,
                PatientField::Station => &mut patient.station,
                PatientField::SpecialNotes => &mut patient.special_notes,
            };
            *target = value.to_string();
            Ok(())
        })
    }

    /// Tick or untick a category on a patient.
    pub fn set_patient_category(
        &mut self,
        id: &str,
        category_id: &str,
        selected: bool,
    ) -> StoreResult<()> {
        self.mutate("set patient category", |state| {
            let patient = state.patient_mut(id)?;
            if selected {
                if !patient.has_category(category_id) {
                    patient.category_ids.push(category_id.to_string());
                }
            } else {
                patient.category_ids.retain(|c| c != category_id);
            }
            Ok(())
        })
    }

    /// Move an active patient to the archives.
    pub fn archive_patient(&mut self, id: &str) -> StoreResult<()> {
        self.mutate("archive patient", |state| {
            let index = state
                .patients
                .iter()
                .position(|p| p.id == id)
                .ok_or_else(|| StoreError::NotFound(format!("patient {}", id)))?;
            let patient = state.patients.remove(index);
            if !state.archived_patients.iter().any(|p| p.id == patient.id) {
                state.archived_patients.push(patient);
            }
            Ok(())
        })?;
        info!(id, "patient archived");
        Ok(())
    }

    /// Move an archived patient back to the active list.
    ///
    /// The active list is re-sorted by name afterwards.
    pub fn restore_archived_patient(&mut self, id: &str) -> StoreResult<()> {
        self.mutate("restore patient", |state| {
            let index = state
                .archived_patients
                .iter()
                .position(|p| p.id == id)
                .ok_or_else(|| StoreError::NotFound(format!("archived patient {}", id)))?;
            let patient = state.archived_patients.remove(index);
            if !state.patients.iter().any(|p| p.id == patient.id) {
                state.patients.push(patient);
            }
            state.patients.sort_by(|a, b| compare_names(&a.name, &b.name));
            Ok(())
        })?;
        info!(id, "patient restored from archive");
        Ok(())
    }

    /// Permanently delete an archived patient.
    pub fn delete_archived_patient(&mut self, id: &str) -> StoreResult<()> {
        self.mutate("delete archived patient", |state| {
            let before = state.archived_patients.len();
            state.archived_patients.retain(|p| p.id != id);
            if state.archived_patients.len() == before {
                return Err(StoreError::NotFound(format!("archived patient {}", id)));
            }
            Ok(())
        })?;
        info!(id, "archived patient deleted");
        Ok(())
    }

    // =========================================================================
    // Boxes
    // =========================================================================

    /// Add a box record to a patient. Returns the new record id.
    pub fn add_box(&mut self, patient_id: &str, new: NewBox) -> StoreResult<String> {
        let record = BoxRecord::new(new.box_id, new.cycle, new.pack_date, new.notes);
        let record_id = record.id.clone();
        self.mutate("add box", |state| {
            state.patient_mut(patient_id)?.boxes.push(record);
            Ok(())
        })?;
        Ok(record_id)
    }

    /// Edit one column of a box record.
    pub fn update_box(
        &mut self,
        patient_id: &str,
        box_record_id: &str,
        field: BoxField,
        value: &str,
    ) -> StoreResult<()> {
        self.mutate("update box", |state| {
            let record = state
                .patient_mut(patient_id)?
                .boxes
                .iter_mut()
                .find(|b| b.id == box_record_id)
                .ok_or_else(|| StoreError::NotFound(format!("box {}", box_record_id)))?;
            match field {
                BoxField::BoxId => record.box_id = value.to_string(),
                BoxField::Cycle => record.cycle = value.to_string(),
                BoxField::Notes => record.notes = value.to_string(),
                BoxField::PackDate => {
                    record.pack_date = parse_display_date(value).ok_or_else(|| {
                        StoreError::InvalidInput(format!("not a dd/MM/yyyy date: {}", value))
                    })?;
                }
            }
            Ok(())
        })
    }

    /// Remove a box record.
    pub fn remove_box(&mut self, patient_id: &str, box_record_id: &str) -> StoreResult<()> {
        self.mutate("remove box", |state| {
            let boxes = &mut state.patient_mut(patient_id)?.boxes;
            let before = boxes.len();
            boxes.retain(|b| b.id != box_record_id);
            if boxes.len() == before {
                return Err(StoreError::NotFound(format!("box {}", box_record_id)));
            }
            Ok(())
        })
    }
}

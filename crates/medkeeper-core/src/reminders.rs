//! Depo injection reminders.
//!
//! A depo record with notifications switched on, a start date and a positive
//! frequency is due on `start + k * frequency` for every `k >= 0`. Monthly
//! schedules step in calendar months from the start date, so a schedule
//! started on the 31st falls on the last day of shorter months.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

use crate::models::{FrequencyUnit, NotificationSchedule};
use crate::store::StoreState;

/// An upcoming injection.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Reminder {
    pub patient_id: String,
    pub patient_name: String,
    pub station: String,
    pub record_id: String,
    pub medication_code: String,
    pub medication_name: String,
    pub due: NaiveDate,
}

/// The first scheduled date on or after `today`.
pub fn next_due(schedule: &NotificationSchedule, today: NaiveDate) -> Option<NaiveDate> {
    if !schedule.notify {
        return None;
    }
    let start = schedule.start_date?;
    let every = schedule.frequency_value.filter(|n| *n > 0)?;
    if start >= today {
        return Some(start);
    }

    match schedule.frequency_unit {
        FrequencyUnit::Days => step_days(start, today, u64::from(every)),
        FrequencyUnit::Weeks => step_days(start, today, u64::from(every) * 7),
        FrequencyUnit::Months => {
            let elapsed = (today.year() - start.year()) * 12 + today.month() as i32
                - start.month() as i32;
            // Begin one period early; day-of-month clamping can land before today
            let mut k = (elapsed.max(0) as u32 / every).saturating_sub(1);
            loop {
                let due = start.checked_add_months(Months::new(k.checked_mul(every)?))?;
                if due >= today {
                    return Some(due);
                }
                k += 1;
            }
        }
    }
}

fn step_days(start: NaiveDate, today: NaiveDate, period: u64) -> Option<NaiveDate> {
    let elapsed = (today - start).num_days().max(0) as u64;
    let k = elapsed.div_ceil(period);
    start.checked_add_days(Days::new(k * period))
}

/// Every depo reminder due between `today` and `today + horizon_days`,
/// soonest first.
pub fn due_reminders(state: &StoreState, today: NaiveDate, horizon_days: u32) -> Vec<Reminder> {
    let Some(until) = today.checked_add_days(Days::new(u64::from(horizon_days))) else {
        return Vec::new();
    };

    let mut reminders: Vec<Reminder> = state
        .patients
        .iter()
        .flat_map(|patient| {
            patient.medications.depo.iter().filter_map(move |record| {
                let due = next_due(record.schedule.as_ref()?, today)?;
                (due <= until).then(|| Reminder {
                    patient_id: patient.id.clone(),
                    patient_name: patient.name.clone(),
                    station: patient.station.clone(),
                    record_id: record.id.clone(),
                    medication_code: record.medication_code.clone(),
                    medication_name: record.medication_name.clone(),
                    due,
                })
            })
        })
        .collect();
    reminders.sort_by(|a, b| a.due.cmp(&b.due).then_with(|| a.patient_name.cmp(&b.patient_name)));
    reminders
}

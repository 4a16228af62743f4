//! Medication batch models.

use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Days ahead of expiry at which a batch is flagged.
pub const DEFAULT_EXPIRING_SOON_DAYS: u32 = 30;

/// Derived batch status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BatchStatus {
    #[serde(rename = "Valid")]
    Valid,
    #[serde(rename = "Expiring Soon")]
    ExpiringSoon,
    #[serde(rename = "Expired")]
    Expired,
}

impl BatchStatus {
    /// Status of a batch expiring on `expiry`, as seen on `today`.
    pub fn compute(expiry: NaiveDate, today: NaiveDate, window_days: u32) -> Self {
        if expiry < today {
            return BatchStatus::Expired;
        }
        let horizon = today
            .checked_add_days(Days::new(u64::from(window_days)))
            .unwrap_or(NaiveDate::MAX);
        if expiry <= horizon {
            BatchStatus::ExpiringSoon
        } else {
            BatchStatus::Valid
        }
    }

    /// Label shown in the status column.
    pub fn label(&self) -> &'static str {
        match self {
            BatchStatus::Valid => "Valid",
            BatchStatus::ExpiringSoon => "Expiring Soon",
            BatchStatus::Expired => "Expired",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A manufactured lot of a medication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Batch {
    /// Internal row id
    pub id: String,
    /// Medication code (upper case), matched against records by text
    pub medication_code: String,
    pub medication_name: String,
    /// Manufacturer lot number, unique across batches
    pub batch_id: String,
    pub expiry_date: NaiveDate,
    /// Cached status, recomputed on every expiry edit
    pub status: BatchStatus,
}

impl Batch {
    /// Create a batch with a fresh id and a status computed for `today`.
    pub fn new(
        medication_code: &str,
        medication_name: String,
        batch_id: String,
        expiry_date: NaiveDate,
        today: NaiveDate,
        window_days: u32,
    ) -> Self {
        Self {
            id: super::new_id("BCH"),
            medication_code: medication_code.to_uppercase(),
            medication_name,
            batch_id,
            expiry_date,
            status: BatchStatus::compute(expiry_date, today, window_days),
        }
    }

    /// Recompute the cached status. Returns true if it changed.
    pub fn refresh_status(&mut self, today: NaiveDate, window_days: u32) -> bool {
        let status = BatchStatus::compute(self.expiry_date, today, window_days);
        let changed = status != self.status;
        self.status = status;
        changed
    }

    /// Whether this batch can still be dispensed after `today`.
    pub fn is_dispensable(&self, today: NaiveDate) -> bool {
        self.expiry_date > today
    }

    /// Case-insensitive medication code match.
    pub fn matches_code(&self, code: &str) -> bool {
        self.medication_code.eq_ignore_ascii_case(code)
    }
}

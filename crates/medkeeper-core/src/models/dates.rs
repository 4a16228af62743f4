//! Calendar date helpers shared by forms, tables and spreadsheet import.

use chrono::{Days, NaiveDate};

/// Format used by every date cell the staff type into.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Excel serial number of 1970-01-01.
const EXCEL_UNIX_EPOCH_SERIAL: i64 = 25569;

/// Parse a `dd/MM/yyyy` date. Surrounding whitespace is ignored.
pub fn parse_display_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DISPLAY_DATE_FORMAT).ok()
}

/// Format a date as `dd/MM/yyyy`.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Convert an Excel serial date to a calendar date.
///
/// The fractional (time of day) part is dropped.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    let offset = serial.floor() as i64 - EXCEL_UNIX_EPOCH_SERIAL;
    if offset >= 0 {
        epoch.checked_add_days(Days::new(offset as u64))
    } else {
        epoch.checked_sub_days(Days::new(offset.unsigned_abs()))
    }
}

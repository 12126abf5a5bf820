//! Spreadsheet serial dates

use chrono::{Datelike, Duration, NaiveDate};

/// Day zero of the 1900 date system as spreadsheets count it (leap-bug adjusted)
pub fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

/// Convert a serial day count to a calendar date by adding whole days to the epoch.
///
/// The time-of-day fraction is dropped. Returns `None` for non-finite or
/// out-of-range serials.
pub fn from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = serial.floor();
    if days.abs() > i32::MAX as f64 {
        return None;
    }
    let offset = Duration::try_days(days as i64)?;
    serial_epoch().checked_add_signed(offset)
}

/// US short date without padding, e.g. `3/15/2023`
pub fn format_us_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_serials() {
        assert_eq!(from_serial(1.0), NaiveDate::from_ymd_opt(1899, 12, 31));
        assert_eq!(from_serial(45000.0), NaiveDate::from_ymd_opt(2023, 3, 15));
        assert_eq!(from_serial(45658.75), NaiveDate::from_ymd_opt(2025, 1, 1));
    }

    #[test]
    fn test_invalid_serials() {
        assert_eq!(from_serial(f64::NAN), None);
        assert_eq!(from_serial(f64::INFINITY), None);
        assert_eq!(from_serial(1.0e15), None);
    }

    #[test]
    fn test_us_format() {
        let date = NaiveDate::from_ymd_opt(2023, 3, 5).unwrap();
        assert_eq!(format_us_date(date), "3/5/2023");
    }
}

//! Domain models persisted by the storage layer.
//!
//! These mirror the documents of the college data set. Dates are typed here;
//! the `shared` DTOs carry them as strings.

pub mod attendance;
pub mod fees;
pub mod marks;
pub mod student;
pub mod subject;
pub mod teacher;

use anyhow::Result;
use chrono::NaiveDate;

use crate::domain::errors::DomainError;

/// Calendar dates travel as `YYYY-MM-DD`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a calendar date, reporting a validation error that names the field
pub fn parse_calendar_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        DomainError::Validation(format!("{} must be in YYYY-MM-DD format, got '{}'", field, value)).into()
    })
}

pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Roll numbers match ignoring surrounding whitespace and ASCII case
pub fn same_roll_no(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Key under which roll numbers are deduplicated
pub fn roll_no_key(roll_no: &str) -> String {
    roll_no.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_calendar_date() {
        let date = parse_calendar_date("date", "2024-01-02").unwrap();
        assert_eq!(format_calendar_date(date), "2024-01-02");

        assert!(parse_calendar_date("date", " 2024-02-29 ").is_ok());
        assert!(parse_calendar_date("date", "2023-02-29").is_err());
        assert!(parse_calendar_date("date", "02/01/2024").is_err());

        let err = parse_calendar_date("due_date", "tomorrow").unwrap_err();
        assert!(err.to_string().contains("due_date"));
    }

    #[test]
    fn test_roll_numbers_ignore_case() {
        assert!(same_roll_no("CS-01", "cs-01"));
        assert!(same_roll_no(" CS-01", "CS-01 "));
        assert!(!same_roll_no("CS-01", "CS-010"));
        assert_eq!(roll_no_key(" cs-01 "), roll_no_key("CS-01"));
    }
}

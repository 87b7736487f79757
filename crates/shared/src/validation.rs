//! Common validation utilities.

use chrono::NaiveDate;
use validator::ValidationError;

/// Last valid hour of the day.
pub const MAX_HOUR_OF_DAY: u8 = 23;

/// Date format used for flight dates.
pub const FLIGHT_DATE_FORMAT: &str = "%Y-%m-%d";

lazy_static::lazy_static! {
    static ref LEADING_INTEGER_REGEX: regex::Regex =
        regex::Regex::new(r"^\s*[+-]?\d+").unwrap();
}

/// Validates that an hour value is within a day (0 to 23).
pub fn validate_hour_of_day(hour: u8) -> Result<(), ValidationError> {
    if hour <= MAX_HOUR_OF_DAY {
        Ok(())
    } else {
        let mut err = ValidationError::new("hour_range");
        err.message = Some("Hour must be between 0 and 23".into());
        Err(err)
    }
}

/// Parses a flight date (`YYYY-MM-DD`).
pub fn parse_flight_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, FLIGHT_DATE_FORMAT).ok()
}

/// Reads the integer a status string starts with.
///
/// Leading whitespace and a sign are allowed, trailing text is ignored.
/// Returns `None` when the value does not start with digits or overflows.
pub fn parse_leading_integer(value: &str) -> Option<i64> {
    LEADING_INTEGER_REGEX
        .find(value)
        .and_then(|m| m.as_str().trim_start().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_hour_of_day() {
        assert!(validate_hour_of_day(0).is_ok());
        assert!(validate_hour_of_day(12).is_ok());
        assert!(validate_hour_of_day(23).is_ok());
        assert!(validate_hour_of_day(24).is_err());
        assert!(validate_hour_of_day(u8::MAX).is_err());
    }

    #[test]
    fn test_validate_hour_of_day_error_message() {
        let err = validate_hour_of_day(30).unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Hour must be between 0 and 23"
        );
    }

    #[test]
    fn test_parse_flight_date() {
        assert_eq!(
            parse_flight_date("2025-03-14"),
            NaiveDate::from_ymd_opt(2025, 3, 14)
        );
        assert!(parse_flight_date("2025-02-30").is_none());
        assert!(parse_flight_date("14.03.2025").is_none());
        assert!(parse_flight_date("").is_none());
    }

    #[test]
    fn test_parse_leading_integer() {
        assert_eq!(parse_leading_integer("1"), Some(1));
        assert_eq!(parse_leading_integer("0"), Some(0));
        assert_eq!(parse_leading_integer("  12"), Some(12));
        assert_eq!(parse_leading_integer("-3"), Some(-3));
        assert_eq!(parse_leading_integer("+4"), Some(4));
        assert_eq!(parse_leading_integer("2 sessions"), Some(2));
        assert_eq!(parse_leading_integer("7.9"), Some(7));
    }

    #[test]
    fn test_parse_leading_integer_rejects_non_numeric() {
        assert_eq!(parse_leading_integer(""), None);
        assert_eq!(parse_leading_integer("active"), None);
        assert_eq!(parse_leading_integer("N/A"), None);
        assert_eq!(parse_leading_integer("-"), None);
        assert_eq!(parse_leading_integer("99999999999999999999"), None);
    }
}

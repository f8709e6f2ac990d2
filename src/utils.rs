//! Shared utility functions for the solar analytics engine

use chrono::NaiveDate;

/// Convert a 1-based day of year to a calendar date
///
/// Returns `None` when the day does not exist in that year (day 0, day 366
/// of a non-leap year, or anything beyond).
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use solar_analytics::utils::day_of_year_to_date;
///
/// assert_eq!(day_of_year_to_date(2023, 1), NaiveDate::from_ymd_opt(2023, 1, 1));
/// assert_eq!(day_of_year_to_date(2024, 60), NaiveDate::from_ymd_opt(2024, 2, 29));
/// assert_eq!(day_of_year_to_date(2023, 366), None);
/// ```
pub fn day_of_year_to_date(year: i32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_yo_opt(year, day)
}

/// Human-friendly label for a day of year, e.g. "May 03, 2023"
///
/// Falls back to "Day N" when the day is not a valid date for the year.
///
/// ```
/// use solar_analytics::utils::format_day;
///
/// assert_eq!(format_day(2023, 123), "May 03, 2023");
/// assert_eq!(format_day(2023, 400), "Day 400");
/// ```
pub fn format_day(year: i32, day: u32) -> String {
    match day_of_year_to_date(year, day) {
        Some(date) => date.format("%b %d, %Y").to_string(),
        None => format!("Day {day}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_zero_is_invalid() {
        assert_eq!(day_of_year_to_date(2023, 0), None);
    }

    #[test]
    fn test_last_day_of_leap_year() {
        assert_eq!(
            day_of_year_to_date(2024, 366),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
    }

    #[test]
    fn test_format_day_first_of_year() {
        assert_eq!(format_day(2023, 1), "Jan 01, 2023");
    }

    #[test]
    fn test_format_day_invalid_falls_back() {
        assert_eq!(format_day(2023, 0), "Day 0");
    }
}

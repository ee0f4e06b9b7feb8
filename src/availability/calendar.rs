use chrono::{Datelike, FixedOffset, Months, NaiveDate};

/// Number of days in a month, None if the month cannot be represented.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some(last.day())
}

/// Current calendar year in the reference timezone.
pub fn current_year(offset: &FixedOffset) -> i32 {
    chrono::Utc::now().with_timezone(offset).year()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc_plus_seven() -> FixedOffset {
        FixedOffset::east_opt(7 * 3600).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 1), Some(31));
        assert_eq!(days_in_month(2024, 4), Some(30));
        assert_eq!(days_in_month(2024, 12), Some(31));
    }

    #[test]
    fn test_days_in_february_leap_years() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2000, 2), Some(29));
        assert_eq!(days_in_month(1900, 2), Some(28));
    }

    #[test]
    fn test_days_in_invalid_month() {
        assert_eq!(days_in_month(2024, 0), None);
        assert_eq!(days_in_month(2024, 13), None);
    }

    #[test]
    fn test_current_year_is_recent() {
        let year = current_year(&utc_plus_seven());
        assert!(year >= 2024);
    }
}

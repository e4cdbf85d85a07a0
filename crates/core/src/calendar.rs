//! Gregorian calendar helpers shared by the parsers.

/// Smallest value accepted as a year without two-digit years enabled.
///
/// Day-of-month values never exceed 31, so anything at or above this is
/// unambiguously a year.
pub const YEAR_DAY_THRESHOLD: u64 = 32;

/// Year used to validate a day when the year is unknown. A leap year, so
/// 29 February stays valid.
const YEARLESS_REFERENCE: i32 = 2000;

const DAYS_PER_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

#[must_use]
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days in `month` of `year`; 31 for months outside 1..=12.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    if month == 2 && is_leap_year(year) {
        return 29;
    }
    month
        .checked_sub(1)
        .and_then(|idx| DAYS_PER_MONTH.get(idx as usize))
        .copied()
        .unwrap_or(31)
}

#[must_use]
pub fn is_valid_month(month: u32) -> bool {
    (1..=12).contains(&month)
}

/// Whether `day` fits `month` of `year`.
///
/// Only the 1..=31 range is checked when the month is unknown or invalid.
#[must_use]
pub fn is_valid_day(year: Option<i32>, month: Option<u32>, day: u32) -> bool {
    if !(1..=31).contains(&day) {
        return false;
    }
    match month {
        Some(month) if is_valid_month(month) => {
            day <= days_in_month(year.unwrap_or(YEARLESS_REFERENCE), month)
        }
        _ => true,
    }
}

#[must_use]
pub fn is_day_like(value: i64) -> bool {
    (1..=31).contains(&value)
}

/// A year value accepted by [`normalize_year`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedYear {
    pub year: i32,
    /// Accepted only because two-digit years are enabled.
    pub two_digit: bool,
}

/// Accept `value` as a year.
///
/// Magnitudes of 32 and up always qualify. Smaller magnitudes (including 0)
/// qualify only with `allow_two_digit`.
#[must_use]
pub fn normalize_year(value: i64, allow_two_digit: bool) -> Option<NormalizedYear> {
    let year = i32::try_from(value).ok()?;
    if value.unsigned_abs() >= YEAR_DAY_THRESHOLD {
        return Some(NormalizedYear {
            year,
            two_digit: false,
        });
    }
    allow_two_digit.then_some(NormalizedYear {
        year,
        two_digit: true,
    })
}

#[must_use]
pub fn is_year_like(value: i64, allow_two_digit: bool) -> bool {
    normalize_year(value, allow_two_digit).is_some()
}

/// `year * 10000 + month * 100 + day` for a fully valid date.
#[must_use]
pub fn sort_key(year: i32, month: u32, day: u32) -> Option<i64> {
    if !is_valid_month(month) || !is_valid_day(Some(year), Some(month), day) {
        return None;
    }
    Some(i64::from(year) * 10_000 + i64::from(month) * 100 + i64::from(day))
}

/// ISO-style rendering: `YYYY-MM-DD`, `YYYY-MM` or `YYYY`.
///
/// Yearless values and a day without a month have no rendering.
#[must_use]
pub fn format_partial(year: Option<i32>, month: Option<u32>, day: Option<u32>) -> Option<String> {
    let year = year?;
    Some(match (month, day) {
        (Some(m), Some(d)) => format!("{year:04}-{m:02}-{d:02}"),
        (Some(m), None) => format!("{year:04}-{m:02}"),
        _ => format!("{year:04}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(1996));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(1978));
    }

    #[test]
    fn test_days_in_month_matches_chrono() {
        for year in [1600, 1700, 1899, 1900, 1978, 2000, 2024] {
            for month in 1..=12 {
                let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
                let next = if month == 12 {
                    NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap()
                } else {
                    NaiveDate::from_ymd_opt(year, month + 1, 1).unwrap()
                };
                let expected = (next - first).num_days() as u32;
                assert_eq!(days_in_month(year, month), expected, "{year}-{month}");
            }
        }
    }

    #[test]
    fn test_days_in_month_out_of_range() {
        assert_eq!(days_in_month(1900, 0), 31);
        assert_eq!(days_in_month(1900, 13), 31);
    }

    #[test]
    fn test_year_threshold() {
        assert_eq!(normalize_year(31, false), None);
        assert_eq!(
            normalize_year(31, true),
            Some(NormalizedYear {
                year: 31,
                two_digit: true
            })
        );
        assert_eq!(
            normalize_year(32, false),
            Some(NormalizedYear {
                year: 32,
                two_digit: false
            })
        );
        assert_eq!(normalize_year(0, false), None);
        assert!(normalize_year(0, true).is_some());
        assert_eq!(normalize_year(i64::from(i32::MAX) + 1, true), None);
    }

    #[test]
    fn test_sort_key_requires_valid_date() {
        assert_eq!(sort_key(1978, 9, 21), Some(19_780_921));
        assert_eq!(sort_key(1900, 2, 29), None);
        assert_eq!(sort_key(2000, 2, 29), Some(20_000_229));
        assert_eq!(sort_key(1900, 13, 1), None);
    }

    #[test]
    fn test_yearless_day_validation_uses_leap_year() {
        assert!(is_valid_day(None, Some(2), 29));
        assert!(!is_valid_day(None, Some(2), 30));
        assert!(is_valid_day(Some(1900), None, 31));
    }

    #[test]
    fn test_format_partial() {
        assert_eq!(format_partial(Some(980), Some(3), Some(7)).as_deref(), Some("0980-03-07"));
        assert_eq!(format_partial(Some(1980), Some(3), None).as_deref(), Some("1980-03"));
        assert_eq!(format_partial(Some(1980), None, None).as_deref(), Some("1980"));
        assert_eq!(format_partial(None, Some(3), Some(7)), None);
    }
}

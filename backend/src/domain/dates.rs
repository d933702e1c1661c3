//! Date normalization and month arithmetic.
//!
//! All heterogeneous date input funnels through [`to_canonical`], which emits
//! the `YYYY-MM-DD` representation used everywhere else in the engine.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use shared::CanonicalDate;

/// Formats tried by the general parsing fallback, after RFC 3339 and plain
/// datetime shapes have been ruled out.
const FALLBACK_DATE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%d %B %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%b %d, %Y",
];

/// Normalize a raw date string to canonical form.
///
/// Parsing precedence is fixed and significant; an input ambiguous between
/// shapes is resolved by the first rule that accepts it, never by locale:
/// 1. already `YYYY-MM-DD` shaped: accepted as-is;
/// 2. `D/M/YYYY` or `D-M-YYYY` (1-2 digit day/month, 4-digit year):
///    reordered and zero-padded;
/// 3. general parsing of common date/datetime formats;
/// 4. otherwise `None`.
pub fn to_canonical(raw: &str) -> Option<CanonicalDate> {
    let v = raw.trim();
    if v.is_empty() {
        return None;
    }
    if let Some(canonical) = CanonicalDate::from_shape(v) {
        return Some(canonical);
    }
    if let Some(canonical) = parse_day_month_year(v) {
        return Some(canonical);
    }
    parse_general(v)
}

/// Shape 2: day/month/year with `/` or `-` separators. The day and month are
/// zero-padded; the year must be exactly 4 digits. Calendar validity is not
/// checked, matching the acceptance rules of shape 1.
fn parse_day_month_year(v: &str) -> Option<CanonicalDate> {
    let parts: Vec<&str> = v.split(['/', '-']).collect();
    if parts.len() != 3 {
        return None;
    }
    let (day, month, year) = (parts[0], parts[1], parts[2]);
    let all_digits = [day, month, year]
        .iter()
        .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));
    if !all_digits || day.len() > 2 || month.len() > 2 || year.len() != 4 {
        return None;
    }
    Some(CanonicalDate::from_ymd(
        year.parse().ok()?,
        month.parse().ok()?,
        day.parse().ok()?,
    ))
}

/// Shape 3: general parsing. Tries RFC 3339, then a plain datetime, then the
/// fallback date formats, and emits the parsed date's own calendar fields.
fn parse_general(v: &str) -> Option<CanonicalDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(v) {
        let d = dt.date_naive();
        return Some(CanonicalDate::from_ymd(d.year(), d.month(), d.day()));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(v, "%Y-%m-%dT%H:%M:%S") {
        let d = dt.date();
        return Some(CanonicalDate::from_ymd(d.year(), d.month(), d.day()));
    }
    for fmt in FALLBACK_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(v, fmt) {
            return Some(CanonicalDate::from_ymd(d.year(), d.month(), d.day()));
        }
    }
    None
}

/// Number of days in a month, computed as "day 0" of the following month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(0)
}

/// First and last day of a month in canonical form, for range queries.
pub fn month_bounds(year: i32, month: u32) -> Option<(CanonicalDate, CanonicalDate)> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let last = days_in_month(year, month);
    if last == 0 {
        return None;
    }
    Some((
        CanonicalDate::from_ymd(year, month, 1),
        CanonicalDate::from_ymd(year, month, last),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_input_is_format_invariant() {
        let expected = Some(CanonicalDate::from_ymd(2024, 3, 5));
        assert_eq!(to_canonical("2024-03-05"), expected.clone());
        assert_eq!(to_canonical("5/3/2024"), expected.clone());
        assert_eq!(to_canonical("05-03-2024"), expected);
    }

    #[test]
    fn canonical_shape_wins_over_reinterpretation() {
        // Already-canonical input is accepted as-is, not re-read as D-M-YYYY.
        assert_eq!(
            to_canonical("2024-03-05"),
            Some(CanonicalDate::from_ymd(2024, 3, 5))
        );
    }

    #[test]
    fn day_month_year_zero_pads() {
        assert_eq!(
            to_canonical("1/9/2023"),
            Some(CanonicalDate::from_ymd(2023, 9, 1))
        );
        assert_eq!(
            to_canonical("31-12-1999"),
            Some(CanonicalDate::from_ymd(1999, 12, 31))
        );
    }

    #[test]
    fn day_month_year_requires_four_digit_year() {
        assert_eq!(to_canonical("5/3/24"), None);
        assert_eq!(to_canonical("5/3/20245"), None);
    }

    #[test]
    fn general_fallback_parses_common_forms() {
        let expected = Some(CanonicalDate::from_ymd(2024, 3, 5));
        assert_eq!(to_canonical("2024/03/05"), expected.clone());
        assert_eq!(to_canonical("March 5, 2024"), expected.clone());
        assert_eq!(to_canonical("5 March 2024"), expected.clone());
        assert_eq!(to_canonical("2024-03-05T12:30:00"), expected.clone());
        assert_eq!(to_canonical("2024-03-05T12:30:00+00:00"), expected);
    }

    #[test]
    fn unparseable_input_is_invalid() {
        assert_eq!(to_canonical(""), None);
        assert_eq!(to_canonical("   "), None);
        assert_eq!(to_canonical("not a date"), None);
        assert_eq!(to_canonical("13/13"), None);
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 4), 30);
    }

    #[test]
    fn month_bounds_span_the_month() {
        let (start, end) = month_bounds(2024, 2).unwrap();
        assert_eq!(start.as_str(), "2024-02-01");
        assert_eq!(end.as_str(), "2024-02-29");
        assert_eq!(month_bounds(2024, 13), None);
    }
}

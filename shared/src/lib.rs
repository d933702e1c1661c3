use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A date normalized to the canonical `YYYY-MM-DD` representation.
///
/// Equality is plain string equality: two inputs describing the same calendar
/// day always normalize to the identical representation, so no further
/// comparison logic is needed. The empty string is the "invalid/absent" value.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalDate(String);

impl CanonicalDate {
    /// Accept a string that is already in `YYYY-MM-DD` shape.
    ///
    /// This is a shape check only (4 digits, dash, 2 digits, dash, 2 digits);
    /// calendar validity is not re-checked for already-canonical input.
    pub fn from_shape(s: &str) -> Option<Self> {
        let b = s.as_bytes();
        let shaped = b.len() == 10
            && b[4] == b'-'
            && b[7] == b'-'
            && [0, 1, 2, 3, 5, 6, 8, 9]
                .iter()
                .all(|&i| b[i].is_ascii_digit());
        if shaped {
            Some(Self(s.to_string()))
        } else {
            None
        }
    }

    /// Build a canonical date from explicit calendar fields (month is 1-based).
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Self {
        Self(format!("{:04}-{:02}-{:02}", year, month, day))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Day-of-month component, if this value carries the canonical shape.
    pub fn day_of_month(&self) -> Option<u32> {
        self.0.get(8..10)?.parse().ok()
    }

    /// Interpret the canonical string as a chrono date, if it names a real day.
    pub fn to_naive(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, "%Y-%m-%d").ok()
    }
}

impl fmt::Display for CanonicalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw identity fields exactly as submitted by the caller, before validation
/// or date normalization. Transient: built per query, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyRequest {
    /// National identity number (expected: exactly 13 ASCII digits)
    pub national_id: String,
    /// Unit (house) number within the community
    pub unit_number: String,
    pub first_name: String,
    pub last_name: String,
    /// Birth date in any supported input format
    pub birth_date: String,
}

/// A validated identity record with the birth date already canonical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub national_id: String,
    pub unit_number: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: CanonicalDate,
}

/// Read-only tenant projection from the store.
///
/// The stored birth date is kept as-is (it may be blank or non-canonical for
/// legacy rows); identity matching compares it literally against the
/// canonical input, so such rows simply never match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantRecord {
    pub national_id: String,
    pub unit_number: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
}

/// A single maintenance-fee payment, immutable once retrieved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub payment_date: CanonicalDate,
    pub year: i32,
    /// 1-based month the payment covers
    pub month: u32,
    pub unit_number: String,
}

/// Identity fields that can fail to match against the stored tenant record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchField {
    FirstName,
    LastName,
    BirthDate,
}

impl MismatchField {
    /// User-facing field label for mismatch messages.
    pub fn label(&self) -> &'static str {
        match self {
            MismatchField::FirstName => "first name",
            MismatchField::LastName => "last name",
            MismatchField::BirthDate => "birth date",
        }
    }
}

/// Outcome of a tenant identity verification. Exactly one variant per query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchResult {
    /// No tenant row exists for the (national id, unit number) pair
    NotFound,
    /// A row exists but one or more identity fields differ.
    /// Fields are reported in a fixed order: first name, last name, birth date.
    Mismatch { fields: Vec<MismatchField> },
    /// Full identity match, with the current-period fee status
    Matched {
        tenant: TenantRecord,
        current_period_paid: bool,
    },
}

/// Structural validation failures for a submitted identity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    NationalIdFormat,
    UnitNumberRequired,
    FirstNameInvalid,
    LastNameInvalid,
    BirthDateInvalid,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ValidationError::NationalIdFormat => "National id must be exactly 13 digits.",
            ValidationError::UnitNumberRequired => "Unit number is required.",
            ValidationError::FirstNameInvalid => "First name is invalid.",
            ValidationError::LastNameInvalid => "Last name is invalid.",
            ValidationError::BirthDateInvalid => "Birth date is invalid.",
        };
        f.write_str(msg)
    }
}

/// Request for a unit's payment history, with an optional date window.
/// Bounds are raw strings; the engine normalizes them before filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRequest {
    pub unit_number: String,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// A community event shown on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityEvent {
    pub date: CanonicalDate,
    pub title: String,
    pub description: String,
}

/// One cell of the month grid.
///
/// `day` is `None` for the padding cells before day 1 and after the last day
/// of the month; those cells never carry events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub day: Option<u32>,
    pub is_today: bool,
    pub events: Vec<CommunityEvent>,
}

impl CalendarCell {
    /// An outside-month placeholder cell.
    pub fn outside() -> Self {
        Self {
            day: None,
            is_today: false,
            events: Vec::new(),
        }
    }
}

/// A month laid out as week rows of exactly 7 cells, Monday first.
/// At most 6 rows are ever produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarMonth {
    pub year: i32,
    /// 1-based month
    pub month: u32,
    pub weeks: Vec<Vec<CalendarCell>>,
}

/// A community news entry for the home feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub date: CanonicalDate,
    pub body: String,
}

//! Structural validation of a submitted identity record.
//!
//! Every rule is independent and every failure is collected; validation never
//! short-circuits, so the caller can show all problems at once.

use shared::{IdentityRecord, ValidationError, VerifyRequest};

use crate::domain::dates;

/// National identity numbers are a fixed-length digit string.
const NATIONAL_ID_LEN: usize = 13;

/// Validate raw identity fields. An empty result means the record is valid.
pub fn validate(request: &VerifyRequest) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !is_national_id(&request.national_id) {
        errors.push(ValidationError::NationalIdFormat);
    }
    if request.unit_number.trim().is_empty() {
        errors.push(ValidationError::UnitNumberRequired);
    }
    if !is_person_name(&request.first_name) {
        errors.push(ValidationError::FirstNameInvalid);
    }
    if !is_person_name(&request.last_name) {
        errors.push(ValidationError::LastNameInvalid);
    }
    if dates::to_canonical(&request.birth_date).is_none() {
        errors.push(ValidationError::BirthDateInvalid);
    }

    errors
}

/// Validate and, on success, produce the identity record with a canonical
/// birth date, ready for the tenant matcher.
pub fn to_identity_record(request: &VerifyRequest) -> Result<IdentityRecord, Vec<ValidationError>> {
    let errors = validate(request);
    if !errors.is_empty() {
        return Err(errors);
    }
    // validate() established that the birth date normalizes.
    let birth_date = dates::to_canonical(&request.birth_date).ok_or_else(Vec::new)?;
    Ok(IdentityRecord {
        national_id: request.national_id.trim().to_string(),
        unit_number: request.unit_number.trim().to_string(),
        first_name: request.first_name.trim().to_string(),
        last_name: request.last_name.trim().to_string(),
        birth_date,
    })
}

fn is_national_id(s: &str) -> bool {
    s.len() == NATIONAL_ID_LEN && s.bytes().all(|b| b.is_ascii_digit())
}

/// Names allow letters (including accented Latin letters), spaces,
/// apostrophes, and hyphens, with a minimum length of 2.
fn is_person_name(s: &str) -> bool {
    s.chars().count() >= 2
        && s.chars()
            .all(|c| c.is_alphabetic() || c == ' ' || c == '\'' || c == '-')
}

//! Identity checks applied to every roster row before any lookup happens.
use crate::models::{ClientRecord, EMAIL, FIRST_NAME, LAST_NAME};

/// Validate email address
///
/// Intentionally permissive: a value passes if it contains both `@` and `.`.
/// No RFC 5322 parsing is attempted. Absent values never pass.
pub fn is_valid_email(email: Option<&str>) -> bool {
    match email {
        Some(value) => value.contains('@') && value.contains('.'),
        None => false,
    }
}

/// True if the value is present and has content once surrounding whitespace is trimmed.
pub fn is_non_empty_string(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Identity gate: email, first name and last name must all be usable.
pub fn has_valid_identity(record: &ClientRecord) -> bool {
    let email_valid = is_valid_email(record.get(EMAIL).map(str::trim));
    let first_present = is_non_empty_string(record.get(FIRST_NAME));
    let last_present = is_non_empty_string(record.get(LAST_NAME));
    let valid = email_valid && first_present && last_present;

    if !valid {
        tracing::debug!(
            "Identity check failed (email valid: {}, first name present: {}, last name present: {})",
            email_valid,
            first_present,
            last_present
        );
    }

    valid
}

//! Address normalization and residential/postal selection.
use crate::models::{
    ClientRecord, POSTAL_LOCALITY, POSTAL_POSTCODE, POSTAL_STREET, RESIDENTIAL_LOCALITY,
    RESIDENTIAL_POSTCODE, RESIDENTIAL_STREET,
};
use crate::validation::is_non_empty_string;
use serde::{Deserialize, Serialize};

/// Which of the two address blocks on a row was used for geocoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressSource {
    Residential,
    Postal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedAddress {
    pub source: AddressSource,
    pub text: String,
}

/// Join the non-empty, trimmed parts as `street, locality, postcode`.
///
/// Returns an empty string when no part has content; callers treat that as
/// "no address".
pub fn build_address(
    street: Option<&str>,
    locality: Option<&str>,
    postcode: Option<&str>,
) -> String {
    [street, locality, postcode]
        .into_iter()
        .filter(|part| is_non_empty_string(*part))
        .flatten()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Residential address if it has any content, otherwise the postal one.
pub fn select_address(record: &ClientRecord) -> Option<SelectedAddress> {
    let residential = build_address(
        record.get(RESIDENTIAL_STREET),
        record.get(RESIDENTIAL_LOCALITY),
        record.get(RESIDENTIAL_POSTCODE),
    );
    if !residential.is_empty() {
        return Some(SelectedAddress {
            source: AddressSource::Residential,
            text: residential,
        });
    }

    let postal = build_address(
        record.get(POSTAL_STREET),
        record.get(POSTAL_LOCALITY),
        record.get(POSTAL_POSTCODE),
    );
    if !postal.is_empty() {
        return Some(SelectedAddress {
            source: AddressSource::Postal,
            text: postal,
        });
    }

    None
}

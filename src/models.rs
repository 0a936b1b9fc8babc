use serde::{Deserialize, Serialize};
use std::fmt;

// ============ Input Columns ============

pub const EMAIL: &str = "Email";
pub const FIRST_NAME: &str = "First Name";
pub const LAST_NAME: &str = "Last Name";
pub const RESIDENTIAL_STREET: &str = "Residential Address Street";
pub const RESIDENTIAL_LOCALITY: &str = "Residential Address Locality";
pub const RESIDENTIAL_POSTCODE: &str = "Residential Address Postcode";
pub const POSTAL_STREET: &str = "Postal Address Street";
pub const POSTAL_LOCALITY: &str = "Postal Address Locality";
pub const POSTAL_POSTCODE: &str = "Postal Address Postcode";

// ============ Output Columns ============

pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";

// ============ Roster Models ============

/// One client row from the input roster.
///
/// Fields keep the order they were read in, including repeated column names.
/// A column that was not present in the input simply has no entry, and
/// lookups for it return `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    fields: Vec<(String, String)>,
}

impl ClientRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, replacing any existing value for `name`.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Append a cell without touching earlier cells of the same name.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// First value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value of the cell at `index` when it was read under `name`, otherwise
    /// the first value stored under `name`.
    pub fn value_at(&self, index: usize, name: &str) -> Option<&str> {
        match self.fields.get(index) {
            Some((key, value)) if key == name => Some(value.as_str()),
            _ => self.get(name),
        }
    }
}

/// Collects cells positionally; repeated names are all kept.
impl<K, V> FromIterator<(K, V)> for ClientRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = ClientRecord::new();
        for (name, value) in iter {
            record.push(name, value);
        }
        record
    }
}

/// A client row that passed every check, with its resolved coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub record: ClientRecord,
    /// WGS84 degrees.
    pub latitude: f64,
    /// WGS84 degrees.
    pub longitude: f64,
}

/// Ordered roster as loaded from the input file.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    /// Column names in input order.
    pub headers: Vec<String>,
    pub records: Vec<ClientRecord>,
}

// ============ Geocoding Models ============

/// A point returned by the geocoding provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Final outcome of resolving one address, after all retries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeocodeResult {
    Resolved { latitude: f64, longitude: f64 },
    Unresolved,
}

impl GeocodeResult {
    pub fn is_resolved(&self) -> bool {
        matches!(self, GeocodeResult::Resolved { .. })
    }
}

impl From<Location> for GeocodeResult {
    fn from(location: Location) -> Self {
        GeocodeResult::Resolved {
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}

// ============ Pipeline Outcomes ============

/// Why a row was left out of the enriched table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    InvalidIdentity,
    MissingAddress,
    GeolocationFailed,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectionReason::InvalidIdentity => "invalid identity",
            RejectionReason::MissingAddress => "missing address",
            RejectionReason::GeolocationFailed => "geolocation failed",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentOutcome {
    Accepted(EnrichedRecord),
    Rejected(RejectionReason),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_insertion_order_and_replaces() {
        let record = ClientRecord::new()
            .with_field(EMAIL, "a@b.com")
            .with_field(FIRST_NAME, "Ann")
            .with_field(EMAIL, "ann@b.com");

        assert_eq!(record.value_at(0, EMAIL), Some("ann@b.com"));
        assert_eq!(record.value_at(1, FIRST_NAME), Some("Ann"));
        assert_eq!(record.get(EMAIL), Some("ann@b.com"));
        assert_eq!(record.get(LAST_NAME), None);
    }

    #[test]
    fn test_repeated_columns_kept_by_position() {
        let record: ClientRecord = [(EMAIL, "a@b.com"), ("Note", "first"), ("Note", "second")]
            .into_iter()
            .collect();

        assert_eq!(record.get("Note"), Some("first"));
        assert_eq!(record.value_at(1, "Note"), Some("first"));
        assert_eq!(record.value_at(2, "Note"), Some("second"));
        assert_eq!(record.value_at(5, EMAIL), Some("a@b.com"));
        assert_eq!(record.value_at(0, LAST_NAME), None);
    }

    #[test]
    fn test_rejection_reason_display() {
        assert_eq!(
            RejectionReason::InvalidIdentity.to_string(),
            "invalid identity"
        );
        assert_eq!(RejectionReason::MissingAddress.to_string(), "missing address");
        assert_eq!(
            RejectionReason::GeolocationFailed.to_string(),
            "geolocation failed"
        );
    }

    #[test]
    fn test_location_converts_to_resolved() {
        let result: GeocodeResult = Location {
            latitude: -37.8136,
            longitude: 144.9631,
        }
        .into();

        assert!(result.is_resolved());
        assert_eq!(
            result,
            GeocodeResult::Resolved {
                latitude: -37.8136,
                longitude: 144.9631
            }
        );
    }
}

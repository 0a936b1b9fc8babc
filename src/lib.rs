//! Client Roster Geocoding Enrichment Library
//!
//! This library validates client roster rows, composes a postal address for
//! each one, resolves it to coordinates through a geocoding provider and
//! collects the rows that passed every check.
//!
//! # Modules
//!
//! - `core`: Validation and enrichment logic.
//! - `integrations`: Geocoding provider and CSV table IO.
//! - `address`: Address normalization and residential/postal selection.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `geocoder`: Geocoding collaborator trait and Nominatim client.
//! - `models`: Roster records, geocoding results and row outcomes.
//! - `pacing`: Rate-limit and backoff waits.
//! - `pipeline`: Row-by-row enrichment pipeline.
//! - `report`: Per-row run log and summary.
//! - `resolver`: Coordinate resolution with bounded retries.
//! - `table`: CSV loading and writing.
//! - `validation`: Identity field checks.

pub mod core;
pub mod integrations;

pub mod address;
pub mod config;
pub mod errors;
pub mod geocoder;
pub mod models;
pub mod pacing;
pub mod pipeline;
pub mod report;
pub mod resolver;
pub mod table;
pub mod validation;

//! Row-by-row validation and enrichment
//!
//! Each record goes through:
//! 1. Identity gate (email, first name, last name)
//! 2. Address selection (residential, falling back to postal)
//! 3. Coordinate resolution with bounded retries
//! 4. Acceptance into the output table
//!
//! Rows are handled strictly in order on one task. A failing row is logged
//! with its index and skipped; it never stops the run.
use crate::address::select_address;
use crate::config::Config;
use crate::models::{
    ClientRecord, EnrichedRecord, EnrichmentOutcome, GeocodeResult, RejectionReason,
};
use crate::pacing::{FixedDelayPacer, Pacer};
use crate::report::{RowReport, RowStatus, RunReport};
use crate::resolver::GeocodeResolver;
use crate::validation::has_valid_identity;
use std::sync::Arc;
use tracing::Instrument;

/// Result of a full pipeline run.
#[derive(Debug)]
pub struct EnrichmentRun {
    /// Accepted rows, in input order.
    pub accepted: Vec<EnrichedRecord>,
    pub report: RunReport,
}

pub struct EnrichmentPipeline {
    resolver: GeocodeResolver,
    pacer: Arc<dyn Pacer>,
}

impl EnrichmentPipeline {
    pub fn new(resolver: GeocodeResolver, pacer: Arc<dyn Pacer>) -> Self {
        Self { resolver, pacer }
    }

    pub fn from_config(resolver: GeocodeResolver, config: &Config) -> Self {
        Self::new(resolver, Arc::new(FixedDelayPacer::new(config.row_pacing())))
    }

    pub async fn run(&self, records: Vec<ClientRecord>) -> EnrichmentRun {
        let report = RunReport::new();
        let span = tracing::info_span!("enrichment_run", run_id = %report.run_id);
        self.run_rows(records, report).instrument(span).await
    }

    async fn run_rows(&self, records: Vec<ClientRecord>, mut report: RunReport) -> EnrichmentRun {
        let mut accepted = Vec::new();
        tracing::info!("Starting enrichment of {} row(s)", records.len());

        for (index, record) in records.into_iter().enumerate() {
            let (outcome, row) = self.process_record(index, record).await;
            report.push(row);
            if let EnrichmentOutcome::Accepted(enriched) = outcome {
                accepted.push(enriched);
            }
        }

        report.finish();
        tracing::info!(
            "Enrichment complete: {} accepted, {} rejected (identity: {}, address: {}, geolocation: {})",
            report.summary.accepted,
            report.summary.rejected(),
            report.summary.invalid_identity,
            report.summary.missing_address,
            report.summary.geolocation_failed
        );

        EnrichmentRun { accepted, report }
    }

    /// Takes one record to a terminal state.
    ///
    /// Rows that reach the geocoding step are paced afterwards, whatever the result.
    pub async fn process_record(
        &self,
        index: usize,
        record: ClientRecord,
    ) -> (EnrichmentOutcome, RowReport) {
        if !has_valid_identity(&record) {
            return rejected(index, RejectionReason::InvalidIdentity);
        }

        let Some(selected) = select_address(&record) else {
            return rejected(index, RejectionReason::MissingAddress);
        };

        let result = self.resolver.resolve(&selected.text).await;
        self.pacer.wait_between_calls().await;

        let mut row = RowReport {
            row: index,
            status: RowStatus::Accepted,
            reason: None,
            address_source: Some(selected.source),
            address: Some(selected.text),
        };

        match result {
            GeocodeResult::Resolved {
                latitude,
                longitude,
            } => {
                tracing::info!("Row {} enriched: ({}, {})", index, latitude, longitude);
                let enriched = EnrichedRecord {
                    record,
                    latitude,
                    longitude,
                };
                (EnrichmentOutcome::Accepted(enriched), row)
            }
            GeocodeResult::Unresolved => {
                let reason = RejectionReason::GeolocationFailed;
                tracing::warn!(row = index, %reason, "Row {} skipped: {}", index, reason);
                row.status = RowStatus::Rejected;
                row.reason = Some(reason);
                (EnrichmentOutcome::Rejected(reason), row)
            }
        }
    }
}

fn rejected(index: usize, reason: RejectionReason) -> (EnrichmentOutcome, RowReport) {
    tracing::warn!(row = index, %reason, "Row {} skipped: {}", index, reason);
    let row = RowReport {
        row: index,
        status: RowStatus::Rejected,
        reason: Some(reason),
        address_source: None,
        address: None,
    };
    (EnrichmentOutcome::Rejected(reason), row)
}

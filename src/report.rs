use crate::address::AddressSource;
use crate::errors::{AppError, ResultExt};
use crate::models::RejectionReason;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Accepted,
    Rejected,
}

/// What happened to one input row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowReport {
    /// Zero-based position in the input table.
    pub row: usize,
    pub status: RowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectionReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_source: Option<AddressSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub accepted: usize,
    pub invalid_identity: usize,
    pub missing_address: usize,
    pub geolocation_failed: usize,
}

impl RunSummary {
    fn record(&mut self, row: &RowReport) {
        self.total += 1;
        match row.reason {
            None => self.accepted += 1,
            Some(RejectionReason::InvalidIdentity) => self.invalid_identity += 1,
            Some(RejectionReason::MissingAddress) => self.missing_address += 1,
            Some(RejectionReason::GeolocationFailed) => self.geolocation_failed += 1,
        }
    }

    pub fn rejected(&self) -> usize {
        self.total - self.accepted
    }
}

/// Run log: one entry per processed row plus aggregate counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub summary: RunSummary,
    pub rows: Vec<RowReport>,
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            summary: RunSummary::default(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: RowReport) {
        self.summary.record(&row);
        self.rows.push(row);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn rejections(&self) -> impl Iterator<Item = (usize, RejectionReason)> + '_ {
        self.rows
            .iter()
            .filter_map(|row| row.reason.map(|reason| (row.row, reason)))
    }

    pub fn write_json(&self, path: &Path) -> Result<(), AppError> {
        let body = serde_json::to_string_pretty(self)?;
        std::fs::write(path, body)
            .with_context(|| format!("Failed to write run report to {}", path.display()))?;
        tracing::info!("Run report written to {}", path.display());
        Ok(())
    }
}

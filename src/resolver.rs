use crate::config::Config;
use crate::geocoder::Geocoder;
use crate::models::GeocodeResult;
use crate::pacing::{FixedDelayPacer, Pacer};
use std::sync::Arc;
use std::time::Duration;

/// Retry settings for a single address lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total lookup attempts per address. Zero is treated as one.
    pub max_retries: u32,
    /// Per-call timeout handed to the provider.
    pub timeout: Duration,
    /// Whether a "no match" answer also waits for the backoff before the next attempt.
    pub backoff_on_no_match: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            timeout: Duration::from_secs(3),
            backoff_on_no_match: false,
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.max_retries,
            timeout: config.geocoder_timeout(),
            backoff_on_no_match: config.backoff_on_no_match,
        }
    }

    fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }
}

/// Resolves free-text addresses to coordinates with bounded retries.
///
/// Provider errors never escape: they turn into backoff and another attempt,
/// and finally into [`GeocodeResult::Unresolved`].
#[derive(Clone)]
pub struct GeocodeResolver {
    geocoder: Arc<dyn Geocoder>,
    backoff: Arc<dyn Pacer>,
    policy: RetryPolicy,
}

impl GeocodeResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, backoff: Arc<dyn Pacer>, policy: RetryPolicy) -> Self {
        Self {
            geocoder,
            backoff,
            policy,
        }
    }

    pub fn from_config(geocoder: Arc<dyn Geocoder>, config: &Config) -> Self {
        Self::new(
            geocoder,
            Arc::new(FixedDelayPacer::new(config.retry_backoff())),
            RetryPolicy::from_config(config),
        )
    }

    pub async fn resolve(&self, address: &str) -> GeocodeResult {
        let attempts = self.policy.attempts();

        for attempt in 1..=attempts {
            tracing::debug!("Attempting geocode ({}/{}): {}", attempt, attempts, address);

            match self.geocoder.lookup(address, self.policy.timeout).await {
                Ok(Some(location)) => {
                    tracing::debug!(
                        "Geocoded '{}' → ({}, {})",
                        address,
                        location.latitude,
                        location.longitude
                    );
                    return location.into();
                }
                Ok(None) => {
                    tracing::debug!("No match for '{}' on attempt {}", address, attempt);
                    if self.policy.backoff_on_no_match && attempt < attempts {
                        self.backoff.wait_between_calls().await;
                    }
                }
                Err(e) => {
                    tracing::warn!("Retry {}/{} after error: {}", attempt, attempts, e);
                    if attempt < attempts {
                        self.backoff.wait_between_calls().await;
                    }
                }
            }
        }

        tracing::warn!("Failed to geocode: {}", address);
        GeocodeResult::Unresolved
    }
}

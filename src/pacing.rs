use async_trait::async_trait;
use std::time::Duration;

/// Pacing policy between calls to the geocoding provider.
///
/// Used both for the per-row rate limit and for the backoff between retries,
/// so tests can swap in [`NoopPacer`] instead of sleeping.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn wait_between_calls(&self);
}

/// Sleeps a fixed interval on every call.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelayPacer {
    delay: Duration,
}

impl FixedDelayPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Pacer for FixedDelayPacer {
    async fn wait_between_calls(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPacer;

#[async_trait]
impl Pacer for NoopPacer {
    async fn wait_between_calls(&self) {}
}

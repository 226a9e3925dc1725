// law_ingestor/src/pacing.rs
// Keeps embedding traffic under the provider's request budget.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

/// How the last record's embedding call went, as far as pacing cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub enum PaceSignal {
    Completed,
    RateLimited,
}

#[async_trait]
pub trait Pacer: Send + Sync {
    /// Awaited right before each embedding request.
    async fn before_embedding(&self,) {}

    /// Awaited after every record that reached the embedding stage.
    async fn after_record(&self, signal: PaceSignal,);
}

/// Constant pause after each embedded record.
#[derive(Debug, Clone,)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration,) -> Self {
        Self { delay, }
    }
}

#[async_trait]
impl Pacer for FixedDelay {
    async fn after_record(&self, _signal: PaceSignal,) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay,).await;
        }
    }
}

/// Base pause plus an extra wait that doubles on every rate-limit response.
#[derive(Debug,)]
pub struct AdaptiveBackoff {
    base:    Duration,
    max:     Duration,
    penalty: Mutex<Duration,>,
}

impl AdaptiveBackoff {
    pub fn new(base: Duration, max: Duration,) -> Self {
        Self {
            base,
            max: max.max(base,),
            penalty: Mutex::new(Duration::ZERO,),
        }
    }

    /// Extra wait applied before the next embedding request.
    pub fn penalty(&self,) -> Duration {
        *self.penalty.lock().unwrap_or_else(|e| e.into_inner(),)
    }

    /// Updates the penalty from `signal` and returns the new value.
    pub fn observe(&self, signal: PaceSignal,) -> Duration {
        let mut penalty = self.penalty.lock().unwrap_or_else(|e| e.into_inner(),);
        *penalty = match signal {
            PaceSignal::Completed => Duration::ZERO,
            PaceSignal::RateLimited if penalty.is_zero() => self.base.max(Duration::from_millis(100,),),
            PaceSignal::RateLimited => (*penalty * 2).min(self.max,),
        };
        *penalty
    }
}

#[async_trait]
impl Pacer for AdaptiveBackoff {
    async fn before_embedding(&self,) {
        let penalty = self.penalty();
        if !penalty.is_zero() {
            debug!(penalty_ms = penalty.as_millis() as u64, "Backing off before embedding");
            tokio::time::sleep(penalty,).await;
        }
    }

    async fn after_record(&self, signal: PaceSignal,) {
        let penalty = self.observe(signal,);
        if signal == PaceSignal::RateLimited {
            warn!(penalty_ms = penalty.as_millis() as u64, "Embedding service is rate limiting");
        }
        if !self.base.is_zero() {
            tokio::time::sleep(self.base,).await;
        }
    }
}

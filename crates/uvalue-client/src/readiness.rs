//! Readiness probing for a backend that may be cold-starting
//!
//! Polls the liveness endpoints until one answers or the wait budget runs
//! out. Every probe and every pause is clipped to the remaining budget, so
//! the whole wait never exceeds `max_wait` by more than one poll interval.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use uvalue_core::cancel::CancelFlag;
use uvalue_core::error::{Result, UvalueError};

/// Liveness endpoints, tried in this order each cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeTarget {
    Health,
    Cities,
}

impl ProbeTarget {
    pub const ORDER: [ProbeTarget; 2] = [ProbeTarget::Health, ProbeTarget::Cities];

    pub fn path(&self) -> &'static str {
        match self {
            ProbeTarget::Health => "/health",
            ProbeTarget::Cities => "/cities",
        }
    }
}

/// Something that can ask the backend whether it is alive
#[async_trait]
pub trait LivenessProbe: Send + Sync {
    /// True when `target` answered with a 2xx status within `timeout`
    async fn probe(&self, target: ProbeTarget, timeout: Duration) -> bool;
}

/// How a readiness wait ended, other than by timing out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready { target: ProbeTarget, elapsed: Duration },
    /// The owner went away before the backend answered
    Cancelled,
}

pub struct ReadinessProber<P> {
    probe: P,
    max_wait: Duration,
    poll_interval: Duration,
}

impl<P: LivenessProbe> ReadinessProber<P> {
    pub fn new(probe: P, max_wait: Duration, poll_interval: Duration) -> Self {
        Self { probe, max_wait, poll_interval }
    }

    /// Per-probe timeout: slightly under the poll interval
    pub fn probe_timeout(&self) -> Duration {
        let trimmed = self.poll_interval.saturating_sub(Duration::from_millis(250));
        trimmed.max(self.poll_interval / 2)
    }

    /// Poll until the backend answers, the budget runs out, or `cancel` fires
    pub async fn await_ready(&self, cancel: &CancelFlag) -> Result<Readiness> {
        let started = Instant::now();
        let deadline = started + self.max_wait;
        let mut cycle = 0u32;

        loop {
            if cancel.is_cancelled() {
                return Ok(Readiness::Cancelled);
            }

            for target in ProbeTarget::ORDER {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return Err(self.timed_out(started));
                }

                let budget = self.probe_timeout().min(remaining);
                let alive = tokio::time::timeout(budget, self.probe.probe(target, budget))
                    .await
                    .unwrap_or(false);

                if cancel.is_cancelled() {
                    return Ok(Readiness::Cancelled);
                }
                if alive {
                    let elapsed = started.elapsed();
                    tracing::info!(
                        "Backend ready via {} after {}ms",
                        target.path(),
                        elapsed.as_millis()
                    );
                    return Ok(Readiness::Ready { target, elapsed });
                }
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(self.timed_out(started));
            }

            cycle += 1;
            tracing::debug!(
                "Backend not ready after cycle {} ({}ms left)",
                cycle,
                remaining.as_millis()
            );
            tokio::time::sleep(self.poll_interval.min(remaining)).await;
        }
    }

    fn timed_out(&self, started: Instant) -> UvalueError {
        let waited = started.elapsed();
        tracing::warn!("Backend did not become ready within {}ms", waited.as_millis());
        UvalueError::ReadinessTimeout { waited }
    }
}

//! Execution Cooldown Gate
//!
//! Process-wide rate limiter: at most one execution attempt per cooldown
//! window, however many routes look profitable in a scan cycle.
//!
//! Author: AI-Generated
//! Created: 2026-10-19
//!
//! Design:
//!     - Single shared timestamp of the last permitted execution
//!     - `try_claim` checks and sets under one lock acquisition, with no
//!       await point in between, so concurrent evaluators cannot both pass
//!     - The timestamp is claimed before submission; a failed submission
//!       does not release it
//!     - Not persisted: a restart resets the cooldown

use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::SkipReason;

/// Shared execution gate, injected into the scanner
#[derive(Debug)]
pub struct ExecutionGate {
    cooldown: Duration,
    last_execution: Mutex<Option<Instant>>,
}

impl ExecutionGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_execution: Mutex::new(None),
        }
    }

    /// Claim the execution slot now
    pub fn try_claim(&self) -> Result<(), SkipReason> {
        self.try_claim_at(Instant::now())
    }

    /// Claim the execution slot at `now`. On success the timestamp moves to `now`.
    pub fn try_claim_at(&self, now: Instant) -> Result<(), SkipReason> {
        let mut last = self
            .last_execution
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(prev) = *last {
            let elapsed = now.saturating_duration_since(prev);
            if elapsed < self.cooldown {
                let remaining = self.cooldown - elapsed;
                debug!("Execution cooldown: {}ms remaining", remaining.as_millis());
                return Err(SkipReason::Cooldown {
                    remaining_ms: remaining.as_millis() as u64,
                });
            }
        }

        *last = Some(now);
        Ok(())
    }

    /// Instant of the last permitted execution
    pub fn last_execution(&self) -> Option<Instant> {
        *self
            .last_execution
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

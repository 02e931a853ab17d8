//! Aggregation of delivery outcomes into a process-level result.
//!
//! The summary is the invocation's terminal signal: its exit code is zero
//! only when every outcome succeeded, and its rendering enumerates each URL
//! with the observed status or failure detail. This module performs no I/O
//! of its own.

use std::fmt;

use serde::Serialize;

use crate::types::DeliveryOutcome;

/// Aggregated result of one invocation.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// Per-request outcomes, in delivery order.
    pub outcomes: Vec<DeliveryOutcome>,
    /// Number of succeeded outcomes.
    pub succeeded: usize,
    /// Number of failed outcomes.
    pub failed: usize,
}

impl Summary {
    /// Returns true when every outcome succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Process exit code: zero only when all outcomes succeeded.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        if self.failed > 0 { 1 } else { 0 }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            let verdict = if outcome.succeeded { "ok" } else { "failed" };
            write!(f, "{verdict:>6}  {}", outcome.url)?;
            if let Some(status) = outcome.status {
                write!(f, " (HTTP {status})")?;
            }
            if let Some(detail) = &outcome.detail {
                write!(f, ": {detail}")?;
            }
            writeln!(f)?;
        }
        write!(f, "{} delivered, {} failed", self.succeeded, self.failed)
    }
}

/// Folds outcomes into a summary.
#[must_use]
pub fn summarize(outcomes: Vec<DeliveryOutcome>) -> Summary {
    let succeeded = outcomes.iter().filter(|o| o.succeeded).count();
    let failed = outcomes.len() - succeeded;
    Summary {
        outcomes,
        succeeded,
        failed,
    }
}

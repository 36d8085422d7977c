//! Replay/live divergence verification.
//!
//! The engine promises that the history replayer, fed only the immutable
//! logs, reproduces the live metric store exactly. A divergence silently
//! corrupts every chart the player sees, so this crate treats it as fatal:
//! it runs seeded playthroughs, replays the logs, and compares field by
//! field.

pub mod report;
pub mod verify;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VerifyStatus {
    Pass,
    Fail,
}

/// Outcome of one compared quantity.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyResult {
    /// What was compared (metric name or check label).
    pub metric: String,
    pub expected: f64,
    pub actual: f64,
    pub delta: f64,
    pub status: VerifyStatus,
    pub details: Option<String>,
}

/// Aggregated results of one verification run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct VerificationSummary {
    pub results: Vec<VerifyResult>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl VerificationSummary {
    pub fn push(&mut self, result: VerifyResult) {
        self.total += 1;
        match result.status {
            VerifyStatus::Pass => self.passed += 1,
            VerifyStatus::Fail => self.failed += 1,
        }
        self.results.push(result);
    }

    /// Compare two floats exactly; any difference is a failure.
    pub fn compare(&mut self, metric: impl Into<String>, expected: f64, actual: f64) {
        let delta = actual - expected;
        self.push(VerifyResult {
            metric: metric.into(),
            expected,
            actual,
            delta,
            status: if delta == 0.0 {
                VerifyStatus::Pass
            } else {
                VerifyStatus::Fail
            },
            details: None,
        });
    }

    /// Record a named boolean check.
    pub fn check(&mut self, metric: impl Into<String>, ok: bool, details: impl Into<String>) {
        self.push(VerifyResult {
            metric: metric.into(),
            expected: 1.0,
            actual: if ok { 1.0 } else { 0.0 },
            delta: if ok { 0.0 } else { -1.0 },
            status: if ok {
                VerifyStatus::Pass
            } else {
                VerifyStatus::Fail
            },
            details: Some(details.into()),
        });
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 * 100.0 / self.total as f64
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

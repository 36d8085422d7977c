//! Tuning constants for the simulation.
//!
//! These are data, not architecture: the formulas in [`crate::derived`] and
//! the bookkeeping in [`crate::budget`] are specified independently of the
//! exact values here.

/// Budget and debt bookkeeping.
pub mod budget {
    /// Freely allocatable federal budget per simulated year, in euros.
    pub const ANNUAL_BUDGET: f64 = 25_000_000_000.0;
    /// Fixed annual interest rate on cumulative debt.
    pub const INTEREST_RATE: f64 = 0.03;
    /// Debt magnitude above which the government is fiscally insolvent.
    pub const DEBT_CEILING: f64 = 600_000_000_000.0;
}

/// Term structure and decision pacing.
pub mod term {
    pub const START_YEAR: i32 = 2025;
    /// Full simulated chancellorship.
    pub const TERM_YEARS: i32 = 12;
    /// One legislature period.
    pub const LEGISLATURE_YEARS: i32 = 4;
    /// Decisions accepted per calendar year.
    pub const MAX_DECISIONS_PER_YEAR: usize = 8;
}

/// CO2 reduction path.
pub mod climate {
    /// Tons of cumulative reduction per percentage point of path progress.
    pub const TONS_PER_PATH_POINT: f64 = 10_000_000.0;
}

/// Median real income drift.
pub mod income {
    pub const INITIAL: f64 = 42_000.0;
    pub const FLOOR: f64 = 25_000.0;
    pub const CEILING: f64 = 80_000.0;
    /// Per-batch and per-year gain cap, as a fraction of the previous income.
    pub const MAX_GAIN: f64 = 0.04;
    /// Yearly drift loss floor, as a fraction of the previous income.
    pub const MAX_YEARLY_LOSS: f64 = 0.02;
    /// Income gain per growth point, as a fraction of the previous income.
    pub const GROWTH_FACTOR: f64 = 0.005;
    /// Unemployment rate at which the drift penalty is zero.
    pub const UNEMPLOYMENT_BASELINE: f64 = 3.0;
    /// Income loss per unemployment point above the baseline.
    pub const UNEMPLOYMENT_FACTOR: f64 = 0.002;
    /// Income loss per billion euros of cumulative debt.
    pub const DEBT_FACTOR: f64 = 0.000_05;
}

/// Terminal-condition thresholds, checked in [`crate::stability`].
pub mod stability {
    /// Coalition partner satisfaction at or below this ends the coalition.
    pub const COALITION_COLLAPSE: f64 = 20.0;
    /// Popularity at or below this loses the confidence vote.
    pub const NO_CONFIDENCE: f64 = 25.0;
}

/// Voter-swing model.
pub mod polls {
    /// Fraction of any bloc's voters that is switchable at all.
    pub const SWITCHABLE_FRACTION: f64 = 0.12;
    /// Option cost above which fiscally conservative blocs gain.
    pub const HIGH_COST_THRESHOLD: f64 = 10_000_000_000.0;
    /// Cost magnitude that corresponds to a full-strength cost swing.
    pub const COST_SWING_SCALE: f64 = 100_000_000_000.0;
    /// Cap on the cost-swing rate.
    pub const COST_SWING_CAP: f64 = 0.5;
    /// Minimum share any bloc keeps after renormalization.
    pub const SHARE_FLOOR: f64 = 0.1;
}

//! Budget and debt bookkeeping.

use crate::defines::budget as defines;
use serde::{Deserialize, Serialize};

/// Closed accounting for one simulated year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub year: i32,
    pub spent: f64,
    pub debt_added: f64,
    pub closing_debt: f64,
}

/// Period budget, cumulative debt and interest.
///
/// Debt is tracked here as a positive magnitude; the metrics vector mirrors
/// it negated. [`crate::effects::apply_effect_batch`] keeps the two in sync
/// after every batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLedger {
    /// Remaining budget for the current annual period. Never negative.
    pub available: f64,
    /// Spent this period (signed: net revenue reduces it).
    pub spent: f64,
    /// Cumulative debt magnitude. Never negative.
    pub total_debt: f64,
    /// Annual interest line, `total_debt * INTEREST_RATE`.
    pub interest_cost: f64,
    pub debt_added_this_period: f64,
    pub periods: Vec<PeriodSummary>,
}

impl BudgetLedger {
    pub fn new() -> Self {
        Self {
            available: defines::ANNUAL_BUDGET,
            spent: 0.0,
            total_debt: 0.0,
            interest_cost: 0.0,
            debt_added_this_period: 0.0,
            periods: Vec::new(),
        }
    }

    /// Book the aggregate cost of one decision/event batch.
    ///
    /// Cost within the available budget is simply spent; any shortfall
    /// consumes the budget to zero and becomes new debt. Negative cost is
    /// net revenue and refills the period budget. Returns the debt added.
    pub fn apply_cost(&mut self, cost: f64) -> f64 {
        if cost <= self.available {
            self.available -= cost;
            self.spent += cost;
            0.0
        } else {
            let shortfall = cost - self.available;
            self.spent += cost;
            self.available = 0.0;
            self.add_debt(shortfall);
            shortfall
        }
    }

    /// Grow cumulative debt and refresh the interest line.
    pub fn add_debt(&mut self, amount: f64) {
        self.total_debt += amount;
        self.debt_added_this_period += amount;
        self.interest_cost = self.total_debt * defines::INTEREST_RATE;
    }

    /// Close the current period and reset to the annual allotment.
    ///
    /// Does not touch cumulative debt or interest.
    pub fn rollover(&mut self, closing_year: i32) {
        self.periods.push(PeriodSummary {
            year: closing_year,
            spent: self.spent,
            debt_added: self.debt_added_this_period,
            closing_debt: self.total_debt,
        });
        self.available = defines::ANNUAL_BUDGET;
        self.spent = 0.0;
        self.debt_added_this_period = 0.0;
    }
}

impl Default for BudgetLedger {
    fn default() -> Self {
        Self::new()
    }
}

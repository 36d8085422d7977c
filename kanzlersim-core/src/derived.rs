//! Derived-metric calculators.
//!
//! Every formula here is a pure function of explicit inputs. The live
//! mutation path and the history replayer both call these same functions;
//! the arithmetic exists exactly once, so the two paths cannot diverge.

use crate::defines::{climate, income};
use crate::metrics::Metrics;

/// CO2 reduction path percentage from the cumulative running total.
///
/// The path is always recomputed from the total, never incremented on its
/// own, to avoid drift between the two representations.
pub fn co2_path_from_tons(cumulative_tons: f64) -> f64 {
    (50.0 + cumulative_tons / climate::TONS_PER_PATH_POINT).clamp(0.0, 100.0)
}

/// Apply a direct income delta, capped at ±4% of the previous income.
///
/// `previous` is passed explicitly so callers on different paths can use
/// different baselines without touching shared state.
pub fn apply_income_delta(previous: f64, delta: f64) -> f64 {
    let cap = previous * income::MAX_GAIN;
    let bounded = delta.clamp(-cap, cap);
    (previous + bounded).clamp(income::FLOOR, income::CEILING)
}

/// Year-over-year median income drift.
///
/// Three inputs: growth (scaled, capped at +4% of the previous income),
/// unemployment deviation from the 3% baseline, and debt load in billions.
/// The net delta is bounded to [-2%, +4%] of the previous income, and the
/// result to the absolute floor/ceiling.
pub fn drift_income(previous: f64, growth: f64, unemployment: f64, debt_billions: f64) -> f64 {
    let growth_gain =
        (previous * growth * income::GROWTH_FACTOR).min(previous * income::MAX_GAIN);
    let unemployment_penalty =
        previous * (unemployment - income::UNEMPLOYMENT_BASELINE) * income::UNEMPLOYMENT_FACTOR;
    let debt_penalty = previous * debt_billions * income::DEBT_FACTOR;

    let net = (growth_gain - unemployment_penalty - debt_penalty).clamp(
        -previous * income::MAX_YEARLY_LOSS,
        previous * income::MAX_GAIN,
    );
    (previous + net).clamp(income::FLOOR, income::CEILING)
}

/// Weights of the eleven score components. Sum to 1.0.
const WEIGHT_POPULARITY: f64 = 0.12;
const WEIGHT_PARTNER_A: f64 = 0.06;
const WEIGHT_PARTNER_B: f64 = 0.06;
const WEIGHT_UNEMPLOYMENT: f64 = 0.12;
const WEIGHT_GROWTH: f64 = 0.12;
const WEIGHT_INVESTMENT: f64 = 0.08;
const WEIGHT_INCOME: f64 = 0.12;
const WEIGHT_DEBT: f64 = 0.08;
const WEIGHT_SECURITY: f64 = 0.06;
const WEIGHT_ENERGY: f64 = 0.08;
const WEIGHT_CO2: f64 = 0.10;

#[cfg(test)]
pub(crate) const WEIGHT_SUM: f64 = WEIGHT_POPULARITY
    + WEIGHT_PARTNER_A
    + WEIGHT_PARTNER_B
    + WEIGHT_UNEMPLOYMENT
    + WEIGHT_GROWTH
    + WEIGHT_INVESTMENT
    + WEIGHT_INCOME
    + WEIGHT_DEBT
    + WEIGHT_SECURITY
    + WEIGHT_ENERGY
    + WEIGHT_CO2;

/// Normalized component, clamped so no single extreme metric dominates.
fn component(value: f64) -> f64 {
    value.clamp(5.0, 95.0)
}

/// Overall weighted score over eleven normalized components.
///
/// Each raw metric is first rescaled so the game-start state maps to 50,
/// then clamped to [5, 95] before weighting. The result stays in [5, 98].
pub fn overall_score(m: &Metrics) -> f64 {
    // 5% unemployment -> 50; every point below gains 10.
    let unemployment_score = (10.0 - m.unemployment) * 10.0;
    // Growth pivots around 1.0%.
    let growth_score = 50.0 + (m.growth - 1.0) * 12.5;
    // Relative deviation from the initial income, 4% deviation = 10 points.
    let income_score = 50.0 + (m.median_income - income::INITIAL) / income::INITIAL * 250.0;
    // One point lost per 10 billion of debt.
    let debt_score = 50.0 + (m.debt / 1.0e9) * 0.1;

    WEIGHT_POPULARITY * component(m.popularity)
        + WEIGHT_PARTNER_A * component(m.coalition_partner_a)
        + WEIGHT_PARTNER_B * component(m.coalition_partner_b)
        + WEIGHT_UNEMPLOYMENT * component(unemployment_score)
        + WEIGHT_GROWTH * component(growth_score)
        + WEIGHT_INVESTMENT * component(m.investment_attractiveness)
        + WEIGHT_INCOME * component(income_score)
        + WEIGHT_DEBT * component(debt_score)
        + WEIGHT_SECURITY * component(m.security_capacity)
        + WEIGHT_ENERGY * component(m.energy_security)
        + WEIGHT_CO2 * component(m.co2_reduction_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricId;

    #[test]
    fn test_weights_sum_to_one() {
        assert!((WEIGHT_SUM - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_co2_path_formula() {
        assert_eq!(co2_path_from_tons(0.0), 50.0);
        assert_eq!(co2_path_from_tons(50_000_000.0), 55.0);
        assert_eq!(co2_path_from_tons(-100_000_000.0), 40.0);
        // Saturates at the interval ends.
        assert_eq!(co2_path_from_tons(1.0e10), 100.0);
        assert_eq!(co2_path_from_tons(-1.0e10), 0.0);
    }

    #[test]
    fn test_income_delta_cap() {
        // +4% of 40,000 is 1,600.
        assert_eq!(apply_income_delta(40_000.0, 10_000.0), 41_600.0);
        assert_eq!(apply_income_delta(40_000.0, -10_000.0), 38_400.0);
        assert_eq!(apply_income_delta(40_000.0, 500.0), 40_500.0);
    }

    #[test]
    fn test_income_absolute_bounds() {
        assert_eq!(apply_income_delta(income::FLOOR, -10_000.0), income::FLOOR);
        assert_eq!(
            apply_income_delta(income::CEILING, 10_000.0),
            income::CEILING
        );
    }

    #[test]
    fn test_drift_gains_with_growth() {
        let base = drift_income(40_000.0, 0.0, 3.0, 0.0);
        let boom = drift_income(40_000.0, 3.0, 3.0, 0.0);
        assert_eq!(base, 40_000.0);
        assert!(boom > base);
        // 3.0 growth * 0.5% = 1.5% gain.
        assert!((boom - 40_600.0).abs() < 1e-9);
    }

    #[test]
    fn test_drift_loss_floor() {
        // Catastrophic inputs still lose at most 2% per year.
        let after = drift_income(40_000.0, -6.0, 15.0, 1_000.0);
        assert!((after - 39_200.0).abs() < 1e-9);
    }

    #[test]
    fn test_drift_gain_cap() {
        // Even absurd growth gains at most 4% per year.
        let after = drift_income(40_000.0, 8.0, 2.0, 0.0);
        assert!(after <= 41_600.0 + 1e-9);
    }

    #[test]
    fn test_initial_score_is_fifty() {
        let score = overall_score(&Metrics::initial());
        assert!((score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_stays_bounded() {
        let mut best = Metrics::initial();
        for id in MetricId::ALL {
            let (min, max) = id.range();
            // Push every metric to its "good" end.
            *best.get_mut(id) = match id {
                MetricId::Unemployment | MetricId::Debt => min,
                _ => max,
            };
        }
        let mut worst = Metrics::initial();
        for id in MetricId::ALL {
            let (min, max) = id.range();
            *worst.get_mut(id) = match id {
                MetricId::Unemployment => max,
                MetricId::Debt => min,
                _ => min,
            };
        }

        let hi = overall_score(&best);
        let lo = overall_score(&worst);
        assert!(hi <= 98.0, "score {hi} above ceiling");
        assert!(lo >= 5.0, "score {lo} below floor");
        assert!(hi > lo);
    }

    #[test]
    fn test_single_extreme_metric_cannot_dominate() {
        let mut m = Metrics::initial();
        m.debt = -2.0e12;
        let score = overall_score(&m);
        // Debt component saturates at 5 with weight 0.08.
        assert!((score - (50.0 - 0.08 * 45.0)).abs() < 1e-9);
    }
}

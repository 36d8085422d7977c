//! The effect applicator.
//!
//! Live decision application and history replay both funnel through
//! [`apply_effect_batch`] and [`apply_year_rollover`]. Keeping a single
//! code path for the effect semantics is the invariant the rest of the
//! engine hangs on: the replayer must reproduce live state byte for byte.

use crate::budget::BudgetLedger;
use crate::catalog::Effect;
use crate::defines::climate;
use crate::derived;
use crate::metrics::{MetricId, Metrics};

/// Resolve conditional multipliers against the pre-batch metric snapshot.
///
/// Returns the flattened effect list that is recorded in the logs: deltas
/// with multipliers already applied, conditionals stripped. Replay applies
/// these verbatim without re-evaluating conditions.
pub fn resolve_effects(effects: &[Effect], pre_batch: &Metrics) -> Vec<Effect> {
    effects
        .iter()
        .map(|effect| {
            let delta = match &effect.conditional {
                Some(c) if c.op.holds(pre_batch.get(c.metric), c.value) => {
                    effect.delta * c.multiplier
                }
                _ => effect.delta,
            };
            Effect {
                metric: effect.metric,
                delta,
                conditional: None,
            }
        })
        .collect()
}

/// Apply one resolved effect batch to the metric store and ledger.
///
/// `prev_income` is the baseline for the ±4% income cap; callers pass the
/// income current *before* this batch. For an event fired inside a decision
/// step that is the post-decision income; the replayer's rolling previous
/// income is the same value by construction.
///
/// Routing rules:
/// - CO2 effects (tons or path points) update the cumulative ton total;
///   the path percentage is recomputed from that total afterwards.
/// - Debt effects always grow the debt magnitude, via the ledger.
/// - Income effects accumulate and are applied once, capped.
/// - Effects on purely derived metrics (interest, overall score) are
///   ignored; both are recomputed from their sources below.
///
/// Clamping runs once for the whole batch, after which the derived fields
/// are recomputed from their (clamped) sources.
pub fn apply_effect_batch(
    metrics: &mut Metrics,
    ledger: &mut BudgetLedger,
    effects: &[Effect],
    total_cost: f64,
    prev_income: f64,
) {
    let mut income_delta = 0.0;

    for effect in effects {
        match effect.metric {
            MetricId::Co2TonsReduced => {
                metrics.co2_tons_reduced += effect.delta;
            }
            MetricId::Co2ReductionPath => {
                metrics.co2_tons_reduced += effect.delta * climate::TONS_PER_PATH_POINT;
            }
            MetricId::Debt => {
                ledger.add_debt(effect.delta.abs());
            }
            MetricId::MedianIncome => {
                income_delta += effect.delta;
            }
            MetricId::InterestCost | MetricId::OverallScore => {
                log::warn!(
                    "ignoring direct effect on derived metric {:?}",
                    effect.metric
                );
            }
            id => *metrics.get_mut(id) += effect.delta,
        }
    }

    if income_delta != 0.0 {
        metrics.median_income = derived::apply_income_delta(prev_income, income_delta);
    }

    if total_cost != 0.0 {
        ledger.apply_cost(total_cost);
    }

    metrics.debt = -ledger.total_debt;
    metrics.interest_cost = ledger.interest_cost;
    metrics.clamp_all();
    metrics.co2_reduction_path = derived::co2_path_from_tons(metrics.co2_tons_reduced);
    metrics.overall_score = derived::overall_score(metrics);
}

/// Close one simulated year on both the ledger and the metric store.
///
/// Budget and spent reset to the annual allotment; cumulative debt and
/// interest are untouched. Median income drifts by the year formula.
pub fn apply_year_rollover(metrics: &mut Metrics, ledger: &mut BudgetLedger, closing_year: i32) {
    ledger.rollover(closing_year);

    let debt_billions = ledger.total_debt / 1.0e9;
    metrics.median_income = derived::drift_income(
        metrics.median_income,
        metrics.growth,
        metrics.unemployment,
        debt_billions,
    );
    metrics.clamp_all();
    metrics.overall_score = derived::overall_score(metrics);
}

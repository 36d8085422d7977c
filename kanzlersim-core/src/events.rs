//! The conditional event trigger engine.

use crate::catalog::{Effect, EventCatalog, EventDef, EventId};
use crate::effects::resolve_effects;
use crate::metrics::Metrics;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Immutable log record of one fired event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggeredEvent {
    pub event_id: EventId,
    pub year: i32,
    /// Number of completed decisions when the event fired. Orders the event
    /// between decisions during replay and yields its half-step chart
    /// position; it carries no other semantic weight.
    pub decision_index: u32,
    /// Flattened effects, conditionals already resolved at fire time.
    pub effects: Vec<Effect>,
    /// Human-readable trigger reason.
    pub reason: String,
}

/// Roll the event catalog against the post-batch metrics.
///
/// Every catalog event not yet in the triggered log has its conditions
/// evaluated as a conjunction; if all hold, one uniform draw against the
/// event's probability decides. An event id fires at most once per game.
pub fn check_triggers(
    catalog: &EventCatalog,
    metrics: &Metrics,
    year: i32,
    decision_index: u32,
    triggered: &[TriggeredEvent],
    rng: &mut ChaCha8Rng,
) -> Vec<TriggeredEvent> {
    let fired: FxHashSet<&str> = triggered.iter().map(|e| e.event_id.as_str()).collect();
    let mut out = Vec::new();

    for def in catalog.iter() {
        if fired.contains(def.id.as_str()) {
            continue;
        }
        if !def.conditions.iter().all(|c| c.holds(metrics)) {
            continue;
        }
        let roll: f64 = rng.gen();
        if roll < def.probability {
            log::info!("event `{}` fired in {} (roll {:.3})", def.id, year, roll);
            out.push(TriggeredEvent {
                event_id: def.id.clone(),
                year,
                decision_index,
                effects: resolve_effects(&def.effects, metrics),
                reason: trigger_reason(def),
            });
        }
    }

    out
}

fn trigger_reason(def: &EventDef) -> String {
    let conditions: Vec<String> = def.conditions.iter().map(|c| c.describe()).collect();
    format!("{}: {}", def.title, conditions.join(" und "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ConditionOp, TriggerCondition};
    use crate::metrics::MetricId;
    use rand::SeedableRng;

    fn always_event(id: &str) -> EventDef {
        EventDef {
            id: id.into(),
            title: format!("Event {id}"),
            probability: 1.0,
            conditions: vec![TriggerCondition {
                metric: MetricId::Popularity,
                op: ConditionOp::Gt,
                value: 0.0,
            }],
            effects: vec![Effect {
                metric: MetricId::Popularity,
                delta: -1.0,
                conditional: None,
            }],
        }
    }

    #[test]
    fn test_certain_event_fires() {
        let catalog = EventCatalog::new(vec![always_event("a")]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let fired = check_triggers(&catalog, &Metrics::initial(), 2025, 1, &[], &mut rng);

        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].event_id, "a");
        assert_eq!(fired[0].decision_index, 1);
        assert!(fired[0].reason.contains("Beliebtheit"));
    }

    #[test]
    fn test_event_fires_at_most_once() {
        let catalog = EventCatalog::new(vec![always_event("a")]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let first = check_triggers(&catalog, &Metrics::initial(), 2025, 1, &[], &mut rng);
        let second = check_triggers(&catalog, &Metrics::initial(), 2026, 2, &first, &mut rng);

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn test_conditions_are_conjunctive() {
        let mut def = always_event("a");
        def.conditions.push(TriggerCondition {
            metric: MetricId::Unemployment,
            op: ConditionOp::Gt,
            value: 10.0,
        });
        let catalog = EventCatalog::new(vec![def]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        // Initial unemployment is 5.0, so the second condition fails.
        let fired = check_triggers(&catalog, &Metrics::initial(), 2025, 1, &[], &mut rng);
        assert!(fired.is_empty());
    }

    #[test]
    fn test_zero_probability_never_fires() {
        let mut def = always_event("a");
        def.probability = 0.0;
        let catalog = EventCatalog::new(vec![def]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        for _ in 0..50 {
            let fired = check_triggers(&catalog, &Metrics::initial(), 2025, 1, &[], &mut rng);
            assert!(fired.is_empty());
        }
    }

    #[test]
    fn test_effects_resolved_against_fire_time_metrics() {
        let mut def = always_event("a");
        def.effects = vec![Effect {
            metric: MetricId::Popularity,
            delta: -2.0,
            conditional: Some(crate::catalog::Conditional {
                metric: MetricId::Unemployment,
                op: ConditionOp::Gt,
                value: 8.0,
                multiplier: 2.0,
            }),
        }];
        let catalog = EventCatalog::new(vec![def]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let mut metrics = Metrics::initial();
        metrics.unemployment = 9.0;
        let fired = check_triggers(&catalog, &metrics, 2025, 1, &[], &mut rng);

        assert_eq!(fired[0].effects[0].delta, -4.0);
        assert!(fired[0].effects[0].conditional.is_none());
    }

    #[test]
    fn test_same_seed_same_rolls() {
        let catalog = EventCatalog::new(vec![EventDef {
            probability: 0.5,
            ..always_event("a")
        }]);

        let mut rng_a = ChaCha8Rng::seed_from_u64(7);
        let mut rng_b = ChaCha8Rng::seed_from_u64(7);
        let a = check_triggers(&catalog, &Metrics::initial(), 2025, 1, &[], &mut rng_a);
        let b = check_triggers(&catalog, &Metrics::initial(), 2025, 1, &[], &mut rng_b);

        assert_eq!(a, b);
    }
}

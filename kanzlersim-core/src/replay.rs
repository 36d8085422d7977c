//! Deterministic history reconstruction from the decision and event logs.
//!
//! The replayer never reads live mutable state: it starts from the initial
//! constants and re-derives every snapshot through the same
//! [`crate::effects`] functions the live path uses. Calling it twice
//! against the same logs yields identical output.

use crate::budget::BudgetLedger;
use crate::defines::term;
use crate::effects::{apply_effect_batch, apply_year_rollover};
use crate::events::TriggeredEvent;
use crate::metrics::Metrics;
use crate::state::CompletedDecision;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of log entry behind a chart point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    Initial,
    Decision,
    Event,
}

/// One chart-ready snapshot of the replayed series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    /// Decisions sit at integer positions (1-based); an event fired after
    /// decision k sits at k + 0.5. Display ordering only.
    pub position: f64,
    pub year: i32,
    pub kind: HistoryKind,
    /// Decision or event id.
    pub label: String,
    pub metrics: Metrics,
}

/// Rolling replay cursor: the same walk drives both the chart series and
/// the final-state reconstruction, so there is exactly one interleaving.
struct ReplayCursor {
    metrics: Metrics,
    ledger: BudgetLedger,
    /// First year of the currently open budget period.
    open_year: i32,
}

impl ReplayCursor {
    fn new() -> Self {
        Self {
            metrics: Metrics::initial(),
            ledger: BudgetLedger::new(),
            open_year: term::START_YEAR,
        }
    }

    /// Apply the rollovers for every year boundary up to `year`.
    fn roll_to(&mut self, year: i32) {
        while self.open_year < year {
            apply_year_rollover(&mut self.metrics, &mut self.ledger, self.open_year);
            self.open_year += 1;
        }
    }

    fn apply_decision(&mut self, decision: &CompletedDecision) {
        self.roll_to(decision.year);
        let prev_income = self.metrics.median_income;
        apply_effect_batch(
            &mut self.metrics,
            &mut self.ledger,
            &decision.effects,
            decision.total_cost,
            prev_income,
        );
    }

    fn apply_event(&mut self, event: &TriggeredEvent) {
        let prev_income = self.metrics.median_income;
        apply_effect_batch(
            &mut self.metrics,
            &mut self.ledger,
            &event.effects,
            0.0,
            prev_income,
        );
    }
}

fn events_by_decision(events: &[TriggeredEvent]) -> BTreeMap<u32, Vec<&TriggeredEvent>> {
    let mut grouped: BTreeMap<u32, Vec<&TriggeredEvent>> = BTreeMap::new();
    for event in events {
        grouped.entry(event.decision_index).or_default().push(event);
    }
    grouped
}

/// Rebuild the full ordered metric series from the immutable logs.
pub fn replay_history(
    decisions: &[CompletedDecision],
    events: &[TriggeredEvent],
) -> Vec<HistoryPoint> {
    let mut cursor = ReplayCursor::new();
    let grouped = events_by_decision(events);

    let mut points = Vec::with_capacity(decisions.len() + events.len() + 1);
    points.push(HistoryPoint {
        position: 0.0,
        year: term::START_YEAR,
        kind: HistoryKind::Initial,
        label: "start".to_string(),
        metrics: cursor.metrics.clone(),
    });

    for (i, decision) in decisions.iter().enumerate() {
        let index = (i + 1) as u32;
        cursor.apply_decision(decision);
        points.push(HistoryPoint {
            position: index as f64,
            year: decision.year,
            kind: HistoryKind::Decision,
            label: decision.decision_id.clone(),
            metrics: cursor.metrics.clone(),
        });

        if let Some(fired) = grouped.get(&index) {
            for event in fired {
                cursor.apply_event(event);
                points.push(HistoryPoint {
                    position: index as f64 + 0.5,
                    year: event.year,
                    kind: HistoryKind::Event,
                    label: event.event_id.clone(),
                    metrics: cursor.metrics.clone(),
                });
            }
        }
    }

    points
}

/// Replayed state advanced through every rollover up to `open_year`, the
/// year the live session currently has open. Used to compare replayed and
/// live state even after trailing period advances.
pub fn replay_final_state(
    decisions: &[CompletedDecision],
    events: &[TriggeredEvent],
    open_year: i32,
) -> (Metrics, BudgetLedger) {
    let mut cursor = ReplayCursor::new();
    let grouped = events_by_decision(events);

    for (i, decision) in decisions.iter().enumerate() {
        cursor.apply_decision(decision);
        if let Some(fired) = grouped.get(&((i + 1) as u32)) {
            for event in fired {
                cursor.apply_event(event);
            }
        }
    }
    cursor.roll_to(open_year);

    (cursor.metrics, cursor.ledger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Effect;
    use crate::metrics::MetricId;

    fn decision(id: &str, year: i32, cost: f64, effects: Vec<Effect>) -> CompletedDecision {
        CompletedDecision {
            decision_id: id.into(),
            option_ids: vec![format!("{id}_opt")],
            year,
            effects,
            total_cost: cost,
        }
    }

    fn effect(metric: MetricId, delta: f64) -> Effect {
        Effect {
            metric,
            delta,
            conditional: None,
        }
    }

    #[test]
    fn test_empty_logs_yield_initial_point() {
        let points = replay_history(&[], &[]);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].kind, HistoryKind::Initial);
        assert_eq!(points[0].metrics, Metrics::initial());
    }

    #[test]
    fn test_replay_is_deterministic() {
        let decisions = vec![
            decision(
                "a",
                2025,
                15.0e9,
                vec![effect(MetricId::Popularity, 2.0)],
            ),
            decision(
                "b",
                2026,
                20.0e9,
                vec![effect(MetricId::Growth, -0.5)],
            ),
        ];
        let events = vec![TriggeredEvent {
            event_id: "ev".into(),
            year: 2026,
            decision_index: 2,
            effects: vec![effect(MetricId::Popularity, -1.0)],
            reason: "test".into(),
        }];

        let a = replay_history(&decisions, &events);
        let b = replay_history(&decisions, &events);
        assert_eq!(a, b);

        let json_a = serde_json::to_string(&a).unwrap();
        let json_b = serde_json::to_string(&b).unwrap();
        assert_eq!(json_a, json_b);
    }

    #[test]
    fn test_replay_does_not_mutate_logs() {
        let decisions = vec![decision(
            "a",
            2025,
            1.0e9,
            vec![effect(MetricId::Popularity, 2.0)],
        )];
        let before = decisions.clone();
        let _ = replay_history(&decisions, &[]);
        assert_eq!(decisions, before);
    }

    #[test]
    fn test_event_positions_are_half_steps() {
        let decisions = vec![decision("a", 2025, 0.0, vec![])];
        let events = vec![TriggeredEvent {
            event_id: "ev".into(),
            year: 2025,
            decision_index: 1,
            effects: vec![],
            reason: "test".into(),
        }];

        let points = replay_history(&decisions, &events);
        assert_eq!(points.len(), 3);
        assert_eq!(points[1].position, 1.0);
        assert_eq!(points[1].kind, HistoryKind::Decision);
        assert_eq!(points[2].position, 1.5);
        assert_eq!(points[2].kind, HistoryKind::Event);
    }

    #[test]
    fn test_year_gap_applies_rollovers() {
        // A decision in 2027 after one in 2025 crosses two year boundaries;
        // the budget must have been reset twice and income drifted twice.
        let decisions = vec![
            decision("a", 2025, 25.0e9, vec![]),
            decision("b", 2027, 0.0, vec![]),
        ];

        let (metrics, ledger) = replay_final_state(&decisions, &[], 2027);

        assert_eq!(ledger.periods.len(), 2);
        assert_eq!(ledger.available, crate::defines::budget::ANNUAL_BUDGET);
        // Initial growth 1.0 against 5.0 unemployment drifts income up a
        // little each year.
        assert!(metrics.median_income > crate::defines::income::INITIAL);
    }

    #[test]
    fn test_final_state_includes_trailing_rollovers() {
        let decisions = vec![decision("a", 2025, 10.0e9, vec![])];

        let (_, ledger_at_2025) = replay_final_state(&decisions, &[], 2025);
        let (_, ledger_at_2026) = replay_final_state(&decisions, &[], 2026);

        assert_eq!(ledger_at_2025.available, 15.0e9);
        assert_eq!(ledger_at_2026.available, 25.0e9);
        assert_eq!(ledger_at_2026.periods.len(), 1);
    }
}

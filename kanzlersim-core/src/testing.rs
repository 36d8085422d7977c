//! Builders and fixtures for tests.

use crate::catalog::{
    Decision, DecisionCatalog, DecisionCategory, DecisionOption, Effect, EventCatalog,
    Timeframe,
};
use crate::metrics::MetricId;
use crate::polls::Party;
use crate::session::{GameSession, SessionConfig};

pub fn effect(metric: MetricId, delta: f64) -> Effect {
    Effect {
        metric,
        delta,
        conditional: None,
    }
}

pub fn option(id: &str, cost: f64, effects: Vec<Effect>) -> DecisionOption {
    DecisionOption {
        id: id.into(),
        title: id.into(),
        cost,
        effects,
        delayed_effects: vec![],
        conflicts: vec![],
    }
}

pub struct CatalogBuilder {
    decisions: Vec<Decision>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self {
            decisions: Vec::new(),
        }
    }

    pub fn with_decision(
        mut self,
        id: &str,
        category: DecisionCategory,
        options: Vec<DecisionOption>,
    ) -> Self {
        self.decisions.push(Decision {
            id: id.into(),
            title: id.into(),
            category,
            timeframe: Timeframe { from: 2025, to: 2036 },
            options,
        });
        self
    }

    /// `n` one-option no-effect decisions, ids `d0..`, for pacing tests.
    pub fn with_simple_decisions(mut self, n: usize) -> Self {
        for i in 0..n {
            let id = format!("d{i}");
            self.decisions.push(Decision {
                id: id.clone(),
                title: id.clone(),
                category: DecisionCategory::Wirtschaft,
                timeframe: Timeframe { from: 2025, to: 2036 },
                options: vec![option(&format!("{id}_opt"), 0.0, vec![])],
            });
        }
        self
    }

    pub fn build(self) -> DecisionCatalog {
        DecisionCatalog::new(self.decisions)
    }
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A session with the given catalogs, no events, SPD chancellor, fixed seed.
pub fn session_with_decisions(catalog: DecisionCatalog) -> GameSession {
    GameSession::new(
        SessionConfig {
            player_party: Party::Spd,
            seed: 0,
        },
        catalog,
        EventCatalog::new(vec![]),
    )
}

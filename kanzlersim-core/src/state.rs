//! Complete simulation state for one game session.

use crate::budget::BudgetLedger;
use crate::catalog::{DecisionId, Effect, OptionId};
use crate::clock::SimClock;
use crate::defines::term;
use crate::events::TriggeredEvent;
use crate::metrics::{MetricId, Metrics};
use crate::polls::PartyPolls;
use crate::stability::GameOver;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Immutable log record of one applied decision. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedDecision {
    pub decision_id: DecisionId,
    pub option_ids: Vec<OptionId>,
    pub year: i32,
    /// Flattened effects with conditional multipliers already applied.
    pub effects: Vec<Effect>,
    pub total_cost: f64,
}

/// Everything one player's simulation owns.
///
/// Created once at game start from fixed initial constants, mutated in
/// place by every applied decision/event, and reset to the constants on
/// explicit game reset. Fully serializable; this is the snapshot the
/// excluded persistence layer consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub metrics: Metrics,
    pub ledger: BudgetLedger,
    pub polls: PartyPolls,
    /// Append-only decision log.
    pub decisions: Vec<CompletedDecision>,
    /// Append-only event log.
    pub events: Vec<TriggeredEvent>,
    pub clock: SimClock,
    pub rng_seed: u64,
    /// Current RNG state; advances with every event roll.
    pub rng: ChaCha8Rng,
    /// First year of the currently open budget period. Guards rollover
    /// idempotence: repeated ticks within one year are no-ops.
    pub open_year: i32,
    pub pending_yearly_evaluation: bool,
    pub pending_legislature_evaluation: bool,
    pub game_over: Option<GameOver>,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self {
            metrics: Metrics::initial(),
            ledger: BudgetLedger::new(),
            polls: PartyPolls::initial(),
            decisions: Vec::new(),
            events: Vec::new(),
            clock: SimClock::new(term::START_YEAR),
            rng_seed: seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            open_year: term::START_YEAR,
            pending_yearly_evaluation: false,
            pending_legislature_evaluation: false,
            game_over: None,
        }
    }

    pub fn year(&self) -> i32 {
        self.clock.year()
    }

    pub fn decisions_in_year(&self, year: i32) -> usize {
        self.decisions.iter().filter(|d| d.year == year).count()
    }

    /// Serialize the full state for save/load.
    pub fn to_snapshot_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_snapshot_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Deterministic checksum over the full state.
    ///
    /// Identical states produce identical checksums; used for divergence
    /// debugging between the live path and the replayer.
    pub fn checksum(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        for id in MetricId::ALL {
            self.metrics.get(id).to_bits().hash(&mut hasher);
        }

        self.ledger.available.to_bits().hash(&mut hasher);
        self.ledger.spent.to_bits().hash(&mut hasher);
        self.ledger.total_debt.to_bits().hash(&mut hasher);
        self.ledger.interest_cost.to_bits().hash(&mut hasher);
        self.ledger.periods.len().hash(&mut hasher);

        for (party, share) in self.polls.iter() {
            (party as u8).hash(&mut hasher);
            share.to_bits().hash(&mut hasher);
        }

        for decision in &self.decisions {
            decision.decision_id.hash(&mut hasher);
            decision.option_ids.hash(&mut hasher);
            decision.year.hash(&mut hasher);
            decision.total_cost.to_bits().hash(&mut hasher);
            for effect in &decision.effects {
                effect.metric.hash(&mut hasher);
                effect.delta.to_bits().hash(&mut hasher);
            }
        }

        for event in &self.events {
            event.event_id.hash(&mut hasher);
            event.year.hash(&mut hasher);
            event.decision_index.hash(&mut hasher);
            for effect in &event.effects {
                effect.metric.hash(&mut hasher);
                effect.delta.to_bits().hash(&mut hasher);
            }
        }

        self.clock.elapsed.hash(&mut hasher);
        self.clock.paused.hash(&mut hasher);
        self.rng_seed.hash(&mut hasher);
        self.rng.get_word_pos().hash(&mut hasher);
        self.open_year.hash(&mut hasher);

        hasher.finish()
    }
}

//! Public operations on one simulation session.
//!
//! A [`GameSession`] is an explicitly owned object: the caller controls its
//! lifecycle (create, mutate, reset). There are no ambient singletons.

use crate::catalog::{Decision, DecisionCatalog, DecisionOption, Effect, EventCatalog};
use crate::defines::term;
use crate::effects::{apply_effect_batch, apply_year_rollover, resolve_effects};
use crate::events::{check_triggers, TriggeredEvent};
use crate::metrics::Metrics;
use crate::polls::Party;
use crate::replay::{replay_final_state, replay_history, HistoryPoint};
use crate::stability::{evaluate_stability, GameOver};
use crate::state::{CompletedDecision, GameState};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session configuration: who governs, and the RNG seed for event rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    pub player_party: Party,
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            player_party: Party::Spd,
            seed: 0,
        }
    }
}

/// Rejections of a decision submission.
///
/// All rejections are local and side-effect-free: a failed submission
/// leaves the state untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecisionError {
    #[error("unbekannte Entscheidung `{0}`")]
    UnknownDecision(String),
    #[error("unbekannte Option `{option}` in Entscheidung `{decision}`")]
    UnknownOption { decision: String, option: String },
    #[error("keine Option gewählt")]
    EmptySelection,
    #[error("Optionen `{a}` und `{b}` schließen sich aus")]
    ConflictingOptions { a: String, b: String },
    #[error("Entscheidung `{0}` wurde bereits getroffen")]
    AlreadyDecided(String),
    #[error("Entscheidung `{0}` steht im aktuellen Jahr nicht an")]
    NotInTimeframe(String),
    #[error("Limit von {limit} Entscheidungen im Jahr {year} erreicht")]
    DecisionLimitReached { limit: usize, year: i32 },
    #[error("die Regierung ist gestürzt: {0}")]
    GameOverReached(GameOver),
}

/// What one applied decision did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionOutcome {
    pub completed: CompletedDecision,
    pub fired_events: Vec<TriggeredEvent>,
    pub game_over: Option<GameOver>,
}

/// One player's simulation: catalogs plus mutable state.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    decisions: DecisionCatalog,
    events: EventCatalog,
    state: GameState,
}

impl GameSession {
    pub fn new(config: SessionConfig, decisions: DecisionCatalog, events: EventCatalog) -> Self {
        Self {
            config,
            decisions,
            events,
            state: GameState::new(config.seed),
        }
    }

    /// Session with the built-in demo catalogs.
    pub fn with_builtin_catalogs(config: SessionConfig) -> Self {
        Self::new(config, DecisionCatalog::builtin(), EventCatalog::builtin())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn metrics(&self) -> &Metrics {
        &self.state.metrics
    }

    pub fn game_over(&self) -> Option<GameOver> {
        self.state.game_over
    }

    /// Submit one decision with the selected option ids.
    ///
    /// Validation happens completely before any mutation; a rejection is a
    /// no-op. On success the batch is applied, polls swing, event triggers
    /// roll, and stability is re-evaluated.
    #[tracing::instrument(skip(self, selected), fields(decision = decision_id))]
    pub fn apply_decision(
        &mut self,
        decision_id: &str,
        selected: &[&str],
    ) -> Result<DecisionOutcome, DecisionError> {
        if let Some(over) = self.state.game_over {
            return Err(DecisionError::GameOverReached(over));
        }
        let decision = self
            .decisions
            .get(decision_id)
            .ok_or_else(|| DecisionError::UnknownDecision(decision_id.to_string()))?;
        if selected.is_empty() {
            return Err(DecisionError::EmptySelection);
        }
        if self.state.decisions.iter().any(|d| d.decision_id == decision_id) {
            return Err(DecisionError::AlreadyDecided(decision_id.to_string()));
        }
        let year = self.state.year();
        if !decision.timeframe.contains(year) {
            return Err(DecisionError::NotInTimeframe(decision_id.to_string()));
        }

        let mut options: Vec<&DecisionOption> = Vec::with_capacity(selected.len());
        for id in selected {
            let option = decision
                .options
                .iter()
                .find(|o| &o.id == id)
                .ok_or_else(|| DecisionError::UnknownOption {
                    decision: decision_id.to_string(),
                    option: id.to_string(),
                })?;
            options.push(option);
        }
        for (i, a) in options.iter().enumerate() {
            for b in &options[i + 1..] {
                if a.conflicts.contains(&b.id) || b.conflicts.contains(&a.id) {
                    return Err(DecisionError::ConflictingOptions {
                        a: a.id.clone(),
                        b: b.id.clone(),
                    });
                }
            }
        }
        if self.state.decisions_in_year(year) >= term::MAX_DECISIONS_PER_YEAR {
            return Err(DecisionError::DecisionLimitReached {
                limit: term::MAX_DECISIONS_PER_YEAR,
                year,
            });
        }

        // Validation done; everything below mutates.
        let pre_batch = self.state.metrics.clone();
        let raw: Vec<Effect> = options
            .iter()
            .flat_map(|o| o.effects.iter().cloned())
            .collect();
        let effects = resolve_effects(&raw, &pre_batch);
        let total_cost: f64 = options.iter().map(|o| o.cost).sum();

        apply_effect_batch(
            &mut self.state.metrics,
            &mut self.state.ledger,
            &effects,
            total_cost,
            pre_batch.median_income,
        );

        self.state
            .polls
            .apply_decision_swing(self.config.player_party, decision.category, &options);

        let completed = CompletedDecision {
            decision_id: decision_id.to_string(),
            option_ids: selected.iter().map(|s| s.to_string()).collect(),
            year,
            effects,
            total_cost,
        };
        self.state.decisions.push(completed.clone());

        let decision_index = self.state.decisions.len() as u32;
        let fired = check_triggers(
            &self.events,
            &self.state.metrics,
            year,
            decision_index,
            &self.state.events,
            &mut self.state.rng,
        );
        for event in &fired {
            // The income cap baseline for an event is the income as left by
            // the decision (and any earlier event in this batch).
            let prev_income = self.state.metrics.median_income;
            apply_effect_batch(
                &mut self.state.metrics,
                &mut self.state.ledger,
                &event.effects,
                0.0,
                prev_income,
            );
            self.state.events.push(event.clone());
        }

        self.state.game_over = evaluate_stability(&self.state.metrics);
        if let Some(over) = self.state.game_over {
            log::info!("game over in {}: {}", year, over);
        }

        Ok(DecisionOutcome {
            completed,
            fired_events: fired,
            game_over: self.state.game_over,
        })
    }

    /// One wall-clock second: advance the simulated calendar one day and
    /// perform any year rollover the day crossed. Idempotent with the
    /// explicit advance operations.
    pub fn tick(&mut self) {
        if self.state.game_over.is_some() {
            return;
        }
        self.state.clock.tick();
        self.run_pending_rollovers();
    }

    pub fn advance_to_end_of_year(&mut self) {
        if self.state.game_over.is_some() {
            return;
        }
        self.state.clock.advance_to_end_of_year();
        self.run_pending_rollovers();
    }

    pub fn advance_to_end_of_legislature(&mut self) {
        if self.state.game_over.is_some() {
            return;
        }
        self.state.clock.advance_to_end_of_legislature();
        self.run_pending_rollovers();
    }

    /// Apply one rollover per crossed year boundary, exactly once each.
    fn run_pending_rollovers(&mut self) {
        while self.state.open_year < self.state.clock.year() {
            let closing = self.state.open_year;
            apply_year_rollover(&mut self.state.metrics, &mut self.state.ledger, closing);
            self.state.open_year += 1;

            self.state.pending_yearly_evaluation = true;
            let years_in = closing - term::START_YEAR + 1;
            if years_in % term::LEGISLATURE_YEARS == 0 {
                self.state.pending_legislature_evaluation = true;
            }
            log::info!(
                "closed {}: spent {:.1} bn, debt {:.1} bn",
                closing,
                self.state.ledger.periods.last().map(|p| p.spent).unwrap_or(0.0) / 1.0e9,
                self.state.ledger.total_debt / 1.0e9
            );

            self.state.game_over = evaluate_stability(&self.state.metrics);
            if self.state.game_over.is_some() {
                break;
            }
        }
    }

    /// Back to the initial constants; logs cleared, RNG reseeded.
    pub fn reset(&mut self) {
        self.state = GameState::new(self.config.seed);
    }

    pub fn pause(&mut self) {
        self.state.clock.pause();
    }

    pub fn resume(&mut self) {
        self.state.clock.resume();
    }

    // --- read-only queries ---

    /// Decisions still on the table: in timeframe, not yet taken, and only
    /// while the game accepts input at all.
    pub fn available_decisions(&self) -> Vec<&Decision> {
        if self.state.game_over.is_some() || self.decisions_limit_reached() {
            return Vec::new();
        }
        let year = self.state.year();
        self.decisions
            .iter()
            .filter(|d| d.timeframe.contains(year))
            .filter(|d| !self.state.decisions.iter().any(|c| c.decision_id == d.id))
            .collect()
    }

    /// The replayed chart series, rebuilt from the immutable logs.
    pub fn metrics_history(&self) -> Vec<HistoryPoint> {
        replay_history(&self.state.decisions, &self.state.events)
    }

    /// Replayed state advanced through every rollover of the live session;
    /// must equal the live metric store exactly.
    pub fn replayed_state(&self) -> (Metrics, crate::budget::BudgetLedger) {
        replay_final_state(
            &self.state.decisions,
            &self.state.events,
            self.state.open_year,
        )
    }

    /// The overall weighted score of the current state.
    pub fn gesamtbewertung(&self) -> f64 {
        crate::derived::overall_score(&self.state.metrics)
    }

    pub fn decisions_limit_reached(&self) -> bool {
        self.state.decisions_in_year(self.state.year()) >= term::MAX_DECISIONS_PER_YEAR
    }

    pub fn should_show_yearly_evaluation(&self) -> bool {
        self.state.pending_yearly_evaluation
    }

    pub fn dismiss_yearly_evaluation(&mut self) {
        self.state.pending_yearly_evaluation = false;
    }

    pub fn should_show_legislature_evaluation(&self) -> bool {
        self.state.pending_legislature_evaluation
    }

    pub fn dismiss_legislature_evaluation(&mut self) {
        self.state.pending_legislature_evaluation = false;
    }

    /// The twelve simulated years are over; a normal end, distinct from a
    /// game over.
    pub fn term_completed(&self) -> bool {
        self.state.clock.years_elapsed() >= term::TERM_YEARS
    }

    /// Serialize the full state for the persistence boundary.
    pub fn save_snapshot(&self) -> serde_json::Result<String> {
        self.state.to_snapshot_json()
    }

    /// Restore a snapshot taken with [`GameSession::save_snapshot`].
    pub fn load_snapshot(&mut self, json: &str) -> serde_json::Result<()> {
        self.state = GameState::from_snapshot_json(json)?;
        Ok(())
    }
}

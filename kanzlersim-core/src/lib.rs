//! # Kanzlersim Core
//!
//! Deterministic simulation engine for a twelve-year German chancellorship:
//! the player resolves policy decisions that mutate a vector of national
//! metrics, a budget/debt ledger and party polls, while a probabilistic
//! event layer injects shocks and a stability evaluator can end the game.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    ┌────────────────────┐    ┌──────────────────┐
//! │  UI / runner │───▶│ GameSession        │───▶│ effect batch     │
//! │  (decide)    │    │ apply_decision     │    │ metrics + ledger │
//! └──────────────┘    └─────────┬──────────┘    └────────┬─────────┘
//!                               │ polls swing            │
//!                               │ event triggers         ▼
//!                               │ stability        append-only logs
//!                               ▼                        │
//!                         GameState                      ▼
//!                                            replay_history (pure fn)
//! ```
//!
//! The live mutation path and the history replayer share the same effect
//! and rollover functions in [`effects`]; the replayed series must equal
//! the live state byte for byte.
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`GameSession`] | Owned simulation instance: operations + queries |
//! | [`Metrics`] | The national metric vector with clamping rules |
//! | [`BudgetLedger`] | Period budget, cumulative debt, interest |
//! | [`PartyPolls`] | Eight poll shares, conserved at 100 |
//! | [`replay_history`] | Pure function: logs → chart series |

pub mod budget;
pub mod catalog;
pub mod clock;
pub mod defines;
pub mod derived;
pub mod effects;
pub mod events;
pub mod metrics;
pub mod polls;
pub mod replay;
pub mod session;
pub mod stability;
pub mod state;
pub mod testing;


pub use budget::{BudgetLedger, PeriodSummary};
pub use catalog::{
    ConditionOp, Conditional, Decision, DecisionCatalog, DecisionCategory, DecisionOption,
    Effect, EventCatalog, EventDef, Timeframe, TriggerCondition,
};
pub use clock::{Date, SimClock};
pub use derived::{apply_income_delta, co2_path_from_tons, drift_income, overall_score};
pub use effects::{apply_effect_batch, apply_year_rollover, resolve_effects};
pub use events::{check_triggers, TriggeredEvent};
pub use metrics::{MetricId, Metrics};
pub use polls::{Party, PartyPolls};
pub use replay::{replay_final_state, replay_history, HistoryKind, HistoryPoint};
pub use session::{DecisionError, DecisionOutcome, GameSession, SessionConfig};
pub use stability::{evaluate_stability, GameOver};
pub use state::{CompletedDecision, GameState};

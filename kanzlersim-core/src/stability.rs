//! Terminal-condition evaluation.

use crate::defines::{budget, stability as defines};
use crate::metrics::Metrics;
use serde::{Deserialize, Serialize};

/// Why the government fell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOver {
    /// A coalition partner left the government.
    CoalitionCollapse,
    /// Lost a constructive vote of no confidence.
    NoConfidenceVote,
    /// Debt above the fiscal ceiling.
    FiscalInsolvency,
}

impl GameOver {
    pub fn describe(self) -> &'static str {
        match self {
            GameOver::CoalitionCollapse => "Die Koalition ist zerbrochen.",
            GameOver::NoConfidenceVote => "Das konstruktive Misstrauensvotum hatte Erfolg.",
            GameOver::FiscalInsolvency => "Der Bundeshaushalt ist zahlungsunfähig.",
        }
    }
}

impl std::fmt::Display for GameOver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// Check the terminal conditions in fixed priority order.
///
/// Pure and side-effect-free; only the first matching condition is
/// reported.
pub fn evaluate_stability(metrics: &Metrics) -> Option<GameOver> {
    if metrics.coalition_partner_a <= defines::COALITION_COLLAPSE
        || metrics.coalition_partner_b <= defines::COALITION_COLLAPSE
    {
        return Some(GameOver::CoalitionCollapse);
    }
    if metrics.popularity <= defines::NO_CONFIDENCE {
        return Some(GameOver::NoConfidenceVote);
    }
    if -metrics.debt > budget::DEBT_CEILING {
        return Some(GameOver::FiscalInsolvency);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_state_is_stable() {
        assert_eq!(evaluate_stability(&Metrics::initial()), None);
    }

    #[test]
    fn test_coalition_collapse() {
        let mut m = Metrics::initial();
        m.coalition_partner_b = 20.0;
        assert_eq!(evaluate_stability(&m), Some(GameOver::CoalitionCollapse));
    }

    #[test]
    fn test_no_confidence() {
        let mut m = Metrics::initial();
        m.popularity = 25.0;
        assert_eq!(evaluate_stability(&m), Some(GameOver::NoConfidenceVote));
    }

    #[test]
    fn test_insolvency() {
        let mut m = Metrics::initial();
        m.debt = -(budget::DEBT_CEILING + 1.0);
        assert_eq!(evaluate_stability(&m), Some(GameOver::FiscalInsolvency));
    }

    #[test]
    fn test_priority_order() {
        // All three conditions hold; the coalition collapse wins.
        let mut m = Metrics::initial();
        m.coalition_partner_a = 10.0;
        m.popularity = 20.0;
        m.debt = -1.0e12;
        assert_eq!(evaluate_stability(&m), Some(GameOver::CoalitionCollapse));

        // Popularity beats insolvency.
        let mut m = Metrics::initial();
        m.popularity = 20.0;
        m.debt = -1.0e12;
        assert_eq!(evaluate_stability(&m), Some(GameOver::NoConfidenceVote));
    }

    #[test]
    fn test_evaluation_has_no_side_effects() {
        let m = Metrics::initial();
        let before = m.clone();
        let _ = evaluate_stability(&m);
        assert_eq!(m, before);
    }
}

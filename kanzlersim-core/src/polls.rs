//! Party polling and the voter-swing model.

use crate::catalog::{DecisionCategory, DecisionOption};
use crate::defines::polls as defines;
use serde::{Deserialize, Serialize};

/// The eight polled blocs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    Spd,
    Union,
    Gruene,
    Fdp,
    Afd,
    Linke,
    Bsw,
    Sonstige,
}

impl Party {
    pub const ALL: [Party; 8] = [
        Party::Spd,
        Party::Union,
        Party::Gruene,
        Party::Fdp,
        Party::Afd,
        Party::Linke,
        Party::Bsw,
        Party::Sonstige,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Party::Spd => "SPD",
            Party::Union => "CDU/CSU",
            Party::Gruene => "Grüne",
            Party::Fdp => "FDP",
            Party::Afd => "AfD",
            Party::Linke => "Linke",
            Party::Bsw => "BSW",
            Party::Sonstige => "Sonstige",
        }
    }
}

impl std::fmt::Display for Party {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Pairwise flow rule for one decision category: which bloc the player's
/// party wins voters from, and which bloc its own defectors drift to.
struct SwingRule {
    source: Party,
    rate: f64,
    backlash: Party,
    backlash_rate: f64,
}

fn swing_rule(category: DecisionCategory) -> SwingRule {
    match category {
        DecisionCategory::Wirtschaft => SwingRule {
            source: Party::Union,
            rate: 0.5,
            backlash: Party::Linke,
            backlash_rate: 0.2,
        },
        DecisionCategory::Soziales => SwingRule {
            source: Party::Linke,
            rate: 0.6,
            backlash: Party::Fdp,
            backlash_rate: 0.25,
        },
        DecisionCategory::Klima => SwingRule {
            source: Party::Gruene,
            rate: 0.5,
            backlash: Party::Afd,
            backlash_rate: 0.3,
        },
        DecisionCategory::Sicherheit => SwingRule {
            source: Party::Afd,
            rate: 0.4,
            backlash: Party::Gruene,
            backlash_rate: 0.25,
        },
        DecisionCategory::Migration => SwingRule {
            source: Party::Afd,
            rate: 0.5,
            backlash: Party::Linke,
            backlash_rate: 0.3,
        },
        DecisionCategory::Bildung => SwingRule {
            source: Party::Sonstige,
            rate: 0.4,
            backlash: Party::Union,
            backlash_rate: 0.15,
        },
        DecisionCategory::Digitales => SwingRule {
            source: Party::Fdp,
            rate: 0.4,
            backlash: Party::Sonstige,
            backlash_rate: 0.15,
        },
        DecisionCategory::Aussenpolitik => SwingRule {
            source: Party::Union,
            rate: 0.3,
            backlash: Party::Bsw,
            backlash_rate: 0.2,
        },
    }
}

/// Poll shares of the eight blocs. Sum to 100 after every update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyPolls {
    shares: [f64; 8],
}

impl PartyPolls {
    /// The fixed game-start poll.
    pub fn initial() -> Self {
        Self {
            shares: [20.0, 28.0, 14.0, 7.0, 16.0, 5.0, 5.0, 5.0],
        }
    }

    pub fn share(&self, party: Party) -> f64 {
        self.shares[party as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Party, f64)> + '_ {
        Party::ALL.iter().map(|&p| (p, self.share(p)))
    }

    pub fn sum(&self) -> f64 {
        self.shares.iter().sum()
    }

    /// Move `amount` share points from one bloc to another, keeping the
    /// donor at or above the floor. No-op for self-flows and non-positive
    /// amounts.
    fn flow(&mut self, from: Party, to: Party, amount: f64) {
        if from == to || amount <= 0.0 {
            return;
        }
        let movable = (self.shares[from as usize] - defines::SHARE_FLOOR).max(0.0);
        let amount = amount.min(movable);
        self.shares[from as usize] -= amount;
        self.shares[to as usize] += amount;
    }

    /// Apply the voter swing of one applied decision.
    ///
    /// Flows are computed per selected option, in the given order, each
    /// against the shares as already mutated by the previous option; the
    /// model is deliberately history-dependent. Renormalization and
    /// rounding happen once at the end.
    pub fn apply_decision_swing(
        &mut self,
        player: Party,
        category: DecisionCategory,
        options: &[&DecisionOption],
    ) {
        let rule = swing_rule(category);

        for option in options {
            let gain = self.share(rule.source) * defines::SWITCHABLE_FRACTION * rule.rate;
            self.flow(rule.source, player, gain);

            // Ceiling effect: some of the player's own voters drift away.
            let loss = self.share(player) * defines::SWITCHABLE_FRACTION * rule.backlash_rate;
            self.flow(player, rule.backlash, loss);

            self.apply_cost_swing(player, option.cost);
        }

        self.renormalize();
    }

    /// Category-independent adjustment for the option's price tag: big
    /// spenders bleed toward fiscally conservative blocs, revenue raisers
    /// pull the other way.
    fn apply_cost_swing(&mut self, player: Party, cost: f64) {
        if cost >= defines::HIGH_COST_THRESHOLD {
            let rate = (cost / defines::COST_SWING_SCALE).min(defines::COST_SWING_CAP);
            let shift = self.share(player) * defines::SWITCHABLE_FRACTION * rate;
            self.flow(player, Party::Fdp, shift * 0.5);
            self.flow(player, Party::Union, shift * 0.5);
        } else if cost < 0.0 {
            let rate = (-cost / defines::COST_SWING_SCALE).min(defines::COST_SWING_CAP);
            for donor in [Party::Fdp, Party::Union] {
                let shift = self.share(donor) * defines::SWITCHABLE_FRACTION * rate * 0.5;
                self.flow(donor, player, shift);
            }
        }
    }

    /// Rescale shares to sum exactly to 100: floor each bloc at 0.1,
    /// proportionally scale, round to one decimal, and fold the rounding
    /// residual into the largest bloc.
    fn renormalize(&mut self) {
        for share in &mut self.shares {
            *share = share.max(defines::SHARE_FLOOR);
        }

        let total: f64 = self.shares.iter().sum();
        if total > 0.0 {
            let scale = 100.0 / total;
            for share in &mut self.shares {
                *share *= scale;
            }
        }

        for share in &mut self.shares {
            *share = (*share * 10.0).round() / 10.0;
        }

        let residual = 100.0 - self.sum();
        let largest = self
            .shares
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
            .unwrap_or(0);
        self.shares[largest] = ((self.shares[largest] + residual) * 10.0).round() / 10.0;
    }
}

impl Default for PartyPolls {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: &str, cost: f64) -> DecisionOption {
        DecisionOption {
            id: id.into(),
            title: id.into(),
            cost,
            effects: vec![],
            delayed_effects: vec![],
            conflicts: vec![],
        }
    }

    #[test]
    fn test_initial_sums_to_hundred() {
        assert_eq!(PartyPolls::initial().sum(), 100.0);
    }

    #[test]
    fn test_category_flow_moves_voters_toward_player() {
        let mut polls = PartyPolls::initial();
        let opt = option("a", 0.0);

        let union_before = polls.share(Party::Union);
        polls.apply_decision_swing(Party::Spd, DecisionCategory::Wirtschaft, &[&opt]);

        assert!(polls.share(Party::Union) < union_before);
        assert!(polls.share(Party::Spd) > 20.0);
        assert!((polls.sum() - 100.0).abs() < 0.05);
    }

    #[test]
    fn test_high_cost_shifts_toward_fiscal_conservatives() {
        let mut polls = PartyPolls::initial();
        let cheap = option("cheap", 0.0);
        let pricey = option("pricey", 50_000_000_000.0);

        let mut cheap_polls = polls.clone();
        cheap_polls.apply_decision_swing(Party::Spd, DecisionCategory::Soziales, &[&cheap]);
        polls.apply_decision_swing(Party::Spd, DecisionCategory::Soziales, &[&pricey]);

        assert!(polls.share(Party::Fdp) > cheap_polls.share(Party::Fdp));
        assert!(polls.share(Party::Spd) < cheap_polls.share(Party::Spd));
    }

    #[test]
    fn test_revenue_pulls_from_fiscal_conservatives() {
        let mut polls = PartyPolls::initial();
        let revenue = option("revenue", -40_000_000_000.0);
        let fdp_before = polls.share(Party::Fdp);

        polls.apply_decision_swing(Party::Spd, DecisionCategory::Bildung, &[&revenue]);

        assert!(polls.share(Party::Fdp) < fdp_before);
    }

    #[test]
    fn test_order_dependence() {
        let a = option("a", 20_000_000_000.0);
        let b = option("b", -20_000_000_000.0);

        let mut ab = PartyPolls::initial();
        ab.apply_decision_swing(Party::Spd, DecisionCategory::Klima, &[&a, &b]);
        let mut ba = PartyPolls::initial();
        ba.apply_decision_swing(Party::Spd, DecisionCategory::Klima, &[&b, &a]);

        // Same nominal inputs, different processing order, different flows.
        assert_ne!(ab.share(Party::Spd), ba.share(Party::Spd));
    }

    #[test]
    fn test_floor_holds_under_repeated_drain() {
        let mut polls = PartyPolls::initial();
        let opt = option("a", 0.0);
        for _ in 0..200 {
            polls.apply_decision_swing(Party::Spd, DecisionCategory::Soziales, &[&opt]);
        }

        for (_, share) in polls.iter() {
            assert!(share >= defines::SHARE_FLOOR - 0.05);
        }
        assert!((polls.sum() - 100.0).abs() < 0.05);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_shares_conserved(
            costs in proptest::collection::vec(-60.0e9..60.0e9f64, 1..30),
            category_idx in 0usize..8,
        ) {
            let categories = [
                DecisionCategory::Wirtschaft,
                DecisionCategory::Soziales,
                DecisionCategory::Klima,
                DecisionCategory::Sicherheit,
                DecisionCategory::Migration,
                DecisionCategory::Bildung,
                DecisionCategory::Digitales,
                DecisionCategory::Aussenpolitik,
            ];
            let mut polls = PartyPolls::initial();
            for cost in costs {
                let opt = option("x", cost);
                polls.apply_decision_swing(Party::Spd, categories[category_idx], &[&opt]);
                prop_assert!((polls.sum() - 100.0).abs() < 0.05);
                for (_, share) in polls.iter() {
                    prop_assert!(share >= 0.0);
                }
            }
        }
    }
}

//! The national metric vector and its clamping rules.

use crate::defines;
use serde::{Deserialize, Serialize};

/// Closed identifier for one national metric.
///
/// Catalog data references metrics through this enum, so an unknown metric
/// name is a deserialization error rather than a silent no-op at apply time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricId {
    Popularity,
    CoalitionPartnerA,
    CoalitionPartnerB,
    Unemployment,
    Growth,
    InvestmentAttractiveness,
    MedianIncome,
    Debt,
    InterestCost,
    SecurityCapacity,
    EnergySecurity,
    Co2ReductionPath,
    Co2TonsReduced,
    OverallScore,
}

impl MetricId {
    pub const ALL: [MetricId; 14] = [
        MetricId::Popularity,
        MetricId::CoalitionPartnerA,
        MetricId::CoalitionPartnerB,
        MetricId::Unemployment,
        MetricId::Growth,
        MetricId::InvestmentAttractiveness,
        MetricId::MedianIncome,
        MetricId::Debt,
        MetricId::InterestCost,
        MetricId::SecurityCapacity,
        MetricId::EnergySecurity,
        MetricId::Co2ReductionPath,
        MetricId::Co2TonsReduced,
        MetricId::OverallScore,
    ];

    /// Closed interval the metric is clamped to after every mutation batch.
    pub const fn range(self) -> (f64, f64) {
        match self {
            MetricId::Popularity => (20.0, 80.0),
            MetricId::CoalitionPartnerA => (0.0, 100.0),
            MetricId::CoalitionPartnerB => (0.0, 100.0),
            MetricId::Unemployment => (2.0, 15.0),
            MetricId::Growth => (-6.0, 8.0),
            MetricId::InvestmentAttractiveness => (0.0, 100.0),
            MetricId::MedianIncome => (defines::income::FLOOR, defines::income::CEILING),
            // Generous: the fiscal game-over fires at a fraction of this.
            MetricId::Debt => (-2_000_000_000_000.0, 0.0),
            MetricId::InterestCost => (0.0, 60_000_000_000.0),
            MetricId::SecurityCapacity => (0.0, 100.0),
            MetricId::EnergySecurity => (0.0, 100.0),
            MetricId::Co2ReductionPath => (0.0, 100.0),
            MetricId::Co2TonsReduced => (-500_000_000.0, 500_000_000.0),
            MetricId::OverallScore => (5.0, 98.0),
        }
    }

    /// German display label, used for event trigger reasons and reports.
    pub fn label(self) -> &'static str {
        match self {
            MetricId::Popularity => "Beliebtheit",
            MetricId::CoalitionPartnerA => "Zufriedenheit Koalitionspartner A",
            MetricId::CoalitionPartnerB => "Zufriedenheit Koalitionspartner B",
            MetricId::Unemployment => "Arbeitslosenquote",
            MetricId::Growth => "Wirtschaftswachstum",
            MetricId::InvestmentAttractiveness => "Investitionsattraktivität",
            MetricId::MedianIncome => "Medianeinkommen",
            MetricId::Debt => "Schulden",
            MetricId::InterestCost => "Zinslast",
            MetricId::SecurityCapacity => "Verteidigungsfähigkeit",
            MetricId::EnergySecurity => "Energiesicherheit",
            MetricId::Co2ReductionPath => "CO2-Reduktionspfad",
            MetricId::Co2TonsReduced => "CO2-Reduktion (Tonnen)",
            MetricId::OverallScore => "Gesamtbewertung",
        }
    }
}

impl std::fmt::Display for MetricId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The mutable vector of national metrics.
///
/// Every field stays within its [`MetricId::range`] interval after each
/// mutation batch; enforcement happens once per batch in
/// [`Metrics::clamp_all`], not per individual effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub popularity: f64,
    pub coalition_partner_a: f64,
    pub coalition_partner_b: f64,
    pub unemployment: f64,
    pub growth: f64,
    pub investment_attractiveness: f64,
    pub median_income: f64,
    /// Always ≤ 0; mirrors the ledger's positive debt magnitude negated.
    pub debt: f64,
    pub interest_cost: f64,
    pub security_capacity: f64,
    pub energy_security: f64,
    pub co2_reduction_path: f64,
    pub co2_tons_reduced: f64,
    pub overall_score: f64,
}

impl Metrics {
    /// The fixed game-start constants.
    pub fn initial() -> Self {
        Self {
            popularity: 50.0,
            coalition_partner_a: 55.0,
            coalition_partner_b: 55.0,
            unemployment: 5.0,
            growth: 1.0,
            investment_attractiveness: 50.0,
            median_income: defines::income::INITIAL,
            debt: 0.0,
            interest_cost: 0.0,
            security_capacity: 50.0,
            energy_security: 50.0,
            co2_reduction_path: 50.0,
            co2_tons_reduced: 0.0,
            overall_score: 50.0,
        }
    }

    pub fn get(&self, id: MetricId) -> f64 {
        match id {
            MetricId::Popularity => self.popularity,
            MetricId::CoalitionPartnerA => self.coalition_partner_a,
            MetricId::CoalitionPartnerB => self.coalition_partner_b,
            MetricId::Unemployment => self.unemployment,
            MetricId::Growth => self.growth,
            MetricId::InvestmentAttractiveness => self.investment_attractiveness,
            MetricId::MedianIncome => self.median_income,
            MetricId::Debt => self.debt,
            MetricId::InterestCost => self.interest_cost,
            MetricId::SecurityCapacity => self.security_capacity,
            MetricId::EnergySecurity => self.energy_security,
            MetricId::Co2ReductionPath => self.co2_reduction_path,
            MetricId::Co2TonsReduced => self.co2_tons_reduced,
            MetricId::OverallScore => self.overall_score,
        }
    }

    pub fn get_mut(&mut self, id: MetricId) -> &mut f64 {
        match id {
            MetricId::Popularity => &mut self.popularity,
            MetricId::CoalitionPartnerA => &mut self.coalition_partner_a,
            MetricId::CoalitionPartnerB => &mut self.coalition_partner_b,
            MetricId::Unemployment => &mut self.unemployment,
            MetricId::Growth => &mut self.growth,
            MetricId::InvestmentAttractiveness => &mut self.investment_attractiveness,
            MetricId::MedianIncome => &mut self.median_income,
            MetricId::Debt => &mut self.debt,
            MetricId::InterestCost => &mut self.interest_cost,
            MetricId::SecurityCapacity => &mut self.security_capacity,
            MetricId::EnergySecurity => &mut self.energy_security,
            MetricId::Co2ReductionPath => &mut self.co2_reduction_path,
            MetricId::Co2TonsReduced => &mut self.co2_tons_reduced,
            MetricId::OverallScore => &mut self.overall_score,
        }
    }

    /// Clamp every metric to its documented interval.
    ///
    /// Idempotent and order-independent: applying it twice has no
    /// additional effect.
    pub fn clamp_all(&mut self) {
        for id in MetricId::ALL {
            let (min, max) = id.range();
            let value = self.get_mut(id);
            *value = value.clamp(min, max);
        }
    }

    /// True if every metric lies within its documented interval.
    pub fn in_bounds(&self) -> bool {
        MetricId::ALL.iter().all(|&id| {
            let (min, max) = id.range();
            let v = self.get(id);
            v >= min && v <= max
        })
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_is_in_bounds() {
        assert!(Metrics::initial().in_bounds());
    }

    #[test]
    fn test_clamp_all_clamps_every_field() {
        let mut m = Metrics::initial();
        m.popularity = 120.0;
        m.unemployment = -4.0;
        m.debt = 5_000_000_000.0;
        m.clamp_all();

        assert_eq!(m.popularity, 80.0);
        assert_eq!(m.unemployment, 2.0);
        assert_eq!(m.debt, 0.0);
        assert!(m.in_bounds());
    }

    #[test]
    fn test_clamp_all_is_idempotent() {
        let mut m = Metrics::initial();
        m.growth = 42.0;
        m.co2_tons_reduced = 1.0e12;
        m.clamp_all();
        let once = m.clone();
        m.clamp_all();
        assert_eq!(m, once);
    }

    #[test]
    fn test_get_mut_roundtrip() {
        let mut m = Metrics::initial();
        for id in MetricId::ALL {
            *m.get_mut(id) += 1.0;
            assert_eq!(m.get(id), Metrics::initial().get(id) + 1.0);
            *m.get_mut(id) -= 1.0;
        }
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_clamped_metrics_stay_within_bounds(
            deltas in proptest::collection::vec(
                (0usize..MetricId::ALL.len(), -1.0e13..1.0e13f64),
                1..40,
            )
        ) {
            let mut m = Metrics::initial();
            for (idx, delta) in deltas {
                *m.get_mut(MetricId::ALL[idx]) += delta;
                m.clamp_all();
                prop_assert!(m.in_bounds());
            }
        }
    }
}

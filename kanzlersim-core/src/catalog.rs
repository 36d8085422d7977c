//! Static decision and event catalogs.
//!
//! Catalogs are opaque input data: loaded once, never mutated. A built-in
//! demo set ships with the crate so the runner and tests have something to
//! play; any JSON file with the same shape works in its place.

use crate::metrics::{MetricId, Metrics};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub type DecisionId = String;
pub type OptionId = String;
pub type EventId = String;

/// Comparison operator in a conditional or trigger condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionOp {
    Gt,
    Lt,
    Eq,
    Gte,
    Lte,
}

impl ConditionOp {
    pub fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            ConditionOp::Gt => lhs > rhs,
            ConditionOp::Lt => lhs < rhs,
            ConditionOp::Eq => (lhs - rhs).abs() < 1e-9,
            ConditionOp::Gte => lhs >= rhs,
            ConditionOp::Lte => lhs <= rhs,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ConditionOp::Gt => ">",
            ConditionOp::Lt => "<",
            ConditionOp::Eq => "=",
            ConditionOp::Gte => ">=",
            ConditionOp::Lte => "<=",
        }
    }
}

/// Conditional multiplier on an effect.
///
/// Evaluated against the metric snapshot taken *before* the batch's effects
/// are applied; when the condition holds, the effect's delta is multiplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conditional {
    pub metric: MetricId,
    pub op: ConditionOp,
    pub value: f64,
    pub multiplier: f64,
}

/// A signed delta to one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    pub metric: MetricId,
    pub delta: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional: Option<Conditional>,
}

/// Effect applied some years after the decision.
///
/// Carried for catalog compatibility; the engine does not schedule these.
/// TODO: apply delayed effects at the rollover of their target year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayedEffect {
    pub years_ahead: u8,
    pub effect: Effect,
}

/// Policy area a decision belongs to; drives the voter-swing flow rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionCategory {
    Wirtschaft,
    Soziales,
    Klima,
    Sicherheit,
    Migration,
    Bildung,
    Digitales,
    Aussenpolitik,
}

/// One selectable resolution of a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionOption {
    pub id: OptionId,
    pub title: String,
    /// Signed monetary cost in euros; negative cost is net revenue.
    pub cost: f64,
    pub effects: Vec<Effect>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delayed_effects: Vec<DelayedEffect>,
    /// Option ids that cannot be co-selected with this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<OptionId>,
}

/// Inclusive year range a decision is on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeframe {
    pub from: i32,
    pub to: i32,
}

impl Timeframe {
    pub fn contains(&self, year: i32) -> bool {
        year >= self.from && year <= self.to
    }
}

/// An immutable catalog entry the player resolves by choosing options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub id: DecisionId,
    pub title: String,
    pub category: DecisionCategory,
    pub timeframe: Timeframe,
    pub options: Vec<DecisionOption>,
}

/// One trigger condition of an event; all of an event's conditions must
/// hold (conjunction) for the event to be rolled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerCondition {
    pub metric: MetricId,
    pub op: ConditionOp,
    pub value: f64,
}

impl TriggerCondition {
    pub fn holds(&self, metrics: &Metrics) -> bool {
        self.op.holds(metrics.get(self.metric), self.value)
    }

    pub fn describe(&self) -> String {
        format!("{} {} {}", self.metric.label(), self.op.symbol(), self.value)
    }
}

/// A probabilistic, condition-gated occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDef {
    pub id: EventId,
    pub title: String,
    /// Probability of firing per roll once all conditions hold, in [0, 1].
    pub probability: f64,
    pub conditions: Vec<TriggerCondition>,
    pub effects: Vec<Effect>,
}

/// Registry of all decisions, loaded once at game start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionCatalog {
    decisions: Vec<Decision>,
}

impl DecisionCatalog {
    pub fn new(decisions: Vec<Decision>) -> Self {
        Self { decisions }
    }

    pub fn get(&self, id: &str) -> Option<&Decision> {
        self.decisions.iter().find(|d| d.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Decision> {
        self.decisions.iter()
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading decision catalog {}", path.display()))?;
        Self::from_json(&raw)
            .with_context(|| format!("parsing decision catalog {}", path.display()))
    }

    /// The built-in demo catalog.
    pub fn builtin() -> Self {
        let effect = |metric: MetricId, delta: f64| Effect {
            metric,
            delta,
            conditional: None,
        };
        let whole_term = Timeframe { from: 2025, to: 2036 };

        Self::new(vec![
            Decision {
                id: "buergergeld_reform".into(),
                title: "Reform des Bürgergelds".into(),
                category: DecisionCategory::Soziales,
                timeframe: whole_term,
                options: vec![
                    DecisionOption {
                        id: "moderate_erhoehung".into(),
                        title: "Moderate Erhöhung".into(),
                        cost: 8_000_000_000.0,
                        effects: vec![
                            effect(MetricId::Popularity, 1.5),
                            effect(MetricId::CoalitionPartnerA, 2.0),
                        ],
                        delayed_effects: vec![],
                        conflicts: vec!["leistungen_kuerzen".into()],
                    },
                    DecisionOption {
                        id: "deutliche_erhoehung".into(),
                        title: "Deutliche Erhöhung".into(),
                        cost: 18_000_000_000.0,
                        effects: vec![
                            effect(MetricId::Popularity, 3.0),
                            effect(MetricId::CoalitionPartnerB, -4.0),
                            effect(MetricId::Unemployment, 0.2),
                        ],
                        delayed_effects: vec![],
                        conflicts: vec!["leistungen_kuerzen".into()],
                    },
                    DecisionOption {
                        id: "leistungen_kuerzen".into(),
                        title: "Leistungen kürzen".into(),
                        cost: -12_000_000_000.0,
                        effects: vec![
                            effect(MetricId::Popularity, -3.0),
                            effect(MetricId::CoalitionPartnerA, -6.0),
                            effect(MetricId::CoalitionPartnerB, 3.0),
                        ],
                        delayed_effects: vec![],
                        conflicts: vec![
                            "moderate_erhoehung".into(),
                            "deutliche_erhoehung".into(),
                        ],
                    },
                ],
            },
            Decision {
                id: "klimapaket".into(),
                title: "Klimapaket der Bundesregierung".into(),
                category: DecisionCategory::Klima,
                timeframe: whole_term,
                options: vec![
                    DecisionOption {
                        id: "co2_preis_anheben".into(),
                        title: "CO2-Preis anheben".into(),
                        cost: -5_000_000_000.0,
                        effects: vec![
                            effect(MetricId::Co2ReductionPath, 4.0),
                            effect(MetricId::InvestmentAttractiveness, -2.0),
                            Effect {
                                metric: MetricId::Popularity,
                                delta: -1.5,
                                // Hits twice as hard while energy is scarce.
                                conditional: Some(Conditional {
                                    metric: MetricId::EnergySecurity,
                                    op: ConditionOp::Lt,
                                    value: 40.0,
                                    multiplier: 2.0,
                                }),
                            },
                        ],
                        delayed_effects: vec![],
                        conflicts: vec![],
                    },
                    DecisionOption {
                        id: "solarfoerderung".into(),
                        title: "Solarausbau fördern".into(),
                        cost: 12_000_000_000.0,
                        effects: vec![
                            effect(MetricId::Co2ReductionPath, 6.0),
                            effect(MetricId::EnergySecurity, 5.0),
                        ],
                        delayed_effects: vec![],
                        conflicts: vec![],
                    },
                ],
            },
            Decision {
                id: "bundeswehr_sondervermoegen".into(),
                title: "Sondervermögen Bundeswehr".into(),
                category: DecisionCategory::Sicherheit,
                timeframe: whole_term,
                options: vec![
                    DecisionOption {
                        id: "volle_finanzierung".into(),
                        title: "Volle Finanzierung".into(),
                        cost: 30_000_000_000.0,
                        effects: vec![
                            effect(MetricId::SecurityCapacity, 12.0),
                            effect(MetricId::CoalitionPartnerA, -3.0),
                        ],
                        delayed_effects: vec![],
                        conflicts: vec!["abgespeckte_variante".into()],
                    },
                    DecisionOption {
                        id: "abgespeckte_variante".into(),
                        title: "Abgespeckte Variante".into(),
                        cost: 15_000_000_000.0,
                        effects: vec![effect(MetricId::SecurityCapacity, 6.0)],
                        delayed_effects: vec![],
                        conflicts: vec!["volle_finanzierung".into()],
                    },
                ],
            },
            Decision {
                id: "fachkraefte_gesetz".into(),
                title: "Fachkräfteeinwanderungsgesetz".into(),
                category: DecisionCategory::Wirtschaft,
                timeframe: whole_term,
                options: vec![
                    DecisionOption {
                        id: "punktesystem".into(),
                        title: "Punktesystem einführen".into(),
                        cost: 2_000_000_000.0,
                        effects: vec![
                            effect(MetricId::Growth, 0.4),
                            effect(MetricId::Unemployment, -0.3),
                            effect(MetricId::InvestmentAttractiveness, 3.0),
                        ],
                        delayed_effects: vec![],
                        conflicts: vec![],
                    },
                    DecisionOption {
                        id: "buerokratieabbau".into(),
                        title: "Bürokratie abbauen".into(),
                        cost: 1_000_000_000.0,
                        effects: vec![
                            effect(MetricId::InvestmentAttractiveness, 4.0),
                            effect(MetricId::Growth, 0.3),
                        ],
                        delayed_effects: vec![],
                        conflicts: vec![],
                    },
                ],
            },
            Decision {
                id: "digitalpakt_schulen".into(),
                title: "Digitalpakt Schulen II".into(),
                category: DecisionCategory::Bildung,
                timeframe: whole_term,
                options: vec![DecisionOption {
                    id: "pakt_verlaengern".into(),
                    title: "Pakt verlängern und aufstocken".into(),
                    cost: 6_000_000_000.0,
                    effects: vec![
                        effect(MetricId::Popularity, 1.0),
                        effect(MetricId::InvestmentAttractiveness, 2.0),
                    ],
                    delayed_effects: vec![],
                    conflicts: vec![],
                }],
            },
            Decision {
                id: "energiepreisbremse".into(),
                title: "Energiepreisbremse".into(),
                category: DecisionCategory::Wirtschaft,
                timeframe: whole_term,
                options: vec![DecisionOption {
                    id: "bremse_einfuehren".into(),
                    title: "Preisbremse einführen".into(),
                    cost: 20_000_000_000.0,
                    effects: vec![
                        effect(MetricId::EnergySecurity, 8.0),
                        Effect {
                            metric: MetricId::Popularity,
                            delta: 2.0,
                            // Worth double when the government is on the ropes.
                            conditional: Some(Conditional {
                                metric: MetricId::Popularity,
                                op: ConditionOp::Lt,
                                value: 40.0,
                                multiplier: 2.0,
                            }),
                        },
                    ],
                    delayed_effects: vec![],
                    conflicts: vec![],
                }],
            },
        ])
    }
}

/// Registry of all events, loaded once at game start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventCatalog {
    events: Vec<EventDef>,
}

impl EventCatalog {
    pub fn new(events: Vec<EventDef>) -> Self {
        Self { events }
    }

    pub fn get(&self, id: &str) -> Option<&EventDef> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventDef> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading event catalog {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing event catalog {}", path.display()))
    }

    /// The built-in demo catalog.
    pub fn builtin() -> Self {
        let effect = |metric: MetricId, delta: f64| Effect {
            metric,
            delta,
            conditional: None,
        };
        let cond = |metric: MetricId, op: ConditionOp, value: f64| TriggerCondition {
            metric,
            op,
            value,
        };

        Self::new(vec![
            EventDef {
                id: "wirtschaftskrise".into(),
                title: "Rezession erfasst Deutschland".into(),
                probability: 0.4,
                conditions: vec![cond(MetricId::Growth, ConditionOp::Lt, -1.0)],
                effects: vec![
                    effect(MetricId::Unemployment, 1.5),
                    effect(MetricId::Popularity, -4.0),
                    effect(MetricId::InvestmentAttractiveness, -8.0),
                ],
            },
            EventDef {
                id: "energiekrise".into(),
                title: "Energiekrise spitzt sich zu".into(),
                probability: 0.5,
                conditions: vec![cond(MetricId::EnergySecurity, ConditionOp::Lt, 35.0)],
                effects: vec![
                    effect(MetricId::Growth, -0.8),
                    effect(MetricId::Popularity, -3.0),
                    effect(MetricId::MedianIncome, -400.0),
                ],
            },
            EventDef {
                id: "koalitionskrach".into(),
                title: "Offener Streit in der Koalition".into(),
                probability: 0.35,
                conditions: vec![cond(
                    MetricId::CoalitionPartnerB,
                    ConditionOp::Lt,
                    35.0,
                )],
                effects: vec![
                    effect(MetricId::Popularity, -2.0),
                    effect(MetricId::CoalitionPartnerB, -5.0),
                ],
            },
            EventDef {
                id: "flutkatastrophe".into(),
                title: "Flutkatastrophe im Süden".into(),
                probability: 0.25,
                conditions: vec![cond(MetricId::Co2ReductionPath, ConditionOp::Lt, 45.0)],
                effects: vec![
                    effect(MetricId::Debt, 10_000_000_000.0),
                    effect(MetricId::Popularity, -1.5),
                    effect(MetricId::SecurityCapacity, -2.0),
                ],
            },
            EventDef {
                id: "haushaltsloch".into(),
                title: "Haushaltsloch nach Karlsruher Urteil".into(),
                probability: 0.4,
                conditions: vec![cond(
                    MetricId::Debt,
                    ConditionOp::Lte,
                    -300_000_000_000.0,
                )],
                effects: vec![
                    effect(MetricId::InvestmentAttractiveness, -5.0),
                    effect(MetricId::Popularity, -3.0),
                ],
            },
            EventDef {
                id: "konjunkturboom".into(),
                title: "Konjunktur zieht kräftig an".into(),
                probability: 0.3,
                conditions: vec![cond(MetricId::Growth, ConditionOp::Gt, 2.5)],
                effects: vec![
                    effect(MetricId::Unemployment, -0.8),
                    effect(MetricId::InvestmentAttractiveness, 5.0),
                    effect(MetricId::Popularity, 2.0),
                ],
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_op_semantics() {
        assert!(ConditionOp::Gt.holds(2.0, 1.0));
        assert!(!ConditionOp::Gt.holds(1.0, 1.0));
        assert!(ConditionOp::Gte.holds(1.0, 1.0));
        assert!(ConditionOp::Lt.holds(0.5, 1.0));
        assert!(ConditionOp::Lte.holds(1.0, 1.0));
        assert!(ConditionOp::Eq.holds(1.0, 1.0));
        assert!(!ConditionOp::Eq.holds(1.0, 1.1));
    }

    #[test]
    fn test_builtin_catalogs_are_consistent() {
        let decisions = DecisionCatalog::builtin();
        assert!(!decisions.is_empty());

        // Conflict references must point at sibling options of the same decision.
        for decision in decisions.iter() {
            for option in &decision.options {
                for conflict in &option.conflicts {
                    assert!(
                        decision.options.iter().any(|o| &o.id == conflict),
                        "dangling conflict `{}` in decision `{}`",
                        conflict,
                        decision.id
                    );
                }
            }
        }

        let events = EventCatalog::builtin();
        assert!(!events.is_empty());
        for event in events.iter() {
            assert!(event.probability > 0.0 && event.probability <= 1.0);
            assert!(!event.conditions.is_empty());
        }
    }

    #[test]
    fn test_catalog_json_roundtrip() {
        let catalog = DecisionCatalog::builtin();
        let json = serde_json::to_string(&catalog).unwrap();
        let parsed = DecisionCatalog::from_json(&json).unwrap();
        assert_eq!(parsed.len(), catalog.len());
        assert!(parsed.get("klimapaket").is_some());
    }

    #[test]
    fn test_metric_ids_serialize_camel_case() {
        let json = serde_json::to_string(&MetricId::Co2ReductionPath).unwrap();
        assert_eq!(json, "\"co2ReductionPath\"");
        let json = serde_json::to_string(&MetricId::CoalitionPartnerA).unwrap();
        assert_eq!(json, "\"coalitionPartnerA\"");
    }

    #[test]
    fn test_timeframe_contains() {
        let tf = Timeframe { from: 2025, to: 2028 };
        assert!(tf.contains(2025));
        assert!(tf.contains(2028));
        assert!(!tf.contains(2029));
    }
}

use super::metrics::GuardFlags;
use serde::{Deserialize, Serialize};

/// Per-dimension weights for the zombie score. They need not sum to 1.
/// Missing keys take their default weight when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreWeights {
    pub traffic_risk: f64,
    pub rank_risk: f64,
    pub engagement: f64,
    pub freshness: f64,
    pub cannibal: f64,
    pub no_value_signals: f64,
}

impl Default for ScoreWeights {
    /// Default scoring weights (sum to 1.0)
    fn default() -> Self {
        Self {
            traffic_risk: 0.30,
            rank_risk: 0.20,
            engagement: 0.10,
            freshness: 0.15,
            cannibal: 0.15,
            no_value_signals: 0.10,
        }
    }
}

/// Pre-guard sub-scores, each in [0, 100].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskBreakdown {
    pub traffic_risk: f64,
    pub rank_risk: f64,
    pub engagement: f64,
    pub freshness: f64,
    pub cannibal: f64,
    pub no_value_signals: f64,
}

impl RiskBreakdown {
    /// Weighted sum before any guard reduction.
    pub fn weighted(&self, weights: &ScoreWeights) -> f64 {
        weights.traffic_risk * self.traffic_risk
            + weights.rank_risk * self.rank_risk
            + weights.engagement * self.engagement
            + weights.freshness * self.freshness
            + weights.cannibal * self.cannibal
            + weights.no_value_signals * self.no_value_signals
    }

    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("trafficRisk", self.traffic_risk),
            ("rankRisk", self.rank_risk),
            ("engagement", self.engagement),
            ("freshness", self.freshness),
            ("cannibal", self.cannibal),
            ("noValueSignals", self.no_value_signals),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: f64,
    pub guards: GuardFlags,
    pub breakdown: RiskBreakdown,
}

use super::action::{ActionDecision, ActionType};
use super::metrics::ContentMetrics;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One decided URL as fed to the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEntry {
    pub url: String,
    pub action: ActionType,
    pub risk: u8,
    pub metrics: ContentMetrics,
    #[serde(default)]
    pub rationale: String,
}

impl SimulationEntry {
    pub fn from_decision(url: &str, decision: &ActionDecision, metrics: &ContentMetrics) -> Self {
        Self {
            url: url.to_string(),
            action: decision.action_type(),
            risk: decision.risk,
            metrics: metrics.clone(),
            rationale: decision.rationale.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionBreakdown {
    pub keep: usize,
    pub refresh: usize,
    pub consolidate: usize,
    pub prune: usize,
    pub redirect: usize,
}

impl ActionBreakdown {
    pub fn get(&self, action: ActionType) -> usize {
        match action {
            ActionType::Keep => self.keep,
            ActionType::Refresh => self.refresh,
            ActionType::Consolidate => self.consolidate,
            ActionType::Prune => self.prune,
            ActionType::Redirect => self.redirect,
        }
    }

    pub fn increment(&mut self, action: ActionType) {
        let slot = match action {
            ActionType::Keep => &mut self.keep,
            ActionType::Refresh => &mut self.refresh,
            ActionType::Consolidate => &mut self.consolidate,
            ActionType::Prune => &mut self.prune,
            ActionType::Redirect => &mut self.redirect,
        };
        *slot += 1;
    }

    pub fn total(&self) -> usize {
        ActionType::ALL.iter().map(|action| self.get(*action)).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedImpact {
    pub index_bloat_reduction: u64,
    pub crawl_budget_reclaimed: u64,
    pub traffic_shift: u64,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAnalysis {
    pub high_risk_urls: Vec<String>,
    pub potential_loss: u64,
    pub rollback_plan: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub total_urls: usize,
    pub actions_to_apply: usize,
    pub projected_impact: ProjectedImpact,
    pub action_breakdown: ActionBreakdown,
    pub risk_analysis: RiskAnalysis,
}

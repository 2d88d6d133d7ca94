use super::action::ActionDecision;
use super::content::{ContentDocument, SimilarityCluster};
use super::metrics::ContentMetrics;
use super::simulation::SimulationReport;
use super::zombie_score::ScoreResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One URL handed over by the metrics source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub url: String,
    pub metrics: ContentMetrics,
    #[serde(default)]
    pub content: Option<ContentDocument>,
}

/// A competing URL considered during the cannibalization check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarUrl {
    pub url: String,
    pub similarity: f64,
    pub metrics: ContentMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResult {
    pub url: String,
    pub score: ScoreResult,
    pub cannibal_similarity: f64,
    pub cluster_id: Option<String>,
    pub decision: ActionDecision,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub items: Vec<ItemResult>,
    pub clusters: Vec<SimilarityCluster>,
    pub report: SimulationReport,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisProgress {
    pub current: usize,
    pub total: usize,
    pub current_url: String,
}

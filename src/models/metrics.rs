use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Engagement and ranking snapshot for one URL.
///
/// `position` of 0 means the URL is not ranked. `age_months` may be fractional. Optional analytics signals
/// (`sessions`, `bounce_rate`, `avg_time_on_page`) are `None` when the
/// analytics source did not report them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentMetrics {
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub position: f64,
    #[serde(default)]
    pub ctr: f64,
    #[serde(default)]
    pub sessions: Option<u64>,
    #[serde(default)]
    pub bounce_rate: Option<f64>,
    #[serde(default)]
    pub avg_time_on_page: Option<f64>,
    #[serde(default)]
    pub conversions: u64,
    #[serde(default)]
    pub backlinks: u64,
    #[serde(default)]
    pub age_months: f64,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardFlags {
    pub has_backlinks: bool,
    pub has_conversions: bool,
    pub has_page1_ranking: bool,
    pub has_recent_traffic: bool,
    pub is_canonical: bool,
}

impl GuardFlags {
    /// Derive guards from a metrics snapshot. `is_canonical` is owned by
    /// cluster analysis and always starts out false.
    pub fn from_metrics(metrics: &ContentMetrics) -> Self {
        Self {
            has_backlinks: metrics.backlinks > 0,
            has_conversions: metrics.conversions > 0,
            has_page1_ranking: metrics.position > 0.0 && metrics.position <= 10.0,
            has_recent_traffic: metrics.clicks > 0 || metrics.impressions > 0,
            is_canonical: false,
        }
    }

    /// Backlinks, conversions or a page-1 ranking: content that must never be downgraded.
    pub fn protects_value(&self) -> bool {
        self.has_backlinks || self.has_conversions || self.has_page1_ranking
    }
}

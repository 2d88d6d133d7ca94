use crate::models::metrics::{ContentMetrics, GuardFlags};
use crate::models::zombie_score::{RiskBreakdown, ScoreResult, ScoreWeights};

const BACKLINK_GUARD: f64 = 0.3;
const CONVERSION_GUARD: f64 = 0.2;
const PAGE1_GUARD: f64 = 0.1;
const RECENT_TRAFFIC_GUARD: f64 = 0.5;

/// Compute the retirement-risk ("zombie") score (0–100) for one URL.
///
/// `cannibal_similarity` is the 0–1 similarity to the best competing page,
/// or 0 when cannibalization was not evaluated.
pub fn calculate_zombie_score(
    metrics: &ContentMetrics,
    weights: &ScoreWeights,
    cannibal_similarity: f64,
) -> ScoreResult {
    let guards = GuardFlags::from_metrics(metrics);

    let breakdown = RiskBreakdown {
        traffic_risk: traffic_risk(metrics),
        rank_risk: rank_risk(metrics),
        engagement: engagement_risk(metrics),
        freshness: freshness_risk(metrics),
        cannibal: cannibal_similarity.clamp(0.0, 1.0) * 100.0,
        no_value_signals: no_value_risk(metrics),
    };

    let raw = breakdown.weighted(weights);
    let score = apply_guards(raw, &guards).clamp(0.0, 100.0);

    ScoreResult {
        score,
        guards,
        breakdown,
    }
}

/// Guard multipliers, applied in a fixed order. Each one only ever shrinks the score.
pub fn apply_guards(raw_score: f64, guards: &GuardFlags) -> f64 {
    let mut score = raw_score;
    if guards.has_backlinks {
        score *= BACKLINK_GUARD;
    }
    if guards.has_conversions {
        score *= CONVERSION_GUARD;
    }
    if guards.has_page1_ranking {
        score *= PAGE1_GUARD;
    }
    if guards.has_recent_traffic {
        score *= RECENT_TRAFFIC_GUARD;
    }
    score
}

/// Traffic risk: first matching tier wins.
/// - no clicks and <100 impressions = 90
/// - <5 clicks and <500 impressions = 70
/// - <20 clicks and <1000 impressions = 50
/// - <100 clicks = 30
pub fn traffic_risk(metrics: &ContentMetrics) -> f64 {
    let (clicks, impressions) = (metrics.clicks, metrics.impressions);
    if clicks == 0 && impressions < 100 {
        90.0
    } else if clicks < 5 && impressions < 500 {
        70.0
    } else if clicks < 20 && impressions < 1000 {
        50.0
    } else if clicks < 100 {
        30.0
    } else {
        10.0
    }
}

/// Rank risk: deep positions first, then CTR for page-1 or unranked URLs.
pub fn rank_risk(metrics: &ContentMetrics) -> f64 {
    let position = metrics.position;
    if position > 50.0 {
        return 90.0;
    }
    if position > 30.0 {
        return 70.0;
    }
    if position > 20.0 {
        return 50.0;
    }
    if position > 10.0 {
        return 30.0;
    }

    if metrics.ctr < 0.01 {
        80.0
    } else if metrics.ctr < 0.02 {
        60.0
    } else if metrics.ctr < 0.05 {
        40.0
    } else {
        10.0
    }
}

/// Engagement risk starts at a moderate 50; absent analytics signals add nothing.
pub fn engagement_risk(metrics: &ContentMetrics) -> f64 {
    let mut risk = 50.0;

    if metrics.bounce_rate.is_some_and(|rate| rate > 0.8) {
        risk += 30.0;
    }
    if metrics.avg_time_on_page.is_some_and(|secs| secs < 30.0) {
        risk += 20.0;
    }
    if metrics.sessions.is_some_and(|sessions| sessions < 5) {
        risk += 20.0;
    }

    f64::min(risk, 100.0)
}

pub fn freshness_risk(metrics: &ContentMetrics) -> f64 {
    match metrics.age_months {
        age if age > 24.0 => 80.0,
        age if age > 12.0 => 60.0,
        age if age > 6.0 => 40.0,
        age if age > 3.0 => 20.0,
        _ => 10.0,
    }
}

/// No-value risk: zero conversions, no backlinks, no clicks, barely any impressions.
pub fn no_value_risk(metrics: &ContentMetrics) -> f64 {
    let mut risk = 0.0;

    if metrics.conversions == 0 {
        risk += 30.0;
    }
    if metrics.backlinks == 0 {
        risk += 20.0;
    }
    if metrics.clicks == 0 {
        risk += 30.0;
    }
    if metrics.impressions < 50 {
        risk += 20.0;
    }

    f64::min(risk, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(clicks: u64, impressions: u64, position: f64) -> ContentMetrics {
        ContentMetrics {
            clicks,
            impressions,
            position,
            ..ContentMetrics::default()
        }
    }

    #[test]
    fn traffic_tiers_take_first_match() {
        assert_eq!(traffic_risk(&metrics(0, 99, 0.0)), 90.0);
        assert_eq!(traffic_risk(&metrics(0, 100, 0.0)), 70.0);
        assert_eq!(traffic_risk(&metrics(4, 499, 0.0)), 70.0);
        assert_eq!(traffic_risk(&metrics(19, 999, 0.0)), 50.0);
        assert_eq!(traffic_risk(&metrics(19, 5000, 0.0)), 30.0);
        assert_eq!(traffic_risk(&metrics(100, 5000, 0.0)), 10.0);
    }

    #[test]
    fn rank_risk_falls_through_to_ctr_on_page_one() {
        assert_eq!(rank_risk(&metrics(0, 0, 51.0)), 90.0);
        assert_eq!(rank_risk(&metrics(0, 0, 31.0)), 70.0);
        assert_eq!(rank_risk(&metrics(0, 0, 21.0)), 50.0);
        assert_eq!(rank_risk(&metrics(0, 0, 11.0)), 30.0);

        let mut page_one = metrics(10, 100, 4.0);
        page_one.ctr = 0.005;
        assert_eq!(rank_risk(&page_one), 80.0);
        page_one.ctr = 0.015;
        assert_eq!(rank_risk(&page_one), 60.0);
        page_one.ctr = 0.03;
        assert_eq!(rank_risk(&page_one), 40.0);
        page_one.ctr = 0.2;
        assert_eq!(rank_risk(&page_one), 10.0);
    }

    #[test]
    fn engagement_ignores_missing_signals() {
        let base = ContentMetrics::default();
        assert_eq!(engagement_risk(&base), 50.0);

        let poor = ContentMetrics {
            bounce_rate: Some(0.95),
            avg_time_on_page: Some(12.0),
            sessions: Some(2),
            ..ContentMetrics::default()
        };
        assert_eq!(engagement_risk(&poor), 100.0);

        let healthy = ContentMetrics {
            bounce_rate: Some(0.4),
            avg_time_on_page: Some(120.0),
            sessions: Some(400),
            ..ContentMetrics::default()
        };
        assert_eq!(engagement_risk(&healthy), 50.0);
    }

    #[test]
    fn freshness_and_no_value_tiers() {
        let mut m = ContentMetrics::default();
        assert_eq!(freshness_risk(&m), 10.0);
        m.age_months = 4.0;
        assert_eq!(freshness_risk(&m), 20.0);
        m.age_months = 6.0;
        assert_eq!(freshness_risk(&m), 20.0);
        m.age_months = 6.5;
        assert_eq!(freshness_risk(&m), 40.0);
        m.age_months = 13.0;
        assert_eq!(freshness_risk(&m), 60.0);
        m.age_months = 25.0;
        assert_eq!(freshness_risk(&m), 80.0);

        assert_eq!(no_value_risk(&ContentMetrics::default()), 100.0);
        let valuable = ContentMetrics {
            clicks: 3,
            impressions: 60,
            conversions: 1,
            backlinks: 1,
            ..ContentMetrics::default()
        };
        assert_eq!(no_value_risk(&valuable), 0.0);
    }

    #[test]
    fn unguarded_zombie_scores_weighted_sum() {
        // Not ranked, never seen: every risk dimension is at its worst tier.
        let m = ContentMetrics {
            age_months: 30.0,
            ..ContentMetrics::default()
        };
        let result = calculate_zombie_score(&m, &ScoreWeights::default(), 0.0);

        assert_eq!(result.guards, GuardFlags::default());
        assert_eq!(result.breakdown.traffic_risk, 90.0);
        assert_eq!(result.breakdown.rank_risk, 80.0);
        assert_eq!(result.breakdown.no_value_signals, 100.0);
        // 27 + 16 + 5 + 12 + 0 + 10
        assert!((result.score - 70.0).abs() < 1e-9);
    }

    #[test]
    fn guards_multiply_down_and_breakdown_stays_pre_guard() {
        let m = ContentMetrics {
            clicks: 150,
            impressions: 2500,
            position: 8.0,
            backlinks: 3,
            ..ContentMetrics::default()
        };
        let weights = ScoreWeights::default();
        let result = calculate_zombie_score(&m, &weights, 0.0);

        assert!(result.guards.has_backlinks);
        assert!(result.guards.has_page1_ranking);
        assert!(result.guards.has_recent_traffic);
        assert!(!result.guards.has_conversions);

        let raw = result.breakdown.weighted(&weights);
        assert!((result.score - raw * 0.3 * 0.1 * 0.5).abs() < 1e-9);
        assert!(result.score <= raw);
    }

    #[test]
    fn cannibal_similarity_feeds_breakdown_and_score_is_bounded() {
        let m = ContentMetrics::default();
        let heavy = ScoreWeights {
            traffic_risk: 1.0,
            rank_risk: 1.0,
            engagement: 1.0,
            freshness: 1.0,
            cannibal: 1.0,
            no_value_signals: 1.0,
        };
        let result = calculate_zombie_score(&m, &heavy, 0.9);

        assert!((result.breakdown.cannibal - 90.0).abs() < 1e-9);
        assert_eq!(result.score, 100.0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let m = ContentMetrics {
            clicks: 7,
            impressions: 340,
            position: 23.4,
            ctr: 0.02,
            sessions: Some(9),
            age_months: 14.0,
            ..ContentMetrics::default()
        };
        let weights = ScoreWeights::default();
        assert_eq!(
            calculate_zombie_score(&m, &weights, 0.42),
            calculate_zombie_score(&m, &weights, 0.42)
        );
    }

    #[test]
    fn guards_never_raise_the_raw_score() {
        let raw = 64.0;
        let all = GuardFlags {
            has_backlinks: true,
            has_conversions: true,
            has_page1_ranking: true,
            has_recent_traffic: true,
            is_canonical: false,
        };
        assert_eq!(apply_guards(raw, &GuardFlags::default()), raw);
        assert!(apply_guards(raw, &all) < raw);
    }
}

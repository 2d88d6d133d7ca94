use crate::analysis::url_path;
use crate::models::action::{Action, ActionDecision};
use crate::models::batch::SimilarUrl;
use crate::models::metrics::ContentMetrics;
use crate::models::zombie_score::ScoreResult;

/// Everything the cascade needs to know about one URL.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub url: &'a str,
    pub metrics: &'a ContentMetrics,
    pub score: &'a ScoreResult,
    pub cannibal_similarity: f64,
    pub similar_urls: &'a [SimilarUrl],
}

type Rule = fn(&DecisionContext) -> Option<ActionDecision>;

/// Decision rules in priority order. The first rule that returns a decision wins.
pub const RULES: [(&str, Rule); 5] = [
    ("guard_override", guard_override),
    ("cannibalization", cannibalization),
    ("refresh_opportunity", refresh_opportunity),
    ("redirect_opportunity", redirect_opportunity),
    ("prune", prune),
];

pub fn decide_action(context: &DecisionContext) -> ActionDecision {
    RULES
        .iter()
        .find_map(|(_, rule)| rule(context))
        .unwrap_or_else(default_keep)
}

/// Name of the rule that fires for this context, `None` when the default keep applies.
pub fn matching_rule(context: &DecisionContext) -> Option<&'static str> {
    RULES
        .iter()
        .find(|(_, rule)| rule(context).is_some())
        .map(|(name, _)| *name)
}

fn guard_override(context: &DecisionContext) -> Option<ActionDecision> {
    if !context.score.guards.protects_value() {
        return None;
    }
    Some(ActionDecision::new(
        Action::Keep,
        "High-value content with backlinks, conversions, or Page 1 rankings",
        5,
        95,
    ))
}

fn cannibalization(context: &DecisionContext) -> Option<ActionDecision> {
    if context.cannibal_similarity <= 0.85 {
        return None;
    }
    let best = find_best_canonical(context.similar_urls)?;
    if best.url == context.url {
        return None;
    }
    Some(ActionDecision::new(
        Action::Consolidate {
            target_url: best.url.clone(),
        },
        format!(
            "High cannibalization similarity ({}%) with better performing content",
            (context.cannibal_similarity * 100.0).round()
        ),
        15,
        85,
    ))
}

fn refresh_opportunity(context: &DecisionContext) -> Option<ActionDecision> {
    let (score, metrics) = (context.score.score, context.metrics);
    let in_band = score > 40.0 && score < 70.0;
    let has_history = metrics.clicks > 10 || metrics.impressions > 500;
    if !(in_band && has_history && metrics.age_months > 6.0) {
        return None;
    }
    Some(ActionDecision::new(
        Action::Refresh {
            refresh_brief: generate_refresh_brief(metrics, context.url),
        },
        "Content shows decline but has historical value - good candidate for refresh",
        20,
        75,
    ))
}

fn redirect_opportunity(context: &DecisionContext) -> Option<ActionDecision> {
    let metrics = context.metrics;
    if !(context.score.score > 60.0
        && metrics.clicks < 5
        && metrics.impressions < 200
        && !context.score.guards.has_backlinks)
    {
        return None;
    }
    // No derivable target: fall through to the remaining rules.
    let target_url = url_path::parent_url(context.url)?;
    Some(ActionDecision::new(
        Action::Redirect { target_url },
        "Thin content with low value - redirect to relevant parent/category",
        25,
        70,
    ))
}

fn prune(context: &DecisionContext) -> Option<ActionDecision> {
    let (metrics, guards) = (context.metrics, &context.score.guards);
    if !(context.score.score > 75.0
        && metrics.clicks < 2
        && metrics.impressions < 100
        && !guards.has_backlinks
        && !guards.has_conversions)
    {
        return None;
    }
    Some(ActionDecision::new(
        Action::Prune,
        "Very low value content with no traffic, backlinks, or conversions",
        30,
        80,
    ))
}

fn default_keep() -> ActionDecision {
    ActionDecision::new(Action::Keep, "Content meets minimum value thresholds", 10, 60)
}

/// Strongest candidate by canonical score; ties keep the earlier entry.
pub fn find_best_canonical(similar_urls: &[SimilarUrl]) -> Option<&SimilarUrl> {
    similar_urls.iter().reduce(|best, current| {
        if canonical_score(&current.metrics) > canonical_score(&best.metrics) {
            current
        } else {
            best
        }
    })
}

pub fn canonical_score(metrics: &ContentMetrics) -> f64 {
    let mut score = metrics.clicks as f64 * 2.0 + metrics.impressions as f64 * 0.1;

    if metrics.position > 0.0 {
        score += (21.0 - metrics.position) * 5.0;
    }

    score += metrics.conversions as f64 * 50.0;
    score += metrics.backlinks as f64 * 10.0;
    score + metrics.ctr * 1000.0
}

pub fn generate_refresh_brief(metrics: &ContentMetrics, url: &str) -> String {
    let mut issues = Vec::new();

    if metrics.position > 20.0 {
        issues.push("poor rankings");
    }
    if metrics.ctr < 0.02 {
        issues.push("low click-through rate");
    }
    if metrics.clicks < 20 {
        issues.push("declining traffic");
    }
    if metrics.age_months > 12.0 {
        issues.push("outdated content");
    }
    if issues.is_empty() {
        issues.push("general content quality");
    }

    format!(
        "Refresh {} content addressing: {}. Focus on improving topical authority and user engagement.",
        url_path::topic(url),
        issues.join(", ")
    )
}

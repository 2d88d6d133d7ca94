use crate::models::action::ActionType;
use crate::models::metrics::ContentMetrics;
use crate::models::simulation::{
    ActionBreakdown, ProjectedImpact, RiskAnalysis, RiskLevel, SimulationEntry, SimulationReport,
};

const HIGH_RISK_THRESHOLD: u8 = 50;

/// Project the aggregate effect of applying a batch of decisions.
///
/// Order-independent; an empty batch yields a zeroed, low-risk report.
pub fn run_simulation(entries: &[SimulationEntry]) -> SimulationReport {
    let mut action_breakdown = ActionBreakdown::default();
    for entry in entries {
        action_breakdown.increment(entry.action);
    }

    let high_risk_urls: Vec<String> = entries
        .iter()
        .filter(|entry| entry.risk > HIGH_RISK_THRESHOLD)
        .map(|entry| entry.url.clone())
        .collect();
    let potential_loss = potential_loss(entries);

    SimulationReport {
        total_urls: entries.len(),
        actions_to_apply: entries
            .iter()
            .filter(|entry| entry.action != ActionType::Keep)
            .count(),
        projected_impact: ProjectedImpact {
            index_bloat_reduction: index_bloat_reduction(&action_breakdown, entries.len()),
            crawl_budget_reclaimed: crawl_budget_reclaimed(entries),
            traffic_shift: traffic_shift(entries),
            risk_level: risk_level(high_risk_urls.len(), potential_loss),
        },
        action_breakdown,
        risk_analysis: RiskAnalysis {
            high_risk_urls,
            potential_loss,
            rollback_plan: rollback_plan(&action_breakdown),
        },
    }
}

/// Percentage of URLs leaving the index (pruned, redirected or consolidated).
fn index_bloat_reduction(breakdown: &ActionBreakdown, total: usize) -> u64 {
    if total == 0 {
        return 0;
    }
    let removed = breakdown.prune + breakdown.redirect + breakdown.consolidate;
    (removed as f64 / total as f64 * 100.0).round() as u64
}

/// Impressions act as a proxy for crawl frequency.
fn estimate_crawl_budget(metrics: &ContentMetrics) -> f64 {
    (metrics.impressions as f64 / 100.0).clamp(10.0, 100.0)
}

fn crawl_budget_reclaimed(entries: &[SimulationEntry]) -> u64 {
    let reclaimed: f64 = entries
        .iter()
        .map(|entry| match entry.action {
            ActionType::Prune => estimate_crawl_budget(&entry.metrics),
            ActionType::Consolidate => estimate_crawl_budget(&entry.metrics) * 0.5,
            _ => 0.0,
        })
        .sum();
    reclaimed.round() as u64
}

fn traffic_shift(entries: &[SimulationEntry]) -> u64 {
    let shift: f64 = entries
        .iter()
        .map(|entry| {
            let clicks = entry.metrics.clicks as f64;
            match entry.action {
                ActionType::Consolidate | ActionType::Redirect => clicks * 0.8,
                ActionType::Refresh => clicks * 0.3,
                _ => 0.0,
            }
        })
        .sum();
    shift.round() as u64
}

fn potential_loss(entries: &[SimulationEntry]) -> u64 {
    let loss: f64 = entries
        .iter()
        .map(|entry| {
            let clicks = entry.metrics.clicks as f64;
            match entry.action {
                ActionType::Prune if entry.risk > 30 => clicks,
                ActionType::Redirect if entry.risk > 40 => clicks * 0.2,
                _ => 0.0,
            }
        })
        .sum();
    loss.round() as u64
}

pub fn risk_level(high_risk_count: usize, potential_loss: u64) -> RiskLevel {
    if high_risk_count == 0 && potential_loss < 100 {
        RiskLevel::Low
    } else if high_risk_count < 5 && potential_loss < 500 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

fn rollback_plan(breakdown: &ActionBreakdown) -> String {
    let mut steps = Vec::new();

    if breakdown.prune > 0 {
        steps.push(format!("Restore {} pruned URLs to index", breakdown.prune));
    }
    if breakdown.redirect > 0 {
        steps.push(format!("Remove {} redirect rules", breakdown.redirect));
    }
    if breakdown.consolidate > 0 {
        steps.push(format!("Restore {} consolidated URLs", breakdown.consolidate));
    }

    steps.join("; ")
}

/// Markdown rendering of a report for display or audit logs.
pub fn format_report(report: &SimulationReport) -> String {
    let impact = &report.projected_impact;
    let risk = &report.risk_analysis;

    let mut out = String::from("# PrunePro Simulation Report\n\n");

    out.push_str("## Overview\n");
    out.push_str(&format!("- **Total URLs Analyzed**: {}\n", report.total_urls));
    out.push_str(&format!("- **Actions to Apply**: {}\n", report.actions_to_apply));
    out.push_str(&format!(
        "- **Risk Level**: {}\n\n",
        impact.risk_level.as_str().to_uppercase()
    ));

    out.push_str("## Projected Impact\n");
    out.push_str(&format!(
        "- **Index Bloat Reduction**: {}%\n",
        impact.index_bloat_reduction
    ));
    out.push_str(&format!(
        "- **Crawl Budget Reclaimed**: {} estimated requests\n",
        impact.crawl_budget_reclaimed
    ));
    out.push_str(&format!("- **Traffic Shift**: {} clicks\n\n", impact.traffic_shift));

    out.push_str("## Action Breakdown\n");
    for action in ActionType::ALL {
        out.push_str(&format!(
            "- {}: {}\n",
            action.label(),
            report.action_breakdown.get(action)
        ));
    }
    out.push('\n');

    out.push_str("## Risk Analysis\n");
    out.push_str(&format!("- **High Risk URLs**: {}\n", risk.high_risk_urls.len()));
    out.push_str(&format!(
        "- **Potential Traffic Loss**: {} clicks\n",
        risk.potential_loss
    ));
    let plan = if risk.rollback_plan.is_empty() {
        "None"
    } else {
        risk.rollback_plan.as_str()
    };
    out.push_str(&format!("- **Rollback Plan**: {plan}\n"));

    if !risk.high_risk_urls.is_empty() {
        out.push_str("\n## High Risk URLs\n");
        for url in &risk.high_risk_urls {
            out.push_str(&format!("- {url}\n"));
        }
    }

    out.trim_end().to_string()
}

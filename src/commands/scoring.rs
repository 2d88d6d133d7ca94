use crate::analysis::action::{decide_action, DecisionContext};
use crate::analysis::cannibal::{content_similarity, detect_clusters_with_threshold};
use crate::analysis::simulation::run_simulation;
use crate::analysis::zombie_score::calculate_zombie_score;
use crate::commands::settings::EffectiveSettings;
use crate::models::batch::{AnalysisProgress, BatchItem, BatchResult, ItemResult, SimilarUrl};
use crate::models::content::{ContentDocument, SimilarityCluster};
use crate::models::simulation::{SimulationEntry, SimulationReport};
use std::collections::{HashMap, HashSet};

/// Cluster membership and competitor list for one URL.
#[derive(Debug, Default)]
struct CannibalInputs {
    cluster_id: Option<String>,
    is_canonical: bool,
    similarity: f64,
    similar_urls: Vec<SimilarUrl>,
}

/// Score, cluster, decide and simulate one batch of URLs.
pub fn run_batch_analysis_internal<F>(
    items: &[BatchItem],
    settings: &EffectiveSettings,
    mut emit_progress: F,
) -> BatchResult
where
    F: FnMut(AnalysisProgress),
{
    let start = std::time::Instant::now();
    let items = dedupe_by_url(items);
    let total = items.len();
    log::info!("Analyzing {total} URLs");

    let documents: Vec<ContentDocument> = items.iter().filter_map(keyed_document).collect();
    let clusters = detect_clusters_with_threshold(&documents, settings.cluster_threshold);
    log::info!(
        "Found {} cannibalization clusters across {} documents",
        clusters.len(),
        documents.len()
    );

    let cannibal_inputs = build_cannibal_inputs(&items, &documents, &clusters);

    let mut results = Vec::with_capacity(total);
    for (index, item) in items.iter().enumerate() {
        emit_progress(AnalysisProgress {
            current: index + 1,
            total,
            current_url: item.url.clone(),
        });

        let inputs = cannibal_inputs.get(item.url.as_str());
        results.push(analyze_item(item, inputs, settings));
    }

    let report = simulate_results(&items, &results);

    BatchResult {
        run_id: uuid::Uuid::new_v4(),
        generated_at: chrono::Utc::now(),
        items: results,
        clusters,
        report,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

fn analyze_item(
    item: &BatchItem,
    inputs: Option<&CannibalInputs>,
    settings: &EffectiveSettings,
) -> ItemResult {
    let similarity = inputs.map(|i| i.similarity).unwrap_or(0.0);
    let similar_urls = inputs.map(|i| i.similar_urls.as_slice()).unwrap_or(&[]);

    let mut score = calculate_zombie_score(&item.metrics, &settings.weights, similarity);
    score.guards.is_canonical = inputs.is_some_and(|i| i.is_canonical);

    let decision = decide_action(&DecisionContext {
        url: &item.url,
        metrics: &item.metrics,
        score: &score,
        cannibal_similarity: similarity,
        similar_urls,
    });
    log::debug!(
        "{} -> {} (score {:.1}, risk {})",
        item.url,
        decision.action_type(),
        score.score,
        decision.risk
    );

    ItemResult {
        url: item.url.clone(),
        score,
        cannibal_similarity: similarity,
        cluster_id: inputs.and_then(|i| i.cluster_id.clone()),
        decision,
    }
}

/// The item's content, addressed by the item's URL so clusters and items
/// always agree on identity.
fn keyed_document(item: &BatchItem) -> Option<ContentDocument> {
    let doc = item.content.as_ref()?;
    if !doc.url.is_empty() && doc.url != item.url {
        log::debug!("Content for {} was captured at {}", item.url, doc.url);
    }
    Some(ContentDocument {
        url: item.url.clone(),
        ..doc.clone()
    })
}

/// Every cluster member competes with every other member; the item itself is
/// listed too so the cascade can see when it is already the strongest page.
fn build_cannibal_inputs<'a>(
    items: &'a [BatchItem],
    documents: &[ContentDocument],
    clusters: &[SimilarityCluster],
) -> HashMap<&'a str, CannibalInputs> {
    let by_url: HashMap<&str, &BatchItem> =
        items.iter().map(|item| (item.url.as_str(), item)).collect();
    let docs_by_url: HashMap<&str, &ContentDocument> =
        documents.iter().map(|doc| (doc.url.as_str(), doc)).collect();
    let mut inputs = HashMap::new();

    for cluster in clusters {
        let members: Vec<(&BatchItem, &ContentDocument)> = cluster
            .urls
            .iter()
            .filter_map(|url| Some((*by_url.get(url.as_str())?, *docs_by_url.get(url.as_str())?)))
            .collect();

        for &(member, doc) in &members {
            let similar_urls: Vec<SimilarUrl> = members
                .iter()
                .map(|&(peer, peer_doc)| SimilarUrl {
                    url: peer.url.clone(),
                    similarity: if peer.url == member.url {
                        1.0
                    } else {
                        content_similarity(doc, peer_doc)
                    },
                    metrics: peer.metrics.clone(),
                })
                .collect();

            let similarity = similar_urls
                .iter()
                .filter(|peer| peer.url != member.url)
                .map(|peer| peer.similarity)
                .fold(0.0, f64::max);

            inputs.insert(
                member.url.as_str(),
                CannibalInputs {
                    cluster_id: Some(cluster.id.clone()),
                    is_canonical: cluster.canonical_url.as_deref() == Some(member.url.as_str()),
                    similarity,
                    similar_urls,
                },
            );
        }
    }

    inputs
}

fn simulate_results(items: &[BatchItem], results: &[ItemResult]) -> SimulationReport {
    let entries: Vec<SimulationEntry> = items
        .iter()
        .zip(results)
        .map(|(item, result)| SimulationEntry::from_decision(&item.url, &result.decision, &item.metrics))
        .collect();
    run_simulation(&entries)
}

/// Later duplicates of a URL are dropped so each URL gets exactly one decision.
fn dedupe_by_url(items: &[BatchItem]) -> Vec<BatchItem> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| {
            let fresh = seen.insert(item.url.as_str());
            if !fresh {
                log::warn!("Skipping duplicate URL in batch: {}", item.url);
            }
            fresh
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::action::ActionType;
    use crate::models::metrics::ContentMetrics;

    fn item(url: &str, metrics: ContentMetrics, body: Option<&str>) -> BatchItem {
        BatchItem {
            url: url.to_string(),
            metrics,
            content: body.map(|text| ContentDocument {
                url: url.to_string(),
                title: "Keyword research guide".to_string(),
                body: text.to_string(),
                meta_description: None,
                headings: vec!["Tools".to_string()],
            }),
        }
    }

    #[test]
    fn duplicate_pages_consolidate_into_stronger_twin() {
        let body = "how to do keyword research step by step";
        let weak = ContentMetrics {
            clicks: 2,
            impressions: 80,
            position: 38.0,
            age_months: 20.0,
            ..ContentMetrics::default()
        };
        let strong = ContentMetrics {
            clicks: 90,
            impressions: 4000,
            position: 14.0,
            ctr: 0.022,
            age_months: 10.0,
            ..ContentMetrics::default()
        };
        let items = vec![
            item("https://example.com/keyword-research-guide", weak, Some(body)),
            item("https://example.com/keyword-research", strong, Some(body)),
        ];

        let result = run_batch_analysis_internal(&items, &EffectiveSettings::default(), |_| {});

        assert_eq!(result.clusters.len(), 1);
        let weak_result = &result.items[0];
        assert_eq!(weak_result.cluster_id.as_deref(), Some("cluster_0"));
        assert!(weak_result.cannibal_similarity > 0.85);
        assert_eq!(weak_result.decision.action_type(), ActionType::Consolidate);
        assert_eq!(
            weak_result.decision.target_url(),
            Some("https://example.com/keyword-research")
        );

        let strong_result = &result.items[1];
        assert!(strong_result.score.guards.is_canonical);
        assert_ne!(strong_result.decision.action_type(), ActionType::Consolidate);
        assert_eq!(result.report.action_breakdown.total(), 2);
    }

    #[test]
    fn clusters_link_items_whose_content_was_captured_at_another_url() {
        let body = "how to do keyword research step by step";
        let weak = ContentMetrics {
            clicks: 2,
            impressions: 80,
            position: 38.0,
            age_months: 20.0,
            ..ContentMetrics::default()
        };
        let strong = ContentMetrics {
            clicks: 90,
            impressions: 4000,
            position: 14.0,
            ctr: 0.022,
            age_months: 10.0,
            ..ContentMetrics::default()
        };
        let mut items = vec![
            item("https://example.com/keyword-research-guide", weak, Some(body)),
            item("https://example.com/keyword-research", strong, Some(body)),
        ];
        for entry in &mut items {
            if let Some(doc) = entry.content.as_mut() {
                doc.url = format!("{}/", entry.url);
            }
        }

        let result = run_batch_analysis_internal(&items, &EffectiveSettings::default(), |_| {});

        assert_eq!(result.clusters.len(), 1);
        assert!(result.clusters[0].contains("https://example.com/keyword-research-guide"));
        let weak_result = &result.items[0];
        assert_eq!(weak_result.cluster_id.as_deref(), Some("cluster_0"));
        assert!(weak_result.cannibal_similarity > 0.85);
        assert_eq!(weak_result.decision.action_type(), ActionType::Consolidate);
        assert_eq!(
            weak_result.decision.target_url(),
            Some("https://example.com/keyword-research")
        );
    }

    #[test]
    fn content_without_its_own_url_takes_the_item_url() {
        let items: Vec<BatchItem> = serde_json::from_value(serde_json::json!([
            { "url": "https://example.com/a", "metrics": {}, "content": { "title": "Same", "body": "same words" } },
            { "url": "https://example.com/b", "metrics": {}, "content": { "title": "Same", "body": "same words" } }
        ]))
        .unwrap();

        let result = run_batch_analysis_internal(&items, &EffectiveSettings::default(), |_| {});

        assert_eq!(result.clusters.len(), 1);
        assert_eq!(
            result.clusters[0].urls,
            vec!["https://example.com/a".to_string(), "https://example.com/b".to_string()]
        );
        assert!(result.items.iter().all(|i| i.cluster_id.as_deref() == Some("cluster_0")));
    }

    #[test]
    fn reports_progress_and_skips_duplicate_urls() {
        let items = vec![
            item("https://example.com/a", ContentMetrics::default(), None),
            item("https://example.com/a", ContentMetrics::default(), None),
            item("https://example.com/b", ContentMetrics::default(), None),
        ];

        let mut seen = Vec::new();
        let result = run_batch_analysis_internal(&items, &EffectiveSettings::default(), |p| {
            seen.push((p.current, p.total, p.current_url));
        });

        assert_eq!(result.items.len(), 2);
        assert_eq!(result.report.total_urls, 2);
        assert_eq!(
            seen,
            vec![
                (1, 2, "https://example.com/a".to_string()),
                (2, 2, "https://example.com/b".to_string()),
            ]
        );
        assert!(result.items.iter().all(|i| i.cluster_id.is_none()));
    }

    #[test]
    fn empty_batch_produces_empty_report() {
        let result = run_batch_analysis_internal(&[], &EffectiveSettings::default(), |_| {});
        assert!(result.items.is_empty());
        assert_eq!(result.report, SimulationReport::default());
    }
}

use crate::analysis::url_path;
use crate::models::content::{ContentDocument, SimilarityCluster};
use std::collections::HashSet;
use std::hash::Hash;

/// Similarity above which two pages are treated as competing for the same intent.
pub const DEFAULT_CLUSTER_THRESHOLD: f64 = 0.7;

const TITLE_WEIGHT: f64 = 0.3;
const BODY_WEIGHT: f64 = 0.4;
const HEADING_WEIGHT: f64 = 0.2;
const URL_WEIGHT: f64 = 0.1;

/// Greedy near-duplicate clustering with the default threshold.
pub fn detect_clusters(documents: &[ContentDocument]) -> Vec<SimilarityCluster> {
    detect_clusters_with_threshold(documents, DEFAULT_CLUSTER_THRESHOLD)
}

/// Documents are visited in input order. Each unassigned document seeds a
/// cluster and absorbs every later unassigned document whose similarity to
/// the seed exceeds `threshold`. Only clusters with two or more members are
/// returned; a document never lands in more than one cluster.
pub fn detect_clusters_with_threshold(
    documents: &[ContentDocument],
    threshold: f64,
) -> Vec<SimilarityCluster> {
    let mut assigned = vec![false; documents.len()];
    let mut clusters = Vec::new();

    for seed in 0..documents.len() {
        if assigned[seed] {
            continue;
        }

        let (members, visited) = grow_cluster(documents, seed, assigned, threshold);
        assigned = visited;

        if members.len() > 1 {
            let urls: Vec<String> = members
                .iter()
                .map(|&index| documents[index].url.clone())
                .collect();
            let canonical_url = find_canonical_url(&urls);
            clusters.push(SimilarityCluster {
                id: format!("cluster_{}", clusters.len()),
                urls,
                similarity: 1.0,
                canonical_url,
            });
        }
    }

    clusters
}

/// Collect the seed plus every later unassigned document similar enough to it,
/// marking all of them assigned. The visited set goes in and comes back out so
/// callers can shard the comparison work while keeping assignment per seed.
fn grow_cluster(
    documents: &[ContentDocument],
    seed: usize,
    mut assigned: Vec<bool>,
    threshold: f64,
) -> (Vec<usize>, Vec<bool>) {
    let mut members = vec![seed];
    assigned[seed] = true;

    for candidate in seed + 1..documents.len() {
        if assigned[candidate] {
            continue;
        }
        if content_similarity(&documents[seed], &documents[candidate]) > threshold {
            members.push(candidate);
            assigned[candidate] = true;
        }
    }

    (members, assigned)
}

/// Weighted blend of title, body, heading and URL-path Jaccard similarities.
pub fn content_similarity(a: &ContentDocument, b: &ContentDocument) -> f64 {
    let title = jaccard(&word_set(&a.title), &word_set(&b.title));
    let body = jaccard(&word_set(&a.body), &word_set(&b.body));
    let headings = jaccard(&heading_set(&a.headings), &heading_set(&b.headings));
    let url = url_similarity(&a.url, &b.url);

    title * TITLE_WEIGHT + body * BODY_WEIGHT + headings * HEADING_WEIGHT + url * URL_WEIGHT
}

/// Path-segment Jaccard; 0 when either URL cannot be parsed.
pub fn url_similarity(a: &str, b: &str) -> f64 {
    match (url_path::path_segment_set(a), url_path::path_segment_set(b)) {
        (Some(left), Some(right)) => jaccard(&left, &right),
        _ => 0.0,
    }
}

/// |A ∩ B| / |A ∪ B|, with two empty sets counting as identical.
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn heading_set(headings: &[String]) -> HashSet<String> {
    headings.iter().map(|h| h.to_lowercase()).collect()
}

/// Left-to-right fold: a strictly shorter path wins; on equal length the
/// URL without a query string wins; otherwise the current pick stays.
pub fn find_canonical_url(urls: &[String]) -> Option<String> {
    let mut iter = urls.iter();
    let first = iter.next()?;

    let canonical = iter.fold(first, |canonical, current| {
        let current_path = url_path::path_or_raw(current);
        let canonical_path = url_path::path_or_raw(canonical);

        if current_path.len() < canonical_path.len() {
            return current;
        }
        if current_path.len() == canonical_path.len()
            && url_path::has_query(canonical)
            && !url_path::has_query(current)
        {
            return current;
        }
        canonical
    });

    Some(canonical.clone())
}

pub fn format_cluster_report(clusters: &[SimilarityCluster]) -> String {
    if clusters.is_empty() {
        return "No cannibalization detected.".to_string();
    }

    let mut report = format!("Found {} cannibalization clusters:\n\n", clusters.len());
    for (index, cluster) in clusters.iter().enumerate() {
        report.push_str(&format!("Cluster {}:\n", index + 1));
        report.push_str(&format!(
            "- Canonical: {}\n",
            cluster.canonical_url.as_deref().unwrap_or("unresolved")
        ));
        report.push_str(&format!("- Redirects: {}\n", cluster.non_canonical().join(", ")));
        report.push_str(&format!("- URLs affected: {}\n\n", cluster.urls.len()));
    }

    report
}

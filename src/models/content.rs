use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocument {
    /// Inside a batch item this may be left out; the item's URL is used.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "content")]
    pub body: String,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub headings: Vec<String>,
}

/// A group of near-duplicate URLs. `urls[0]` is the seed the cluster grew from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityCluster {
    pub id: String,
    pub urls: Vec<String>,
    pub similarity: f64,
    pub canonical_url: Option<String>,
}

impl SimilarityCluster {
    pub fn seed(&self) -> Option<&str> {
        self.urls.first().map(String::as_str)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|member| member == url)
    }

    /// Members other than the canonical URL.
    pub fn non_canonical(&self) -> Vec<&str> {
        self.urls
            .iter()
            .map(String::as_str)
            .filter(|url| Some(*url) != self.canonical_url.as_deref())
            .collect()
    }
}

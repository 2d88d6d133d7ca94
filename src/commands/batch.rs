use crate::models::batch::{BatchItem, BatchResult};
use crate::models::simulation::SimulationEntry;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load the URLs to analyze. Accepts a bare JSON array or an object with a `urls` array.
pub fn load_batch_items(path: &Path) -> Result<Vec<BatchItem>, String> {
    load_list(path)
}

/// Load an already decided batch for a standalone simulation run.
pub fn load_simulation_entries(path: &Path) -> Result<Vec<SimulationEntry>, String> {
    load_list(path)
}

pub fn write_batch_result(path: &Path, result: &BatchResult) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
    }
    let raw = serde_json::to_string_pretty(result)
        .map_err(|e| format!("Failed to serialize batch result: {e}"))?;
    fs::write(path, raw).map_err(|e| format!("Failed to write {}: {e}", path.display()))
}

fn load_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .map_err(|e| format!("Invalid JSON in {}: {e}", path.display()))?;

    let list = match value {
        Value::Array(_) => value,
        Value::Object(mut obj) => obj
            .remove("urls")
            .ok_or(format!("{} has no \"urls\" array", path.display()))?,
        _ => return Err(format!("{} must contain an array of URLs", path.display())),
    };

    serde_json::from_value(list).map_err(|e| format!("Malformed entry in {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::action::ActionType;

    #[test]
    fn loads_bare_array_and_wrapped_batches() {
        let dir = tempfile::tempdir().unwrap();
        let bare = dir.path().join("bare.json");
        fs::write(
            &bare,
            r#"[{"url": "https://example.com/a", "metrics": {"clicks": 3, "impressions": 90}}]"#,
        )
        .unwrap();
        let items = load_batch_items(&bare).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].metrics.clicks, 3);
        assert!(items[0].content.is_none());

        let wrapped = dir.path().join("wrapped.json");
        fs::write(
            &wrapped,
            r#"{"urls": [{"url": "https://example.com/a", "action": "prune", "risk": 30, "metrics": {}}]}"#,
        )
        .unwrap();
        let entries = load_simulation_entries(&wrapped).unwrap();
        assert_eq!(entries[0].action, ActionType::Prune);
        assert_eq!(entries[0].rationale, "");
    }

    #[test]
    fn accepts_fractional_content_age() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ages.json");
        fs::write(
            &path,
            r#"[{"url": "https://example.com/a", "metrics": {"age_months": 6.5}},
                {"url": "https://example.com/b", "metrics": {"age_months": 14}}]"#,
        )
        .unwrap();

        let items = load_batch_items(&path).unwrap();
        assert_eq!(items[0].metrics.age_months, 6.5);
        assert_eq!(items[1].metrics.age_months, 14.0);
    }

    #[test]
    fn reports_readable_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"items": []}"#).unwrap();

        let err = load_batch_items(&path).unwrap_err();
        assert!(err.contains("has no \"urls\" array"));
        assert!(load_batch_items(&dir.path().join("missing.json"))
            .unwrap_err()
            .starts_with("Failed to read"));
    }
}

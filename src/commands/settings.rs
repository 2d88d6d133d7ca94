use crate::analysis::cannibal::DEFAULT_CLUSTER_THRESHOLD;
use crate::models::zombie_score::ScoreWeights;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_SCHEMA_VERSION: u32 = 1;
const SETTINGS_DIR: &str = ".prunepro";
const CLUSTER_THRESHOLD_RANGE: (f64, f64) = (0.5, 0.95);

/// Tunables the pipeline reads: scoring weights and the clustering threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EffectiveSettings {
    pub weights: ScoreWeights,
    pub cluster_threshold: f64,
}

impl Default for EffectiveSettings {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            cluster_threshold: DEFAULT_CLUSTER_THRESHOLD,
        }
    }
}

impl EffectiveSettings {
    /// Clamp every value into its accepted range. Weights stay un-normalized.
    pub fn sanitized(self) -> Self {
        let weight = |value: f64, fallback: f64| in_range(value, (0.0, 1.0), fallback);
        let defaults = ScoreWeights::default();
        let w = self.weights;

        Self {
            weights: ScoreWeights {
                traffic_risk: weight(w.traffic_risk, defaults.traffic_risk),
                rank_risk: weight(w.rank_risk, defaults.rank_risk),
                engagement: weight(w.engagement, defaults.engagement),
                freshness: weight(w.freshness, defaults.freshness),
                cannibal: weight(w.cannibal, defaults.cannibal),
                no_value_signals: weight(w.no_value_signals, defaults.no_value_signals),
            },
            cluster_threshold: in_range(
                self.cluster_threshold,
                CLUSTER_THRESHOLD_RANGE,
                DEFAULT_CLUSTER_THRESHOLD,
            ),
        }
    }
}

/// On-disk shape of `.prunepro/settings.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    schema_version: u32,
    #[serde(flatten)]
    settings: EffectiveSettings,
}

impl SettingsFile {
    fn current(settings: EffectiveSettings) -> Self {
        Self {
            schema_version: SETTINGS_SCHEMA_VERSION,
            settings: settings.sanitized(),
        }
    }
}

pub fn get_settings(workspace_path: &str) -> Result<Value, String> {
    let file = load_settings_file(workspace_path)?;
    to_json(&file)
}

/// Merge a partial settings document into the stored one and persist the result.
pub fn save_settings(workspace_path: &str, patch: Value) -> Result<Value, String> {
    let mut stored = get_settings(workspace_path)?;
    apply_patch(&mut stored, &patch);

    let updated: SettingsFile =
        serde_json::from_value(stored).map_err(|e| format!("Invalid settings: {e}"))?;
    let file = SettingsFile::current(updated.settings);
    write_settings_file(&settings_path(workspace_path), &file)?;
    to_json(&file)
}

pub fn load_effective_settings(workspace_path: &str) -> Result<EffectiveSettings, String> {
    Ok(load_settings_file(workspace_path)?.settings)
}

/// Parse `key=value` overrides from the command line into a settings patch.
/// Dotted keys address nested objects (`weights.cannibal=0.2`).
pub fn parse_overrides(pairs: &[String]) -> Result<Value, String> {
    let mut patch = json!({});

    for pair in pairs {
        let (key, raw_value) = pair
            .split_once('=')
            .ok_or(format!("Expected key=value, got: {pair}"))?;
        let value = serde_json::from_str::<Value>(raw_value)
            .unwrap_or_else(|_| Value::String(raw_value.to_string()));

        let mut slot = &mut patch;
        for part in key.split('.') {
            let obj = slot
                .as_object_mut()
                .ok_or(format!("Cannot nest under a scalar in: {key}"))?;
            slot = obj.entry(part.to_string()).or_insert_with(|| json!({}));
        }
        *slot = value;
    }

    Ok(patch)
}

/// Read the settings file, creating it with defaults on first use.
/// An unreadable or mistyped file falls back to defaults with a warning.
fn load_settings_file(workspace_path: &str) -> Result<SettingsFile, String> {
    let path = settings_path(workspace_path);

    if !path.exists() {
        let file = SettingsFile::current(EffectiveSettings::default());
        write_settings_file(&path, &file)?;
        return Ok(file);
    }

    let raw = fs::read_to_string(&path).map_err(|e| format!("Failed to read settings.json: {e}"))?;
    let parsed = serde_json::from_str::<SettingsFile>(&raw).unwrap_or_else(|err| {
        log::warn!("Ignoring unreadable settings at {}: {err}", path.display());
        SettingsFile::current(EffectiveSettings::default())
    });

    if parsed.schema_version > SETTINGS_SCHEMA_VERSION {
        log::warn!(
            "{} was written by a newer PrunePro (schema {}); unknown keys are ignored",
            path.display(),
            parsed.schema_version
        );
    }

    Ok(SettingsFile::current(parsed.settings))
}

fn settings_path(workspace_path: &str) -> PathBuf {
    Path::new(workspace_path).join(SETTINGS_DIR).join("settings.json")
}

fn write_settings_file(path: &Path, file: &SettingsFile) -> Result<(), String> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| format!("Failed to create {SETTINGS_DIR} directory: {e}"))?;
    }
    let raw = serde_json::to_string_pretty(file)
        .map_err(|e| format!("Failed to serialize settings: {e}"))?;
    fs::write(path, raw).map_err(|e| format!("Failed to write settings.json: {e}"))
}

fn to_json(file: &SettingsFile) -> Result<Value, String> {
    serde_json::to_value(file).map_err(|e| format!("Failed to serialize settings: {e}"))
}

/// Objects merge key by key; anything else in the patch replaces the stored value.
fn apply_patch(stored: &mut Value, patch: &Value) {
    match (stored, patch) {
        (Value::Object(stored), Value::Object(patch)) => {
            for (key, value) in patch {
                apply_patch(stored.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}

fn in_range(value: f64, (min, max): (f64, f64), fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

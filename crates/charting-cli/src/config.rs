use std::path::{Path, PathBuf};

use charting_forms::format::UnknownKeyPolicy;
use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartingConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// IANA zone used to render `time` placeholders.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Added in v1. Pre-versioned configs always dropped unknown answers.
    #[serde(default)]
    pub unknown_key_policy: UnknownKeyPolicy,
    /// Whether a submitted encounter goes to a supervising provider before
    /// it closes.
    #[serde(default)]
    pub require_oversight: bool,
}

fn default_timezone() -> String {
    "America/Los_Angeles".to_string()
}

impl Default for ChartingConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            timezone: default_timezone(),
            unknown_key_policy: UnknownKeyPolicy::default(),
            require_oversight: false,
        }
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("telenutrition-charting"))
}

pub fn default_config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Load the config at `path`, or at the default location when `None`.
/// A missing file yields the defaults.
pub fn load_config(path: Option<&Path>) -> eyre::Result<ChartingConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(ChartingConfig::default());
    }

    let contents = std::fs::read_to_string(&path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;
    parse_config(&contents)
}

/// Parse config JSON, migrating older versions first.
pub fn parse_config(contents: &str) -> eyre::Result<ChartingConfig> {
    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(contents)?;
    let on_disk_version = match json.get("config_version").and_then(|v| v.as_u64()) {
        Some(v) => u32::try_from(v)
            .map_err(|_| eyre::eyre!("config_version {v} is out of range"))?,
        None => 0,
    };

    let migrated = migrate(json, on_disk_version)?;
    let config: ChartingConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
/// Each migration is a pure transform on the raw JSON value.
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION})"
        ));
    }

    // v0 → v1: unknown_key_policy made explicit
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("unknown_key_policy")
            .or_insert(serde_json::Value::String("drop".to_string()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added unknown_key_policy)");
    }

    Ok(json)
}

pub fn save_config(config: &ChartingConfig, path: &Path) -> eyre::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

//! Persisted settings envelope
//!
//! Snapshot of the store's settings written to a JSON file under the
//! platform config dir. Only read at process start; the in-memory copy
//! stays authoritative once the process is running.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::settings::{Settings, SettingsPatch};
use crate::constants::storage;

/// On-disk shape: `{ "settings": { ... } }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsEnvelope {
    #[serde(default, deserialize_with = "settings_over_defaults")]
    pub settings: Settings,
}

/// Read the stored settings with the same per-field leniency as remote payloads
fn settings_over_defaults<'de, D>(deserializer: D) -> Result<Settings, D::Error>
where
    D: Deserializer<'de>,
{
    let patch = SettingsPatch::deserialize(deserializer)?;
    Ok(Settings::from_defaults(&patch))
}

impl SettingsEnvelope {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// `<config_dir>/tailorboard/settings-storage.json`
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(storage::APP_DIR);
        path.push(format!("{}.{}", storage::SETTINGS_KEY, storage::EXTENSION));
        path
    }

    /// Load envelope from disk. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            debug!(path = %path.display(), "No persisted settings envelope");
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings envelope from {:?}", path))?;

        let envelope: SettingsEnvelope = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings envelope from {:?}", path))?;

        info!(path = %path.display(), "Restored persisted settings");
        Ok(Some(envelope))
    }

    /// Write envelope to disk, creating the parent directory if needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize settings envelope to JSON")?;

        fs::write(path, json)
            .with_context(|| format!("Failed to write settings envelope to {:?}", path))?;

        debug!(path = %path.display(), "Saved settings envelope");
        Ok(())
    }
}

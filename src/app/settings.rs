use crate::app::models::ExclusionMapping;
use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings key the editor reads explorer exclusions from.
pub const FILES_EXCLUDE: &str = "files.exclude";

const SETTINGS_DIR: &str = ".vscode";
const SETTINGS_FILE: &str = "settings.json";

/// Reads and rewrites `<workspace>/.vscode/settings.json`.
///
/// Nothing is cached: every call goes back to disk, and the last writer wins.
pub struct SettingsStore {
    settings_path: PathBuf,
}

impl SettingsStore {
    pub fn new(workspace_root: &Path) -> Self {
        Self {
            settings_path: workspace_root.join(SETTINGS_DIR).join(SETTINGS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    /// Replaces the `files.exclude` value with `mapping`, keeping every other key.
    pub fn persist(&self, mapping: &ExclusionMapping) -> Result<()> {
        let mut settings = self.load()?;
        let patterns = serde_json::to_value(mapping).context("Failed to serialize exclusions")?;
        settings.insert(FILES_EXCLUDE.to_string(), patterns);

        let mut contents = serde_json::to_string_pretty(&Value::Object(settings))
            .context("Failed to serialize settings")?;
        contents.push('\n');

        fs::write(&self.settings_path, contents)
            .with_context(|| format!("Failed to write settings to {:?}", self.settings_path))?;

        log::info!(
            "Wrote {} exclusion pattern(s) to {}",
            mapping.len(),
            self.settings_path.display()
        );
        Ok(())
    }

    /// Clears every exclusion.
    pub fn reset_exclusions(&self) -> Result<()> {
        self.persist(&ExclusionMapping::new())
    }

    /// Reads the current settings document. A missing file is created empty
    /// and treated as `{}`.
    pub fn load(&self) -> Result<Map<String, Value>> {
        if !self.settings_path.exists() {
            if let Some(parent) = self.settings_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {parent:?}"))?;
            }
            fs::write(&self.settings_path, "")
                .with_context(|| format!("Failed to create {:?}", self.settings_path))?;
            log::debug!("Created empty {}", self.settings_path.display());
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.settings_path)
            .with_context(|| format!("Failed to read settings from {:?}", self.settings_path))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", self.settings_path))?;

        match value {
            Value::Object(map) => Ok(map),
            _ => bail!("{:?} does not contain a JSON object", self.settings_path),
        }
    }

    /// The exclusions currently on disk. A missing file reads as no exclusions
    /// and is left uncreated.
    pub fn current_exclusions(&self) -> Result<ExclusionMapping> {
        if !self.settings_path.exists() {
            return Ok(ExclusionMapping::new());
        }

        let mut settings = self.load()?;
        match settings.remove(FILES_EXCLUDE) {
            Some(value) => serde_json::from_value(value).with_context(|| {
                format!("Unexpected {FILES_EXCLUDE} value in {:?}", self.settings_path)
            }),
            None => Ok(ExclusionMapping::new()),
        }
    }
}

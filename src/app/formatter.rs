use crate::app::models::{ExclusionMapping, HiddenEntry};
use crate::app::settings::FILES_EXCLUDE;
use anyhow::Result;
use std::path::Path;

pub struct OutputGenerator;

impl OutputGenerator {
    /// Renders the mapping exactly as it would appear under `files.exclude`.
    pub fn generate_mapping(mapping: &ExclusionMapping) -> Result<String> {
        let body = serde_json::to_string_pretty(mapping)?;
        Ok(format!("\"{}\": {}", FILES_EXCLUDE, body))
    }

    pub fn generate_tree(entries: &[HiddenEntry]) -> String {
        let mut output = String::new();

        for entry in entries {
            let indent = "    ".repeat(entry.depth.saturating_sub(1));
            let marker = if entry.is_dir { "/" } else { "" };
            output.push_str(&format!(
                "{}{}{}  ({})\n",
                indent, entry.relative_path, marker, entry.pattern
            ));
        }

        output.trim_end().to_string()
    }

    pub fn format_summary(mapping: &ExclusionMapping, settings_path: &Path) -> String {
        if mapping.is_empty() {
            format!("Cleared exclusions in {}", settings_path.display())
        } else {
            format!(
                "Excluded {} pattern(s) in {}",
                mapping.len(),
                settings_path.display()
            )
        }
    }
}

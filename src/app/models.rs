use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Condition attached to sibling patterns derived from a `.ts` exclusion.
pub const TS_SIBLING_CONDITION: &str = "$(basename).ts";

/// A logical sub-unit of the workspace, as declared in the project definitions file.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub root: String,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub assets: Vec<String>,
}

/// Value stored against a glob in `files.exclude`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ExclusionValue {
    Always(bool),
    When { when: String },
}

impl ExclusionValue {
    pub fn always() -> Self {
        ExclusionValue::Always(true)
    }

    pub fn when_ts_sibling() -> Self {
        ExclusionValue::When {
            when: TS_SIBLING_CONDITION.to_string(),
        }
    }

    pub fn is_always(&self) -> bool {
        matches!(self, ExclusionValue::Always(true))
    }
}

pub type ExclusionMapping = BTreeMap<String, ExclusionValue>;

/// What to do with the computed mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Write,
    DryRun,
    Preview,
}

/// Represents the final configuration after merging the definitions file and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub workspace_root: PathBuf,
    pub selected: Vec<Project>,
    pub unselected: Vec<Project>,
    pub mode: OutputMode,
    pub reset: bool, // --reset: clear exclusions regardless of selection
}

/// A workspace path hidden by the current mapping.
#[derive(Debug)]
pub struct HiddenEntry {
    pub path: PathBuf,
    pub relative_path: String,
    pub depth: usize,
    pub is_dir: bool,
    pub pattern: String, // Glob responsible for hiding this entry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusion_values_serialize_to_host_shapes() {
        let mut mapping = ExclusionMapping::new();
        mapping.insert("a.ts".to_string(), ExclusionValue::always());
        mapping.insert("a.html".to_string(), ExclusionValue::when_ts_sibling());

        let json = serde_json::to_string(&mapping).unwrap();
        assert_eq!(
            json,
            r#"{"a.html":{"when":"$(basename).ts"},"a.ts":true}"#
        );
    }

    #[test]
    fn project_lists_default_to_empty() {
        let project: Project = toml::from_str("name = \"app\"\nroot = \"app\"").unwrap();
        assert_eq!(project.root, "app");
        assert!(project.include.is_empty());
        assert!(project.exclude.is_empty());
        assert!(project.assets.is_empty());
    }

    #[test]
    fn project_without_root_is_rejected() {
        let parsed: Result<Project, _> = toml::from_str("name = \"app\"");
        assert!(parsed.is_err());
    }
}

use crate::app::models::{ExclusionMapping, ExclusionValue, HiddenEntry};
use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use pathdiff::diff_paths;
use std::path::{Path, PathBuf};

const BASENAME_VAR: &str = "$(basename)";

/// Walks a workspace and reports what an exclusion mapping hides.
pub struct Scanner {
    root: PathBuf,
    always: Vec<String>,
    always_set: GlobSet,
    conditional: Vec<(String, String)>, // (pattern, sibling condition)
    conditional_set: GlobSet,
}

impl Scanner {
    pub fn new(root: PathBuf, mapping: &ExclusionMapping) -> Result<Self> {
        let mut always = Vec::new();
        let mut conditional = Vec::new();
        for (pattern, value) in mapping {
            match value {
                ExclusionValue::When { when } => conditional.push((pattern.clone(), when.clone())),
                value if value.is_always() => always.push(pattern.clone()),
                _ => {}
            }
        }

        let conditional_patterns: Vec<String> =
            conditional.iter().map(|(p, _)| p.clone()).collect();

        Ok(Self {
            root,
            always_set: build_globset(&always)?,
            always,
            conditional_set: build_globset(&conditional_patterns)?,
            conditional,
        })
    }

    pub fn scan(&self) -> Vec<HiddenEntry> {
        let mut entries = Vec::new();

        // Gitignored paths never show in the explorer, so they are not reported
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .build();

        for result in walker {
            match result {
                Ok(entry) => {
                    if let Some(hidden) = self.process_entry(entry.path()) {
                        entries.push(hidden);
                    }
                }
                Err(err) => log::warn!("Error walking entry: {}", err),
            }
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries
    }

    fn process_entry(&self, path: &Path) -> Option<HiddenEntry> {
        if path == self.root {
            return None;
        }

        if path.components().any(|c| c.as_os_str() == ".git") {
            return None;
        }

        let relative = diff_paths(path, &self.root)?;

        // Only the topmost hidden path is reported; its contents go with it.
        if relative
            .ancestors()
            .skip(1)
            .filter(|a| !a.as_os_str().is_empty())
            .any(|a| self.always_set.is_match(a))
        {
            return None;
        }

        let pattern = self
            .always_match(&relative)
            .or_else(|| self.conditional_match(path, &relative))?;

        Some(HiddenEntry {
            path: path.to_path_buf(),
            relative_path: relative.to_string_lossy().to_string(),
            depth: relative.components().count(),
            is_dir: path.is_dir(),
            pattern,
        })
    }

    fn always_match(&self, relative: &Path) -> Option<String> {
        let index = *self.always_set.matches(relative).first()?;
        Some(self.always[index].clone())
    }

    /// A conditional pattern only hides a file whose sibling, named by
    /// substituting its basename into the condition, exists.
    fn conditional_match(&self, path: &Path, relative: &Path) -> Option<String> {
        let basename = path.file_stem()?.to_string_lossy();
        let parent = path.parent()?;

        self.conditional_set
            .matches(relative)
            .into_iter()
            .map(|index| &self.conditional[index])
            .find(|(_, when)| parent.join(when.replace(BASENAME_VAR, &basename)).exists())
            .map(|(pattern, _)| pattern.clone())
    }
}

/// Builds a glob set where `*` stops at path separators, as the editor's globs do.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = GlobBuilder::new(pat)
            .literal_separator(true)
            .build()
            .context(format!("Invalid glob pattern: {}", pat))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

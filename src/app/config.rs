use crate::app::cli::Cli;
use crate::app::models::{OutputMode, Project, RuntimeConfig};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const DEFINITIONS_FILE: &str = "projects.toml";

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct DefinitionsFile {
    selected: Vec<String>,
    #[serde(rename = "project")]
    projects: Vec<Project>,
}

/// Finds the project definitions file: explicit path > workspace > home config.
fn locate_definitions(explicit: Option<&Path>, workspace_root: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let in_workspace = workspace_root.join(DEFINITIONS_FILE);
    if in_workspace.exists() {
        return Some(in_workspace);
    }

    dirs::home_dir()
        .map(|home| {
            home.join(".config")
                .join("project_exclusions")
                .join(DEFINITIONS_FILE)
        })
        .filter(|path| path.exists())
}

fn load_definitions(path: &Path) -> Result<DefinitionsFile> {
    let content = fs::read_to_string(path)
        .context(format!("Failed to read project definitions at {:?}", path))?;

    let definitions: DefinitionsFile =
        toml::from_str(&content).context(format!("Failed to parse {:?}", path))?;

    // An empty root would hide the whole workspace once unselected.
    if let Some(project) = definitions.projects.iter().find(|p| p.root.trim().is_empty()) {
        bail!("Project {:?} in {:?} has an empty root", project.name, path);
    }

    Ok(definitions)
}

/// Deduplicate while keeping order
fn dedup_names(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Splits `projects` into (selected, unselected), selected in the order named.
fn partition_projects(
    projects: Vec<Project>,
    names: &[String],
) -> Result<(Vec<Project>, Vec<Project>)> {
    for name in names {
        if !projects.iter().any(|p| &p.name == name) {
            bail!("Unknown project: {}", name);
        }
    }

    let selected = names
        .iter()
        .filter_map(|name| projects.iter().find(|p| &p.name == name).cloned())
        .collect();
    let unselected = projects
        .into_iter()
        .filter(|p| !names.contains(&p.name))
        .collect();

    Ok((selected, unselected))
}

pub fn resolve_config(cli: Cli, current_dir: PathBuf) -> Result<RuntimeConfig> {
    let workspace_root = cli.workspace.unwrap_or(current_dir);

    let definitions = match locate_definitions(cli.config.as_deref(), &workspace_root) {
        Some(path) => {
            log::debug!("Loading project definitions from {}", path.display());
            load_definitions(&path)?
        }
        None => DefinitionsFile::default(),
    };

    let mode = if cli.preview {
        OutputMode::Preview
    } else if cli.dry_run {
        OutputMode::DryRun
    } else {
        OutputMode::Write
    };

    // Selection: --reset > --select > file default
    let names = if cli.reset {
        Vec::new()
    } else {
        dedup_names(cli.select.unwrap_or(definitions.selected))
    };

    let (selected, unselected) = partition_projects(definitions.projects, &names)?;

    Ok(RuntimeConfig {
        workspace_root,
        selected,
        unselected,
        mode,
        reset: cli.reset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    const DEFINITIONS: &str = r#"
selected = ["app"]

[[project]]
name = "app"
root = "app"
exclude = ["app/dist"]

[[project]]
name = "lib"
root = "lib"
assets = ["lib/gen.js"]

[[project]]
name = "tools"
root = "tools"
"#;

    fn names(projects: &[Project]) -> Vec<&str> {
        projects.iter().map(|p| p.name.as_str()).collect()
    }

    fn resolve(args: &[&str], workspace: &Path) -> Result<RuntimeConfig> {
        let cli = Cli::parse_from(std::iter::once("project_exclusions").chain(args.iter().copied()));
        resolve_config(cli, workspace.to_path_buf())
    }

    #[test]
    fn file_default_selection_is_used() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(DEFINITIONS_FILE), DEFINITIONS).unwrap();

        let config = resolve(&[], dir.path()).unwrap();

        assert_eq!(names(&config.selected), vec!["app"]);
        assert_eq!(names(&config.unselected), vec!["lib", "tools"]);
        assert_eq!(config.mode, OutputMode::Write);
        assert_eq!(config.workspace_root, dir.path());
    }

    #[test]
    fn cli_selection_overrides_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(DEFINITIONS_FILE), DEFINITIONS).unwrap();

        let config = resolve(&["--select", "tools", "lib", "tools", "--dry-run"], dir.path()).unwrap();

        assert_eq!(names(&config.selected), vec!["tools", "lib"]);
        assert_eq!(names(&config.unselected), vec!["app"]);
        assert_eq!(config.mode, OutputMode::DryRun);
    }

    #[test]
    fn reset_selects_nothing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(DEFINITIONS_FILE), DEFINITIONS).unwrap();

        let config = resolve(&["--reset", "--select", "lib"], dir.path()).unwrap();

        assert!(config.reset);
        assert!(config.selected.is_empty());
        assert_eq!(config.unselected.len(), 3);
    }

    #[test]
    fn explicit_config_and_workspace_paths() {
        let defs = tempdir().unwrap();
        let workspace = tempdir().unwrap();
        let defs_path = defs.path().join("custom.toml");
        fs::write(&defs_path, DEFINITIONS).unwrap();

        let config = resolve(
            &[
                "--config",
                defs_path.to_str().unwrap(),
                "--workspace",
                workspace.path().to_str().unwrap(),
                "--preview",
            ],
            Path::new("elsewhere"),
        )
        .unwrap();

        assert_eq!(config.workspace_root, workspace.path());
        assert_eq!(config.mode, OutputMode::Preview);
        assert_eq!(names(&config.selected), vec!["app"]);
    }

    #[test]
    fn unknown_project_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(DEFINITIONS_FILE), DEFINITIONS).unwrap();

        let err = resolve(&["--select", "nope"], dir.path()).unwrap_err();
        assert!(err.to_string().contains("Unknown project: nope"));
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(DEFINITIONS_FILE), "[[project]]\nname = \"app\"\n").unwrap();

        assert!(resolve(&[], dir.path()).is_err());
    }

    #[test]
    fn empty_root_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(DEFINITIONS_FILE),
            "[[project]]\nname = \"app\"\nroot = \"\"\n",
        )
        .unwrap();

        let err = resolve(&["--select", "app"], dir.path()).unwrap_err();
        assert!(err.to_string().contains("has an empty root"));
    }

    #[test]
    fn invalid_definitions_are_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(DEFINITIONS_FILE), "[[project]\n").unwrap();

        assert!(resolve(&[], dir.path()).is_err());
    }
}

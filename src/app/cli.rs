use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Hide unselected projects from the editor's file explorer"
)]
pub struct Cli {
    /// Workspace root containing .vscode/settings.json (defaults to the current directory)
    #[arg(long)]
    pub workspace: Option<PathBuf>,

    /// Project definitions file (defaults to <workspace>/projects.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Names of the projects to keep visible
    #[arg(long, num_args = 1..)]
    pub select: Option<Vec<String>>,

    /// Clear all exclusions
    #[arg(long)]
    pub reset: bool,

    /// Print the computed exclusions instead of writing them
    #[arg(long)]
    pub dry_run: bool,

    /// List the workspace paths the computed exclusions would hide
    #[arg(long, conflicts_with = "dry_run")]
    pub preview: bool,
}

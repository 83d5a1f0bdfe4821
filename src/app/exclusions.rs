use crate::app::models::{ExclusionMapping, ExclusionValue, Project};

const TS_EXTENSION: &str = ".ts";
const SIBLING_EXTENSIONS: [&str; 2] = [".html", ".scss"];

/// Computes the `files.exclude` mapping for a project selection.
///
/// An empty selection yields an empty mapping, which resets the explorer
/// to show everything.
pub fn update_exclusions(selected: &[Project], unselected: &[Project]) -> ExclusionMapping {
    if selected.is_empty() {
        return ExclusionMapping::new();
    }

    let roots = excluded_roots(selected, unselected);
    let common = common_exclusions(selected);
    let assets = asset_exclusions(selected, unselected);
    log::debug!(
        "excluded roots: {:?}, common exclusions: {:?}, asset exclusions: {:?}",
        roots,
        common,
        assets
    );

    let combined = mark_all(roots.into_iter().chain(common).chain(assets));
    add_dependencies(&combined)
}

/// Roots of unselected projects that no selected project shares.
pub fn excluded_roots(selected: &[Project], unselected: &[Project]) -> Vec<String> {
    unselected
        .iter()
        .filter(|u| !selected.iter().any(|s| s.root == u.root))
        .map(|u| u.root.clone())
        .collect()
}

/// Patterns every selected project excludes without also including them.
/// Order follows the first selected project's `exclude` list.
pub fn common_exclusions(selected: &[Project]) -> Vec<String> {
    let mut effective = selected.iter().map(|p| {
        p.exclude
            .iter()
            .filter(|e| !p.include.contains(e))
            .cloned()
            .collect::<Vec<_>>()
    });

    let Some(first) = effective.next() else {
        return Vec::new();
    };

    effective.fold(first, |acc, next| {
        acc.into_iter().filter(|v| next.contains(v)).collect()
    })
}

/// Assets of unselected projects that no selected project also lists.
/// Duplicates in the unselected lists each pass through.
pub fn asset_exclusions(selected: &[Project], unselected: &[Project]) -> Vec<String> {
    let selected_assets: Vec<&String> = selected.iter().flat_map(|s| &s.assets).collect();

    unselected
        .iter()
        .flat_map(|u| &u.assets)
        .filter(|a| !selected_assets.contains(a))
        .cloned()
        .collect()
}

/// Marks every pattern `true` and adds `.html`/`.scss` siblings for patterns
/// mentioning `.ts`, hidden only when the `.ts` file sits next to them.
///
/// A derived sibling never downgrades a pattern already marked `true`.
pub fn add_dependencies(patterns: &ExclusionMapping) -> ExclusionMapping {
    let mut result = mark_all(patterns.keys().cloned());

    for pattern in patterns.keys().filter(|p| p.contains(TS_EXTENSION)) {
        for ext in SIBLING_EXTENSIONS {
            result
                .entry(pattern.replacen(TS_EXTENSION, ext, 1))
                .or_insert_with(ExclusionValue::when_ts_sibling);
        }
    }

    result
}

fn mark_all(patterns: impl IntoIterator<Item = String>) -> ExclusionMapping {
    patterns
        .into_iter()
        .map(|p| (p, ExclusionValue::always()))
        .collect()
}

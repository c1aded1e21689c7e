//! Handlers for the `upskill` subcommands, plus shared file loading.

mod analyze;
mod check;
mod resolve;

pub use analyze::handle_analyze_command;
pub use check::handle_check_command;
pub use resolve::handle_resolve_command;

use std::path::Path;

use anyhow::{bail, Context, Result};
use upskill_ontology::{Ontology, SkillMap, TaxonomyDef};

/// Read and validate a taxonomy file, dispatching on extension.
pub(crate) fn load_taxonomy(path: &Path) -> Result<Ontology> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read taxonomy file {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let def: TaxonomyDef = match extension.as_str() {
        "json" => serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON taxonomy {}", path.display()))?,
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML taxonomy {}", path.display()))?,
        other => bail!(
            "Unsupported taxonomy extension '{other}' for {} (expected .json, .yaml, or .yml)",
            path.display()
        ),
    };

    Ontology::load(def).with_context(|| format!("Invalid taxonomy {}", path.display()))
}

/// Read a skill map: a JSON object of label -> integer level.
pub(crate) fn load_skill_map(path: &Path) -> Result<SkillMap> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read skill map {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid skill map {}", path.display()))
}

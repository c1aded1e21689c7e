//! `upskill resolve`: per-label normalization trace for taxonomy debugging.

use std::path::Path;

use anyhow::Result;
use upskill_normalize::{normalize, MatcherConfig, Normalization};

use super::load_taxonomy;

/// Print how each label resolves: match kind, confidence, and suggestions.
pub fn handle_resolve_command(
    taxonomy: &Path,
    labels: &[String],
    config: &MatcherConfig,
) -> Result<()> {
    let ontology = load_taxonomy(taxonomy)?;
    for label in labels {
        println!("{}", trace_line(label, &normalize(label, &ontology, config)));
    }
    Ok(())
}

fn trace_line(label: &str, outcome: &Normalization) -> String {
    match outcome {
        Normalization::Matched { id } => format!("{label} -> {id} (exact, 1.00)"),
        Normalization::SynonymMatched { id } => format!("{label} -> {id} (synonym, 1.00)"),
        Normalization::FuzzyMatched { id, confidence } => {
            format!("{label} -> {id} (fuzzy, {confidence:.2})")
        }
        Normalization::Unmatched { suggestions, .. } => {
            let mut line = format!("{label} -> no match");
            if !suggestions.is_empty() {
                let listed: Vec<String> = suggestions
                    .iter()
                    .map(|s| format!("{} ({:.2})", s.display_name, s.score))
                    .collect();
                line.push_str("; did you mean: ");
                line.push_str(&listed.join(", "));
            }
            line
        }
    }
}

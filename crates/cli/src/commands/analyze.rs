//! `upskill analyze`: the full pipeline from files to report and path.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use upskill_analyze::{compute, GapReport};
use upskill_normalize::{normalize_map, MatcherConfig, UnmatchedLabel};
use upskill_recommend::{recommend_with, LearningPath, RecommendOptions};

use super::{load_skill_map, load_taxonomy};
use crate::cli::OutputFormat;
use crate::render;

/// The JSON document `analyze --format json` emits.
#[derive(Debug, Serialize)]
struct AnalysisDocument<'a> {
    report: &'a GapReport,
    path: &'a LearningPath,
    unmatched_employee: &'a [UnmatchedLabel],
    unmatched_role: &'a [UnmatchedLabel],
}

/// Normalize both maps, compute the gap report, build the learning path,
/// and print in the requested format.
#[allow(clippy::too_many_arguments)]
pub fn handle_analyze_command(
    taxonomy: &Path,
    employee: &Path,
    role: &Path,
    budget: Option<f64>,
    format: OutputFormat,
    matcher: &MatcherConfig,
    options: &RecommendOptions,
) -> Result<()> {
    let ontology = load_taxonomy(taxonomy)?;
    let employee_raw = load_skill_map(employee)?;
    let role_raw = load_skill_map(role)?;

    let employee = normalize_map(&employee_raw, &ontology, matcher);
    let role = normalize_map(&role_raw, &ontology, matcher);
    for unmatched in &role.unmatched {
        // A requirement nobody can interpret deserves more than debug level.
        tracing::warn!(
            target: "upskill::analyze",
            label = %unmatched.label,
            "Role requirement not recognized by the taxonomy"
        );
    }

    let report = compute(&employee.levels, &role.levels, &ontology);
    let path = recommend_with(&report, &ontology, budget, options)
        .context("Failed to build the learning path")?;

    match format {
        OutputFormat::Json => {
            let document = AnalysisDocument {
                report: &report,
                path: &path,
                unmatched_employee: &employee.unmatched,
                unmatched_role: &role.unmatched,
            };
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        OutputFormat::Table => {
            print!(
                "{}",
                render::render_analysis(&report, &path, &employee.unmatched, &role.unmatched)
            );
        }
    }
    Ok(())
}

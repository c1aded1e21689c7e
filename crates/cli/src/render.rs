//! Plain-text rendering of reports and paths for terminal output.

use upskill_analyze::{GapReport, GapStatus};
use upskill_normalize::UnmatchedLabel;
use upskill_recommend::LearningPath;

fn status_label(status: GapStatus) -> &'static str {
    match status {
        GapStatus::Met => "met",
        GapStatus::Below => "below",
        GapStatus::Missing => "missing",
    }
}

/// Render the full analysis: gap table, learning path, unmatched labels.
pub fn render_analysis(
    report: &GapReport,
    path: &LearningPath,
    unmatched_employee: &[UnmatchedLabel],
    unmatched_role: &[UnmatchedLabel],
) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Gap report: {}/{} requirements met, overall score {:.2}\n",
        report.summary.met, report.summary.required, report.overall_score
    ));

    if !report.entries.is_empty() {
        let name_width = report
            .entries
            .iter()
            .map(|e| e.display_name.len())
            .max()
            .unwrap_or(0)
            .max("SKILL".len());
        out.push_str(&format!(
            "  {:<name_width$}  REQUIRED  CURRENT  GAP  STATUS\n",
            "SKILL"
        ));
        for entry in &report.entries {
            out.push_str(&format!(
                "  {:<name_width$}  {:>8}  {:>7}  {:>3}  {}\n",
                entry.display_name,
                entry.required_level.get(),
                entry.current_level.get(),
                entry.delta,
                status_label(entry.status),
            ));
        }
    }

    if path.steps.is_empty() {
        out.push_str("\nNo learning steps needed.\n");
    } else {
        out.push_str(&format!(
            "\nLearning path (total cost {:.1}, closes {} gap levels):\n",
            path.total_cost, path.closed_delta
        ));
        for (index, step) in path.steps.iter().enumerate() {
            out.push_str(&format!(
                "  {}. {}  [cost {:.1}]\n",
                index + 1,
                step.summary,
                step.estimated_cost
            ));
        }
    }
    if !path.deferred.is_empty() {
        out.push_str(&format!(
            "  Deferred by budget: {}\n",
            path.deferred.join(", ")
        ));
    }

    render_unmatched(&mut out, "employee", unmatched_employee);
    render_unmatched(&mut out, "role", unmatched_role);
    out
}

fn render_unmatched(out: &mut String, side: &str, unmatched: &[UnmatchedLabel]) {
    if unmatched.is_empty() {
        return;
    }
    out.push_str(&format!("\nUnrecognized {side} skills:\n"));
    for entry in unmatched {
        out.push_str(&format!("  {}", entry.label));
        if !entry.suggestions.is_empty() {
            let names: Vec<&str> = entry
                .suggestions
                .iter()
                .map(|s| s.display_name.as_str())
                .collect();
            out.push_str(&format!(" (did you mean: {})", names.join(", ")));
        }
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upskill_analyze::compute;
    use upskill_normalize::{normalize_map, MatcherConfig};
    use upskill_ontology::SkillMap;
    use upskill_recommend::recommend;
    use upskill_test_utils::sample_ontology;

    fn analysis(
        employee_json: &str,
        role_json: &str,
        budget: Option<f64>,
    ) -> (GapReport, LearningPath, Vec<UnmatchedLabel>, Vec<UnmatchedLabel>) {
        let ontology = sample_ontology();
        let config = MatcherConfig::default();
        let employee: SkillMap = serde_json::from_str(employee_json).unwrap();
        let role: SkillMap = serde_json::from_str(role_json).unwrap();
        let employee = normalize_map(&employee, &ontology, &config);
        let role = normalize_map(&role, &ontology, &config);
        let report = compute(&employee.levels, &role.levels, &ontology);
        let path = recommend(&report, &ontology, budget).unwrap();
        (report, path, employee.unmatched, role.unmatched)
    }

    #[test]
    fn test_render_orders_table_by_report_and_path_by_prerequisites() {
        let (report, path, ue, ur) = analysis(
            r#"{"py": 3, "stats": 2}"#,
            r#"{"Python": 4, "Machine Learning": 3}"#,
            None,
        );
        let text = render_analysis(&report, &path, &ue, &ur);

        // Table section: ml first (higher delta).
        let table_section = &text[..text.find("Learning path").unwrap()];
        let table_ml = table_section.find("Machine Learning").unwrap();
        let table_python = table_section.find("Python").unwrap();
        assert!(table_ml < table_python);

        // Path section: python step precedes ml step.
        let path_section = &text[text.find("Learning path").unwrap()..];
        let python_step = path_section.find("Raise Python").unwrap();
        let ml_step = path_section.find("Acquire Machine Learning").unwrap();
        assert!(python_step < ml_step);
        assert!(text.contains("0/2 requirements met"));
    }

    #[test]
    fn test_render_empty_analysis() {
        let (report, path, ue, ur) = analysis("{}", "{}", None);
        let text = render_analysis(&report, &path, &ue, &ur);
        assert!(text.contains("0/0 requirements met"));
        assert!(text.contains("No learning steps needed."));
        assert!(!text.contains("Unrecognized"));
    }

    #[test]
    fn test_render_deferred_and_unmatched() {
        let (report, path, ue, ur) = analysis(
            r#"{"pythn": 2, "underwater basket weaving": 4}"#,
            r#"{"Python": 4, "Machine Learning": 3, "machine learnin": 2}"#,
            Some(0.0),
        );
        let text = render_analysis(&report, &path, &ue, &ur);
        assert!(text.contains("Deferred by budget:"));
        assert!(text.contains("Unrecognized employee skills:"));
        assert!(text.contains("underwater basket weaving"));
    }
}

//! Per-skill gap entries and the aggregate report.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use upskill_ontology::{Ontology, SkillId, SkillLevel};

/// Normalized proficiency map keyed by skill id.
///
/// This is the post-normalization shape of a skill map; ordered so reports
/// built from it are deterministic.
pub type LevelMap = BTreeMap<SkillId, SkillLevel>;

// ============================================================================
// Entries
// ============================================================================

/// Bucket a required skill falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapStatus {
    /// Current level meets or exceeds the requirement.
    Met,
    /// Skill is held, but below the required level.
    Below,
    /// Skill is entirely absent (current level 0, requirement above 0).
    Missing,
}

/// Immutable per-skill result, computed fresh per analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapEntry {
    /// Canonical skill id.
    pub skill_id: SkillId,
    /// Display name from the ontology (the id itself when unknown).
    pub display_name: String,
    /// Level the role demands.
    pub required_level: SkillLevel,
    /// Level the employee holds (0 when absent).
    pub current_level: SkillLevel,
    /// `max(required - current, 0)`.
    pub delta: u8,
    /// `max(current - required, 0)`.
    pub surplus: u8,
    /// Met / below / missing bucket.
    pub status: GapStatus,
}

impl GapEntry {
    fn new(skill_id: SkillId, display_name: String, required: SkillLevel, current: SkillLevel) -> Self {
        let delta = required.get().saturating_sub(current.get());
        let surplus = current.get().saturating_sub(required.get());
        let status = if delta == 0 {
            GapStatus::Met
        } else if current.is_absent() {
            GapStatus::Missing
        } else {
            GapStatus::Below
        };
        Self {
            skill_id,
            display_name,
            required_level: required,
            current_level: current,
            delta,
            surplus,
            status,
        }
    }
}

// ============================================================================
// Report
// ============================================================================

/// Bucket counts over a report's entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapSummary {
    /// Number of required skills.
    pub required: usize,
    /// Requirements fully met.
    pub met: usize,
    /// Requirements held below the required level.
    pub below: usize,
    /// Requirements entirely absent.
    pub missing: usize,
}

impl GapSummary {
    /// Tally buckets over a set of entries.
    #[must_use]
    pub fn from_entries(entries: &[GapEntry]) -> Self {
        let mut summary = Self {
            required: entries.len(),
            ..Self::default()
        };
        for entry in entries {
            match entry.status {
                GapStatus::Met => summary.met += 1,
                GapStatus::Below => summary.below += 1,
                GapStatus::Missing => summary.missing += 1,
            }
        }
        summary
    }
}

/// Aggregate gap analysis for one employee against one role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapReport {
    /// One entry per required skill, descending delta, ties by ascending id.
    pub entries: Vec<GapEntry>,
    /// Level-weighted mean of deltas (weight = required level); 0 for an
    /// empty role.
    pub overall_score: f64,
    /// Required skill ids absent from the employee map entirely, ascending.
    pub missing: Vec<SkillId>,
    /// The full normalized employee map, carried so the recommender can
    /// judge prerequisite satisfaction without re-normalizing.
    pub employee_levels: LevelMap,
    /// Bucket counts over `entries`.
    pub summary: GapSummary,
}

/// Compare a normalized employee map against a normalized role map.
///
/// Never fails on well-formed normalized input: employee levels absent from
/// the map default to zero, and an empty role yields an empty report with
/// score 0.
#[must_use]
pub fn compute(employee: &LevelMap, role: &LevelMap, ontology: &Ontology) -> GapReport {
    let mut entries: Vec<GapEntry> = role
        .iter()
        .map(|(skill_id, &required)| {
            let current = employee.get(skill_id).copied().unwrap_or_default();
            let display_name = ontology
                .get(skill_id)
                .map_or_else(|| skill_id.clone(), |node| node.display_name.clone());
            GapEntry::new(skill_id.clone(), display_name, required, current)
        })
        .collect();
    entries.sort_by_key(|entry| (Reverse(entry.delta), entry.skill_id.clone()));

    let mut weighted_deltas = 0.0;
    let mut weights = 0.0;
    for entry in &entries {
        let weight = f64::from(entry.required_level.get());
        weighted_deltas += weight * f64::from(entry.delta);
        weights += weight;
    }
    let overall_score = if weights > 0.0 {
        weighted_deltas / weights
    } else {
        0.0
    };

    let missing: Vec<SkillId> = role
        .keys()
        .filter(|id| !employee.contains_key(*id))
        .cloned()
        .collect();

    let summary = GapSummary::from_entries(&entries);
    tracing::debug!(
        "Gap computed: {}/{} requirements met, score {overall_score:.3}",
        summary.met,
        summary.required
    );

    GapReport {
        entries,
        overall_score,
        missing,
        employee_levels: employee.clone(),
        summary,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use upskill_ontology::TaxonomyDef;

    fn ontology() -> Ontology {
        let def: TaxonomyDef = serde_json::from_str(
            r#"{
                "skills": [
                    {"id": "python", "display_name": "Python", "synonyms": ["py"]},
                    {"id": "ml", "display_name": "Machine Learning"},
                    {"id": "sql", "display_name": "SQL"},
                    {"id": "git", "display_name": "Git"}
                ],
                "edges": [
                    {"kind": "is-prerequisite-of", "from_id": "python", "to_id": "ml", "weight": 2.0}
                ]
            }"#,
        )
        .unwrap();
        Ontology::load(def).unwrap()
    }

    fn levels(pairs: &[(&str, u8)]) -> LevelMap {
        pairs
            .iter()
            .map(|&(id, level)| (id.to_string(), SkillLevel::new(level)))
            .collect()
    }

    // ========== Entry arithmetic and buckets ==========

    #[test]
    fn test_delta_and_surplus_never_negative() {
        let report = compute(
            &levels(&[("python", 5), ("sql", 1)]),
            &levels(&[("python", 3), ("sql", 4)]),
            &ontology(),
        );

        let python = report.entries.iter().find(|e| e.skill_id == "python").unwrap();
        assert_eq!(python.delta, 0);
        assert_eq!(python.surplus, 2);
        assert_eq!(python.status, GapStatus::Met);

        let sql = report.entries.iter().find(|e| e.skill_id == "sql").unwrap();
        assert_eq!(sql.delta, 3);
        assert_eq!(sql.surplus, 0);
        assert_eq!(sql.status, GapStatus::Below);
    }

    #[test]
    fn test_absent_skill_defaults_to_zero_and_is_missing() {
        let report = compute(&levels(&[]), &levels(&[("ml", 3)]), &ontology());
        let entry = &report.entries[0];
        assert_eq!(entry.current_level, SkillLevel::ABSENT);
        assert_eq!(entry.delta, 3);
        assert_eq!(entry.status, GapStatus::Missing);
        assert_eq!(report.missing, vec!["ml".to_string()]);
    }

    #[test]
    fn test_held_at_zero_is_missing_status_but_not_unmatched() {
        // An explicit level-0 entry is present in the map, so it does not
        // count as an unmatched requirement, but the bucket is still missing.
        let report = compute(&levels(&[("ml", 0)]), &levels(&[("ml", 2)]), &ontology());
        assert_eq!(report.entries[0].status, GapStatus::Missing);
        assert!(report.missing.is_empty());
    }

    #[test]
    fn test_display_name_resolved_from_ontology() {
        let report = compute(&levels(&[]), &levels(&[("ml", 1)]), &ontology());
        assert_eq!(report.entries[0].display_name, "Machine Learning");
    }

    #[test]
    fn test_unknown_id_falls_back_to_id() {
        let report = compute(&levels(&[]), &levels(&[("cobol", 2)]), &ontology());
        assert_eq!(report.entries[0].display_name, "cobol");
    }

    // ========== Ordering ==========

    #[test]
    fn test_entries_ordered_by_descending_delta_then_id() {
        let report = compute(
            &levels(&[("python", 3)]),
            &levels(&[("python", 4), ("ml", 3), ("sql", 3), ("git", 3)]),
            &ontology(),
        );
        let order: Vec<_> = report.entries.iter().map(|e| e.skill_id.as_str()).collect();
        // ml, git, sql all have delta 3 -> ascending id; python delta 1 last.
        assert_eq!(order, vec!["git", "ml", "sql", "python"]);
    }

    // ========== Scoring ==========

    #[test]
    fn test_overall_score_is_level_weighted() {
        // python: weight 4, delta 1; ml: weight 3, delta 3.
        let report = compute(
            &levels(&[("python", 3)]),
            &levels(&[("python", 4), ("ml", 3)]),
            &ontology(),
        );
        let expected = (4.0 * 1.0 + 3.0 * 3.0) / 7.0;
        assert!((report.overall_score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_fully_covered_role_scores_zero() {
        let report = compute(
            &levels(&[("python", 4), ("sql", 3)]),
            &levels(&[("python", 4), ("sql", 2)]),
            &ontology(),
        );
        assert!((report.overall_score - 0.0).abs() < f64::EPSILON);
        assert_eq!(report.summary.met, 2);
    }

    #[test]
    fn test_empty_role_is_empty_report_not_error() {
        let report = compute(&levels(&[("python", 5)]), &levels(&[]), &ontology());
        assert!(report.entries.is_empty());
        assert!((report.overall_score - 0.0).abs() < f64::EPSILON);
        assert!(report.missing.is_empty());
        assert_eq!(report.summary, GapSummary::default());
    }

    #[test]
    fn test_zero_level_requirements_score_zero() {
        // All weights zero: the weighted mean degenerates to 0, not NaN.
        let report = compute(&levels(&[]), &levels(&[("sql", 0)]), &ontology());
        assert!((report.overall_score - 0.0).abs() < f64::EPSILON);
        assert_eq!(report.entries[0].status, GapStatus::Met);
    }

    // ========== Summary and carried state ==========

    #[test]
    fn test_summary_counts_buckets() {
        let report = compute(
            &levels(&[("python", 4), ("sql", 1)]),
            &levels(&[("python", 3), ("sql", 3), ("ml", 2)]),
            &ontology(),
        );
        assert_eq!(
            report.summary,
            GapSummary {
                required: 3,
                met: 1,
                below: 1,
                missing: 1,
            }
        );
    }

    #[test]
    fn test_report_carries_employee_levels() {
        let employee = levels(&[("python", 3), ("git", 2)]);
        let report = compute(&employee, &levels(&[("python", 4)]), &ontology());
        assert_eq!(report.employee_levels, employee);
    }

    #[test]
    fn test_compute_is_deterministic() {
        let employee = levels(&[("python", 2)]);
        let role = levels(&[("python", 4), ("ml", 3), ("sql", 3)]);
        let first = compute(&employee, &role, &ontology());
        let second = compute(&employee, &role, &ontology());
        assert_eq!(first, second);
    }

    #[test]
    fn test_report_serializes_round_trip() {
        let report = compute(
            &levels(&[("python", 3)]),
            &levels(&[("python", 4), ("ml", 2)]),
            &ontology(),
        );
        let json = serde_json::to_string(&report).unwrap();
        let back: GapReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}

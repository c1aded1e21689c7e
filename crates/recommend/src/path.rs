//! Learning path construction: demand closure, ordering, costs, and budget.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use upskill_analyze::{GapEntry, GapReport};
use upskill_ontology::{EdgeKind, Ontology, SkillId, SkillLevel};

/// Default cost of raising a skill by one level before prerequisite weights.
pub const DEFAULT_BASE_LEVEL_COST: f64 = 1.0;
/// Default level an acquired prerequisite is learned to.
pub const DEFAULT_PREREQ_TARGET_LEVEL: SkillLevel = SkillLevel::AWARENESS;

// ============================================================================
// Options and Errors
// ============================================================================

/// Tuning knobs for path construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendOptions {
    /// Per-level cost floor added to a step's prerequisite edge weights, so
    /// prerequisite-free skills are never free to learn.
    pub base_level_cost: f64,
    /// Level an unsatisfied prerequisite that is not itself a demand is
    /// acquired to.
    pub prereq_target_level: SkillLevel,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            base_level_cost: DEFAULT_BASE_LEVEL_COST,
            prereq_target_level: DEFAULT_PREREQ_TARGET_LEVEL,
        }
    }
}

/// Errors aborting one recommendation request.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum RecommendError {
    /// The induced prerequisite subgraph contains a cycle. The ontology's
    /// load-time validation makes this unreachable for stores it built, but
    /// the traversal checks anyway rather than emit a wrong order.
    #[error("Prerequisite cycle in learning path: {chain}")]
    PrerequisiteCycle {
        /// The cycle as a readable chain (e.g. "a -> b -> a").
        chain: String,
    },
}

// ============================================================================
// Output
// ============================================================================

/// One item in the upskilling path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationStep {
    /// Canonical skill id.
    pub skill_id: SkillId,
    /// Display name from the ontology.
    pub display_name: String,
    /// Level the employee holds today.
    pub current_level: SkillLevel,
    /// Level this step raises the skill to.
    pub target_level: SkillLevel,
    /// `(target - current) x (base level cost + incoming prerequisite edge
    /// weights)`.
    pub estimated_cost: f64,
    /// Demand skills with a direct prerequisite edge from this step,
    /// ascending id.
    pub unlocks: Vec<SkillId>,
    /// Advisory one-line description; the structured fields are the
    /// interface.
    pub summary: String,
}

/// Ordered learning sequence closing a gap report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningPath {
    /// Steps in suggested learning order: every step's unsatisfied
    /// prerequisites appear earlier.
    pub steps: Vec<RecommendationStep>,
    /// Sum of the kept steps' estimated costs.
    pub total_cost: f64,
    /// Sum of the gap deltas the kept steps close.
    pub closed_delta: u32,
    /// Demand skills dropped by the budget, ascending id.
    pub deferred: Vec<SkillId>,
}

// ============================================================================
// Recommendation
// ============================================================================

/// Build a learning path with default options.
pub fn recommend(
    report: &GapReport,
    ontology: &Ontology,
    budget: Option<f64>,
) -> Result<LearningPath, RecommendError> {
    recommend_with(report, ontology, budget, &RecommendOptions::default())
}

/// Build a learning path.
///
/// Every gap entry with a positive delta is a demand. The plan covers the
/// demands plus their transitive prerequisites the employee does not hold at
/// any level, ordered prerequisites-first; ties break by descending delta
/// then ascending id. With a budget, the longest affordable prefix of that
/// order is kept and the demands it misses are deferred.
pub fn recommend_with(
    report: &GapReport,
    ontology: &Ontology,
    budget: Option<f64>,
    options: &RecommendOptions,
) -> Result<LearningPath, RecommendError> {
    let demands: BTreeMap<&str, &GapEntry> = report
        .entries
        .iter()
        .filter(|entry| entry.delta > 0)
        .map(|entry| (entry.skill_id.as_str(), entry))
        .collect();
    if demands.is_empty() {
        return Ok(LearningPath::default());
    }

    let held = |id: &str| -> SkillLevel {
        report.employee_levels.get(id).copied().unwrap_or_default()
    };

    // Demand closure: walk prerequisite edges backwards, stopping at skills
    // the employee already holds at any level.
    let mut plan: BTreeSet<SkillId> = demands.keys().map(|id| (*id).to_string()).collect();
    let mut pending: Vec<SkillId> = plan.iter().cloned().collect();
    while let Some(id) = pending.pop() {
        for edge in ontology.edges_into(&id, EdgeKind::Prerequisite) {
            let prereq = &edge.node.id;
            if !held(prereq).is_absent() {
                continue;
            }
            if plan.insert(prereq.clone()) {
                pending.push(prereq.clone());
            }
        }
    }

    let order = topo_order(&plan, &demands, ontology)?;

    let mut path = LearningPath::default();
    for id in order {
        let current = held(&id);
        let (target, delta) = match demands.get(id.as_str()) {
            Some(entry) => (entry.required_level, u32::from(entry.delta)),
            None => (options.prereq_target_level, 0),
        };

        let prereq_weight: f64 = ontology
            .edges_into(&id, EdgeKind::Prerequisite)
            .iter()
            .map(|edge| edge.weight)
            .sum();
        let distance = f64::from(target.get().saturating_sub(current.get()));
        let estimated_cost = distance * (options.base_level_cost + prereq_weight);

        if let Some(limit) = budget {
            if path.total_cost + estimated_cost > limit {
                tracing::debug!(
                    "Budget {limit} exhausted at '{id}' (cost {estimated_cost:.2}); deferring"
                );
                break;
            }
        }

        let unlocks = direct_unlocks(&id, &demands, ontology);
        let node = ontology.get(&id);
        let display_name =
            node.map_or_else(|| id.clone(), |node| node.display_name.clone());
        let summary = step_summary(&display_name, current, target, &unlocks, ontology);

        path.total_cost += estimated_cost;
        path.closed_delta += delta;
        path.steps.push(RecommendationStep {
            skill_id: id,
            display_name,
            current_level: current,
            target_level: target,
            estimated_cost,
            unlocks,
            summary,
        });
    }

    let kept: BTreeSet<&str> = path.steps.iter().map(|s| s.skill_id.as_str()).collect();
    path.deferred = demands
        .keys()
        .filter(|id| !kept.contains(*id))
        .map(|id| (*id).to_string())
        .collect();

    tracing::debug!(
        "Path built: {} steps, cost {:.2}, {} deferred",
        path.steps.len(),
        path.total_cost,
        path.deferred.len()
    );
    Ok(path)
}

// ============================================================================
// Ordering
// ============================================================================

/// Kahn's algorithm over the prerequisite edges between plan nodes. The
/// ready set is keyed by (descending delta, ascending id) so unconstrained
/// ties pop in the same order the gap report lists them.
fn topo_order(
    plan: &BTreeSet<SkillId>,
    demands: &BTreeMap<&str, &GapEntry>,
    ontology: &Ontology,
) -> Result<Vec<SkillId>, RecommendError> {
    let delta_of = |id: &str| demands.get(id).map_or(0, |entry| entry.delta);

    // Parallel edges collapse: ordering cares about reachability only.
    let mut predecessors: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    let mut successors: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for id in plan {
        for edge in ontology.edges_into(id, EdgeKind::Prerequisite) {
            let prereq = edge.node.id.as_str();
            if plan.contains(prereq) {
                predecessors.entry(id.as_str()).or_default().insert(prereq);
                successors.entry(prereq).or_default().insert(id.as_str());
            }
        }
    }

    let mut indegree: HashMap<&str, usize> = plan
        .iter()
        .map(|id| {
            let id = id.as_str();
            (id, predecessors.get(id).map_or(0, BTreeSet::len))
        })
        .collect();

    let mut ready: BTreeSet<(Reverse<u8>, &str)> = indegree
        .iter()
        .filter(|(_, &degree)| degree == 0)
        .map(|(&id, _)| (Reverse(delta_of(id)), id))
        .collect();

    let mut order: Vec<SkillId> = Vec::with_capacity(plan.len());
    while let Some((_, id)) = ready.pop_first() {
        order.push(id.to_string());
        if let Some(next) = successors.get(id) {
            for &succ in next {
                if let Some(degree) = indegree.get_mut(succ) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert((Reverse(delta_of(succ)), succ));
                    }
                }
            }
        }
    }

    if order.len() < plan.len() {
        let stuck: BTreeSet<&str> = plan
            .iter()
            .map(SkillId::as_str)
            .filter(|id| !order.iter().any(|done| done.as_str() == *id))
            .collect();
        return Err(RecommendError::PrerequisiteCycle {
            chain: cycle_chain(&stuck, &successors),
        });
    }
    Ok(order)
}

/// Extract one cycle from the stuck nodes by following successor edges until
/// a node repeats. Starts from the smallest id so the chain is reproducible.
fn cycle_chain(stuck: &BTreeSet<&str>, successors: &HashMap<&str, BTreeSet<&str>>) -> String {
    let Some(&start) = stuck.iter().next() else {
        return String::new();
    };
    let mut chain: Vec<&str> = vec![start];
    let mut current = start;
    loop {
        let next = successors
            .get(current)
            .and_then(|set| set.iter().find(|id| stuck.contains(*id)))
            .copied();
        let Some(next) = next else { break };
        if let Some(pos) = chain.iter().position(|&id| id == next) {
            chain.push(next);
            return chain[pos..].join(" -> ");
        }
        chain.push(next);
        current = next;
    }
    chain.join(" -> ")
}

// ============================================================================
// Step Details
// ============================================================================

/// Demand skills one prerequisite hop downstream of `id`, ascending.
fn direct_unlocks(
    id: &str,
    demands: &BTreeMap<&str, &GapEntry>,
    ontology: &Ontology,
) -> Vec<SkillId> {
    let unlocked: BTreeSet<&str> = ontology
        .neighbors(id, EdgeKind::Prerequisite)
        .into_iter()
        .map(|node| node.id.as_str())
        .filter(|target| demands.contains_key(target))
        .collect();
    unlocked.into_iter().map(str::to_string).collect()
}

/// Advisory one-liner: "Raise Python from intermediate (3) to advanced (4);
/// unlocks Machine Learning".
fn step_summary(
    display_name: &str,
    current: SkillLevel,
    target: SkillLevel,
    unlocks: &[SkillId],
    ontology: &Ontology,
) -> String {
    let mut text = if current.is_absent() {
        format!(
            "Acquire {display_name} at {} ({target})",
            target.label()
        )
    } else {
        format!(
            "Raise {display_name} from {} ({current}) to {} ({target})",
            current.label(),
            target.label()
        )
    };
    if !unlocks.is_empty() {
        let names: Vec<&str> = unlocks
            .iter()
            .map(|id| {
                ontology
                    .get(id)
                    .map_or(id.as_str(), |node| node.display_name.as_str())
            })
            .collect();
        text.push_str("; unlocks ");
        text.push_str(&names.join(", "));
    }
    text
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod scenario_tests {
    //! End-to-end pipeline checks on raw labels through normalization,
    //! gap analysis, and recommendation.

    use super::*;
    use upskill_analyze::compute;
    use upskill_normalize::{normalize_map, MatcherConfig};
    use upskill_ontology::{SkillMap, TaxonomyDef};

    #[test]
    fn test_python_ml_scenario() {
        let def: TaxonomyDef = serde_json::from_str(
            r#"{
                "skills": [
                    {"id": "python", "display_name": "Python", "synonyms": ["py"]},
                    {"id": "ml", "display_name": "Machine Learning"}
                ],
                "edges": [
                    {"kind": "is-prerequisite-of", "from_id": "python", "to_id": "ml", "weight": 2.0}
                ]
            }"#,
        )
        .unwrap();
        let ontology = Ontology::load(def).unwrap();
        let config = MatcherConfig::default();

        let employee: SkillMap = serde_json::from_str(r#"{"py": 3}"#).unwrap();
        let role: SkillMap =
            serde_json::from_str(r#"{"Python": 4, "Machine Learning": 3}"#).unwrap();

        let employee = normalize_map(&employee, &ontology, &config);
        let role = normalize_map(&role, &ontology, &config);
        assert!(employee.unmatched.is_empty());
        assert!(role.unmatched.is_empty());

        let report = compute(&employee.levels, &role.levels, &ontology);
        let deltas: Vec<_> = report
            .entries
            .iter()
            .map(|e| (e.skill_id.as_str(), e.delta))
            .collect();
        // ML first in the report (higher delta), python second.
        assert_eq!(deltas, vec![("ml", 3), ("python", 1)]);
        assert_eq!(report.missing, vec!["ml".to_string()]);

        // The path inverts that: upgrade python before acquiring ml.
        let path = recommend(&report, &ontology, None).unwrap();
        let order: Vec<_> = path.steps.iter().map(|s| s.skill_id.as_str()).collect();
        assert_eq!(order, vec!["python", "ml"]);
        assert_eq!(path.closed_delta, 4);
    }
}

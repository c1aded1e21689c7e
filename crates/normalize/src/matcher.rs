//! The normalization cascade: exact, synonym, then guarded fuzzy matching.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use upskill_ontology::{
    canonical_label, LabelKind, Ontology, SkillId, SkillLevel, SkillMap, SkillNode,
};

use crate::similarity::{edit_similarity, suggestion_similarity};

/// Default minimum fuzzy score for auto-resolving a label.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.8;
/// Default lead the best node must hold over the runner-up.
pub const DEFAULT_FUZZY_MARGIN: f64 = 0.05;
/// Default minimum trigram score for a "did you mean" candidate.
pub const DEFAULT_SUGGESTION_THRESHOLD: f64 = 0.3;
/// Default cap on suggestions per unmatched label.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 3;

// ============================================================================
// Configuration
// ============================================================================

/// Tuning knobs for the matcher. Defaults match the constants above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Fuzzy score the best candidate must exceed to auto-resolve.
    pub fuzzy_threshold: f64,
    /// Gap to the best other node that must be exceeded; anything closer is
    /// ambiguous and stays unmatched.
    pub fuzzy_margin: f64,
    /// Trigram score a suggestion must reach to be shown.
    pub suggestion_threshold: f64,
    /// Maximum suggestions attached to an unmatched label.
    pub max_suggestions: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            fuzzy_margin: DEFAULT_FUZZY_MARGIN,
            suggestion_threshold: DEFAULT_SUGGESTION_THRESHOLD,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// A ranked candidate for an unrecognized label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Candidate node id.
    pub id: SkillId,
    /// Candidate display name.
    pub display_name: String,
    /// Trigram similarity to the unmatched label.
    pub score: f64,
}

/// Outcome of normalizing a single label. `Unmatched` is a first-class
/// result, not an error: the caller decides whether to surface it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Normalization {
    /// The label equals a node's id or display name.
    Matched {
        /// Resolved node id.
        id: SkillId,
    },
    /// The label equals one of a node's synonyms.
    SynonymMatched {
        /// Resolved node id.
        id: SkillId,
    },
    /// The label resolved through string similarity.
    FuzzyMatched {
        /// Resolved node id.
        id: SkillId,
        /// Similarity score, strictly between 0 and 1.
        confidence: f64,
    },
    /// No node is a safe match.
    Unmatched {
        /// The original label as given.
        label: String,
        /// Ranked candidates the caller can offer for clarification.
        suggestions: Vec<Suggestion>,
    },
}

impl Normalization {
    /// The resolved node id, if any stage matched.
    #[must_use]
    pub fn node_id(&self) -> Option<&str> {
        match self {
            Normalization::Matched { id }
            | Normalization::SynonymMatched { id }
            | Normalization::FuzzyMatched { id, .. } => Some(id),
            Normalization::Unmatched { .. } => None,
        }
    }

    /// Match confidence: 1.0 for exact stages, the similarity score for
    /// fuzzy matches, 0.0 for unmatched.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        match self {
            Normalization::Matched { .. } | Normalization::SynonymMatched { .. } => 1.0,
            Normalization::FuzzyMatched { confidence, .. } => *confidence,
            Normalization::Unmatched { .. } => 0.0,
        }
    }

    /// Whether no stage resolved the label.
    #[must_use]
    pub fn is_unmatched(&self) -> bool {
        matches!(self, Normalization::Unmatched { .. })
    }
}

/// A label no stage could resolve, with its suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedLabel {
    /// The original label as given.
    pub label: String,
    /// Ranked candidates.
    pub suggestions: Vec<Suggestion>,
}

/// Aggregate outcome of normalizing a whole skill map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMap {
    /// Resolved levels keyed by node id. When two labels reach the same
    /// node, the higher level wins (best evidence of the skill).
    pub levels: BTreeMap<SkillId, SkillLevel>,
    /// Labels no stage could resolve, in ascending label order.
    pub unmatched: Vec<UnmatchedLabel>,
}

// ============================================================================
// Normalization
// ============================================================================

/// Resolve one free-form label against the ontology.
///
/// Stages, first success wins: exact id/display-name match, exact synonym
/// match, then fuzzy matching guarded by threshold and margin.
#[must_use]
pub fn normalize(label: &str, ontology: &Ontology, config: &MatcherConfig) -> Normalization {
    if let Some((node, kind)) = ontology.resolve_label(label) {
        return match kind {
            LabelKind::Id | LabelKind::Display => Normalization::Matched {
                id: node.id.clone(),
            },
            LabelKind::Synonym => Normalization::SynonymMatched {
                id: node.id.clone(),
            },
        };
    }

    let query = canonical_label(label);
    if !query.is_empty() {
        if let Some(hit) = fuzzy_match(&query, ontology, config) {
            return hit;
        }
    }

    Normalization::Unmatched {
        label: label.to_string(),
        suggestions: suggest(&query, ontology, config),
    }
}

/// Normalize every label of a skill map.
///
/// Labels are processed in ascending order so the output (including the
/// unmatched list) is deterministic regardless of map iteration order.
#[must_use]
pub fn normalize_map(map: &SkillMap, ontology: &Ontology, config: &MatcherConfig) -> NormalizedMap {
    let mut labels: Vec<(&String, &SkillLevel)> = map.iter().collect();
    labels.sort_by(|a, b| a.0.cmp(b.0));

    let mut result = NormalizedMap::default();
    for (label, &level) in labels {
        match normalize(label, ontology, config) {
            Normalization::Matched { id }
            | Normalization::SynonymMatched { id }
            | Normalization::FuzzyMatched { id, .. } => {
                let slot = result.levels.entry(id).or_insert(level);
                if level > *slot {
                    *slot = level;
                }
            }
            Normalization::Unmatched { label, suggestions } => {
                result.unmatched.push(UnmatchedLabel { label, suggestions });
            }
        }
    }

    if !result.unmatched.is_empty() {
        tracing::debug!(
            "Normalized {} labels, {} unmatched",
            map.len(),
            result.unmatched.len()
        );
    }
    result
}

/// Fuzzy stage: score every node by its best display-name/synonym label and
/// accept the winner only when it clears the threshold with enough of a lead
/// over the best other node.
///
/// Scores the nodes directly rather than the label index: the index dedupes
/// a display name that canonicalizes to the node's own id (id "python",
/// display "Python"), and the human labels must stay in play here. Ids
/// themselves are not scored; the exact stage already covered them.
fn fuzzy_match(query: &str, ontology: &Ontology, config: &MatcherConfig) -> Option<Normalization> {
    let mut ranked: Vec<(f64, &SkillNode)> = ontology
        .nodes()
        .iter()
        .map(|node| {
            let mut best = edit_similarity(query, &canonical_label(&node.display_name));
            for synonym in &node.synonyms {
                let score = edit_similarity(query, &canonical_label(synonym));
                if score > best {
                    best = score;
                }
            }
            (best, node)
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.id.cmp(&b.1.id))
    });

    let &(top_score, top_node) = ranked.first()?;
    if top_score <= config.fuzzy_threshold {
        return None;
    }
    let runner_up = ranked.get(1).map_or(0.0, |&(score, _)| score);
    if top_score - runner_up <= config.fuzzy_margin {
        tracing::debug!(
            "Fuzzy match for '{query}' is ambiguous: '{}' at {top_score:.3} vs runner-up at {runner_up:.3}",
            top_node.id
        );
        return None;
    }

    tracing::debug!(
        "Fuzzy-matched '{query}' to '{}' at {top_score:.3}",
        top_node.id
    );
    Some(Normalization::FuzzyMatched {
        id: top_node.id.clone(),
        confidence: top_score,
    })
}

/// Rank "did you mean" candidates for an unmatched label using trigram
/// similarity over every label in the index.
fn suggest(query: &str, ontology: &Ontology, config: &MatcherConfig) -> Vec<Suggestion> {
    if query.is_empty() || config.max_suggestions == 0 {
        return Vec::new();
    }

    let mut best_per_node: HashMap<&str, (f64, &SkillNode)> = HashMap::new();
    for entry in ontology.labels() {
        let score = suggestion_similarity(query, entry.label);
        if score < config.suggestion_threshold {
            continue;
        }
        match best_per_node.entry(entry.node.id.as_str()) {
            std::collections::hash_map::Entry::Occupied(mut slot) => {
                if score > slot.get().0 {
                    slot.insert((score, entry.node));
                }
            }
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert((score, entry.node));
            }
        }
    }

    let mut ranked: Vec<(f64, &SkillNode)> = best_per_node.into_values().collect();
    ranked.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.id.cmp(&b.1.id))
    });
    ranked.truncate(config.max_suggestions);

    ranked
        .into_iter()
        .map(|(score, node)| Suggestion {
            id: node.id.clone(),
            display_name: node.display_name.clone(),
            score,
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use upskill_ontology::TaxonomyDef;

    fn fixture() -> Ontology {
        let def: TaxonomyDef = serde_json::from_str(
            r#"{
                "skills": [
                    {"id": "python", "display_name": "Python", "synonyms": ["py"]},
                    {"id": "ml", "display_name": "Machine Learning", "synonyms": ["machine-learning"]},
                    {"id": "testing", "display_name": "Testing"},
                    {"id": "texting", "display_name": "Texting"}
                ],
                "edges": []
            }"#,
        )
        .unwrap();
        Ontology::load(def).unwrap()
    }

    fn config() -> MatcherConfig {
        MatcherConfig::default()
    }

    // ========== Exact and synonym stages ==========

    #[test]
    fn test_exact_display_name_any_case() {
        let result = normalize("  PYTHON ", &fixture(), &config());
        assert_eq!(
            result,
            Normalization::Matched {
                id: "python".to_string()
            }
        );
        assert!((result.confidence() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_exact_id_match() {
        let result = normalize("ml", &fixture(), &config());
        assert_eq!(result.node_id(), Some("ml"));
        assert!(matches!(result, Normalization::Matched { .. }));
    }

    #[test]
    fn test_synonym_match() {
        let result = normalize("Py", &fixture(), &config());
        assert_eq!(
            result,
            Normalization::SynonymMatched {
                id: "python".to_string()
            }
        );
    }

    #[test]
    fn test_hyphenated_synonym_match() {
        let result = normalize("Machine-Learning", &fixture(), &config());
        assert!(matches!(result, Normalization::SynonymMatched { .. }));
        assert_eq!(result.node_id(), Some("ml"));
    }

    // ========== Fuzzy stage ==========

    #[test]
    fn test_fuzzy_resolves_single_typo() {
        let result = normalize("Pythn", &fixture(), &config());
        match result {
            Normalization::FuzzyMatched { id, confidence } => {
                assert_eq!(id, "python");
                assert!(confidence > 0.8 && confidence < 1.0, "got {confidence}");
            }
            other => panic!("expected FuzzyMatched, got {other:?}"),
        }
    }

    #[test]
    fn test_fuzzy_reaches_display_name_that_lowercases_to_id() {
        // "Testing" canonicalizes to its own id and carries no synonyms; the
        // label index stores it once, but a typo must still score against
        // the display name.
        let result = normalize("testng", &fixture(), &config());
        match result {
            Normalization::FuzzyMatched { id, confidence } => {
                assert_eq!(id, "testing");
                assert!(confidence > 0.8 && confidence < 1.0, "got {confidence}");
            }
            other => panic!("expected FuzzyMatched, got {other:?}"),
        }
    }

    #[test]
    fn test_fuzzy_equidistant_candidates_stay_unmatched() {
        // "teting" is one edit from both "testing" and "texting"; resolving
        // either would be arbitrary.
        let result = normalize("teting", &fixture(), &config());
        match result {
            Normalization::Unmatched { label, suggestions } => {
                assert_eq!(label, "teting");
                let ids: Vec<_> = suggestions.iter().map(|s| s.id.as_str()).collect();
                assert_eq!(ids, vec!["testing", "texting"]);
            }
            other => panic!("expected Unmatched, got {other:?}"),
        }
    }

    #[test]
    fn test_fuzzy_clear_winner_beats_near_rival() {
        // "testin" is one edit from "testing" but two from "texting", so the
        // margin is satisfied.
        let result = normalize("testin", &fixture(), &config());
        assert_eq!(result.node_id(), Some("testing"));
        assert!(matches!(result, Normalization::FuzzyMatched { .. }));
    }

    #[test]
    fn test_fuzzy_threshold_is_configurable() {
        let strict = MatcherConfig {
            fuzzy_threshold: 0.95,
            ..MatcherConfig::default()
        };
        let result = normalize("Pythn", &fixture(), &strict);
        assert!(result.is_unmatched());
    }

    #[test]
    fn test_transposition_falls_below_default_threshold() {
        // Two edits out of six is 0.667, under the 0.8 default.
        let result = normalize("pyhton", &fixture(), &config());
        assert!(result.is_unmatched());
    }

    // ========== Unmatched and suggestions ==========

    #[test]
    fn test_unrelated_label_unmatched_without_suggestions() {
        let result = normalize("underwater basket weaving", &fixture(), &config());
        match result {
            Normalization::Unmatched { suggestions, .. } => assert!(suggestions.is_empty()),
            other => panic!("expected Unmatched, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_label_unmatched() {
        for label in ["", "   "] {
            let result = normalize(label, &fixture(), &config());
            match result {
                Normalization::Unmatched { suggestions, .. } => assert!(suggestions.is_empty()),
                other => panic!("expected Unmatched for {label:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_word_order_variant_gets_suggested_not_resolved() {
        // Edit distance keeps "learning machine" far from "machine learning",
        // but trigram similarity surfaces it as the top suggestion.
        let result = normalize("learning machine", &fixture(), &config());
        match result {
            Normalization::Unmatched { suggestions, .. } => {
                assert_eq!(suggestions[0].id, "ml");
                assert_eq!(suggestions[0].display_name, "Machine Learning");
                assert!(suggestions[0].score > 0.9);
            }
            other => panic!("expected Unmatched, got {other:?}"),
        }
    }

    #[test]
    fn test_suggestions_capped() {
        let capped = MatcherConfig {
            max_suggestions: 1,
            ..MatcherConfig::default()
        };
        if let Normalization::Unmatched { suggestions, .. } =
            normalize("teting", &fixture(), &capped)
        {
            assert_eq!(suggestions.len(), 1);
            assert_eq!(suggestions[0].id, "testing");
        } else {
            panic!("expected Unmatched");
        }
    }

    // ========== normalize_map ==========

    #[test]
    fn test_map_merges_same_node_by_max_level() {
        let map: SkillMap = serde_json::from_str(r#"{"py": 3, "Python": 2}"#).unwrap();
        let result = normalize_map(&map, &fixture(), &config());
        assert_eq!(result.levels.len(), 1);
        assert_eq!(result.levels["python"].get(), 3);
        assert!(result.unmatched.is_empty());
    }

    #[test]
    fn test_map_collects_unmatched_in_label_order() {
        let map: SkillMap =
            serde_json::from_str(r#"{"py": 3, "zzz-unknown": 1, "cobol": 2}"#).unwrap();
        let result = normalize_map(&map, &fixture(), &config());
        assert_eq!(result.levels.len(), 1);
        let labels: Vec<_> = result.unmatched.iter().map(|u| u.label.as_str()).collect();
        assert_eq!(labels, vec!["cobol", "zzz-unknown"]);
    }

    #[test]
    fn test_map_normalization_is_idempotent() {
        let raw: SkillMap = serde_json::from_str(r#"{"py": 3, "Machine Learning": 2}"#).unwrap();
        let first = normalize_map(&raw, &fixture(), &config());

        let as_labels: SkillMap = first
            .levels
            .iter()
            .map(|(id, &level)| (id.clone(), level))
            .collect();
        let second = normalize_map(&as_labels, &fixture(), &config());

        assert_eq!(first.levels, second.levels);
        assert!(second.unmatched.is_empty());
    }

    #[test]
    fn test_empty_map() {
        let result = normalize_map(&SkillMap::new(), &fixture(), &config());
        assert!(result.levels.is_empty());
        assert!(result.unmatched.is_empty());
    }
}

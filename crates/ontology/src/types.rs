//! Core data model: skill identity, proficiency levels, and typed edges.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Stable identifier of a skill within an ontology.
pub type SkillId = String;

/// Mapping from skill label to asserted proficiency level.
///
/// Pre-normalization the keys are untrusted free-text labels; after
/// normalization they are [`SkillId`]s.
pub type SkillMap = HashMap<String, SkillLevel>;

// ============================================================================
// Proficiency
// ============================================================================

/// Proficiency on a bounded 0-5 scale; 0 means the skill is absent.
///
/// Levels are caller-asserted and clamped, never rejected: construction and
/// deserialization both pull out-of-range values back into the scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SkillLevel(u8);

impl SkillLevel {
    /// Lowest level: the skill is absent.
    pub const ABSENT: SkillLevel = SkillLevel(0);
    /// Lowest held level.
    pub const AWARENESS: SkillLevel = SkillLevel(1);
    /// Highest level on the scale.
    pub const MAX: SkillLevel = SkillLevel(5);

    /// Create a level, clamping anything above the scale to [`SkillLevel::MAX`].
    #[must_use]
    pub fn new(raw: u8) -> Self {
        SkillLevel(raw.min(Self::MAX.0))
    }

    /// Clamp an arbitrary integer onto the scale (negatives become absent).
    #[must_use]
    pub fn clamp_from(raw: i64) -> Self {
        if raw <= 0 {
            Self::ABSENT
        } else if raw >= i64::from(Self::MAX.0) {
            Self::MAX
        } else {
            SkillLevel(raw as u8)
        }
    }

    /// Numeric value of the level.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Whether the skill is absent (level 0).
    #[must_use]
    pub fn is_absent(self) -> bool {
        self.0 == 0
    }

    /// Human-readable proficiency tier.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self.0 {
            0 => "absent",
            1 => "awareness",
            2 => "basic",
            3 => "intermediate",
            4 => "advanced",
            _ => "expert",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for SkillLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Ok(SkillLevel::clamp_from(raw))
    }
}

// ============================================================================
// Skill Nodes
// ============================================================================

/// Classification of a skill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Tool, language, or technology skill.
    #[default]
    Technical,
    /// Interpersonal or organizational skill.
    Soft,
    /// Industry or business-domain knowledge.
    Domain,
}

impl Category {
    /// Lowercase name as it appears in taxonomy files.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Technical => "technical",
            Category::Soft => "soft",
            Category::Domain => "domain",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical skill identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillNode {
    /// Stable identifier, unique within the ontology.
    pub id: SkillId,
    /// Human-readable label.
    pub display_name: String,
    /// Classification tag.
    #[serde(default)]
    pub category: Category,
    /// Alternate labels resolving to this node. Each synonym may belong to
    /// at most one node ontology-wide; violations are load errors.
    #[serde(default)]
    pub synonyms: BTreeSet<String>,
}

// ============================================================================
// Edges
// ============================================================================

/// Relation kind between two skill nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// The two nodes name the same skill.
    #[serde(rename = "is-synonym-of")]
    Synonym,
    /// `from` is a narrower facet of `to`.
    #[serde(rename = "is-sub-skill-of")]
    SubSkill,
    /// `from` must be learned before `to`. These edges must form a DAG.
    #[serde(rename = "is-prerequisite-of")]
    Prerequisite,
    /// Loose association, direction not meaningful.
    #[serde(rename = "is-related-to")]
    Related,
}

impl EdgeKind {
    /// Kind name as it appears in taxonomy files.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            EdgeKind::Synonym => "is-synonym-of",
            EdgeKind::SubSkill => "is-sub-skill-of",
            EdgeKind::Prerequisite => "is-prerequisite-of",
            EdgeKind::Related => "is-related-to",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Typed, weighted relation between two skill nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEdge {
    /// Relation kind.
    pub kind: EdgeKind,
    /// Source node id.
    pub from_id: SkillId,
    /// Target node id.
    pub to_id: SkillId,
    /// Cost or strength of the relation; finite and non-negative.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

// ============================================================================
// Tests
// ============================================================================

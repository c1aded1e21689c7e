//! Declarative taxonomy definition consumed by [`Ontology::load`].
//!
//! A taxonomy file enumerates skills and typed edges. JSON form:
//!
//! ```json
//! {
//!   "skills": [
//!     {"id": "python", "display_name": "Python", "synonyms": ["py"]},
//!     {"id": "ml", "display_name": "Machine Learning", "category": "technical"}
//!   ],
//!   "edges": [
//!     {"kind": "is-prerequisite-of", "from_id": "python", "to_id": "ml", "weight": 2.0}
//!   ]
//! }
//! ```
//!
//! The equivalent YAML is accepted by the CLI; this crate only sees the
//! parsed [`TaxonomyDef`].
//!
//! [`Ontology::load`]: crate::Ontology::load

use serde::{Deserialize, Serialize};

use crate::types::{SkillEdge, SkillNode};

/// Parsed taxonomy definition: the serializable form of an ontology.
///
/// Structure alone does not make a valid ontology; referential and
/// acyclicity rules are enforced by [`Ontology::load`].
///
/// [`Ontology::load`]: crate::Ontology::load
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyDef {
    /// Skill nodes, in file order.
    #[serde(default)]
    pub skills: Vec<SkillNode>,
    /// Typed edges between skills, in file order.
    #[serde(default)]
    pub edges: Vec<SkillEdge>,
}

impl TaxonomyDef {
    /// Definition with no skills and no edges; loads into an empty ontology.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

//! Skill taxonomy graph for gap analysis and upskilling paths.
//!
//! This crate owns the data model (skills, proficiency levels, typed edges)
//! and the validated, immutable [`Ontology`] store the rest of the engine
//! reads from:
//! - label lookup (exact id/display-name, synonyms kept separate)
//! - traversal by edge kind
//! - load-time validation, including prerequisite acyclicity
//! - atomic hot-swap of the whole structure via [`SharedOntology`]
//!
//! # Example
//!
//! ```rust
//! use upskill_ontology::{EdgeKind, Ontology, TaxonomyDef};
//!
//! let def: TaxonomyDef = serde_json::from_str(
//!     r#"{
//!         "skills": [
//!             {"id": "python", "display_name": "Python", "synonyms": ["py"]},
//!             {"id": "ml", "display_name": "Machine Learning"}
//!         ],
//!         "edges": [
//!             {"kind": "is-prerequisite-of", "from_id": "python", "to_id": "ml", "weight": 2.0}
//!         ]
//!     }"#,
//! )?;
//!
//! let ontology = Ontology::load(def)?;
//! assert_eq!(ontology.lookup("  PYTHON ").unwrap().id, "python");
//! assert_eq!(ontology.neighbors("python", EdgeKind::Prerequisite)[0].id, "ml");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod shared;
pub mod store;
pub mod taxonomy;
pub mod types;

pub use shared::SharedOntology;
pub use store::{canonical_label, EdgeView, LabelKind, LabelRef, Ontology, OntologyLoadError};
pub use taxonomy::TaxonomyDef;
pub use types::{Category, EdgeKind, SkillEdge, SkillId, SkillLevel, SkillMap, SkillNode};

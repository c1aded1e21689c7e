//! Skill label normalization against an ontology.
//!
//! Turns untrusted free-text labels ("py", " Machine-Learning ", "Pythn")
//! into canonical skill ids through a three-stage cascade: exact
//! id/display-name match, synonym match, then fuzzy matching guarded by a
//! score threshold and an ambiguity margin. Labels that survive all three
//! stages come back as [`Normalization::Unmatched`] with ranked
//! suggestions; unrecognized input is an outcome here, never an error.
//!
//! # Example
//!
//! ```rust
//! use upskill_normalize::{normalize, MatcherConfig, Normalization};
//! use upskill_ontology::{Ontology, TaxonomyDef};
//!
//! let def: TaxonomyDef = serde_json::from_str(
//!     r#"{"skills": [{"id": "python", "display_name": "Python", "synonyms": ["py"]}]}"#,
//! )?;
//! let ontology = Ontology::load(def)?;
//! let config = MatcherConfig::default();
//!
//! assert_eq!(
//!     normalize("PY", &ontology, &config),
//!     Normalization::SynonymMatched { id: "python".into() },
//! );
//! assert_eq!(normalize("Pythn", &ontology, &config).node_id(), Some("python"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod matcher;
pub mod similarity;

pub use matcher::{
    normalize, normalize_map, MatcherConfig, Normalization, NormalizedMap, Suggestion,
    UnmatchedLabel, DEFAULT_FUZZY_MARGIN, DEFAULT_FUZZY_THRESHOLD, DEFAULT_MAX_SUGGESTIONS,
    DEFAULT_SUGGESTION_THRESHOLD,
};
pub use similarity::{edit_similarity, suggestion_similarity};

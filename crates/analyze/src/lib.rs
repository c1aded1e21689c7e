//! Skill gap analysis between an employee profile and a role.
//!
//! Consumes two normalized level maps (skill id -> proficiency) and produces
//! a [`GapReport`]: one [`GapEntry`] per required skill, bucketed into
//! met/below/missing, with a level-weighted aggregate score. Computation is
//! pure and deterministic; absent employee levels default to zero rather
//! than failing.
//!
//! # Example
//!
//! ```rust
//! use upskill_analyze::{compute, GapStatus, LevelMap};
//! use upskill_ontology::{Ontology, SkillLevel, TaxonomyDef};
//!
//! let def: TaxonomyDef = serde_json::from_str(
//!     r#"{"skills": [{"id": "python", "display_name": "Python"}]}"#,
//! )?;
//! let ontology = Ontology::load(def)?;
//!
//! let employee: LevelMap = [("python".to_string(), SkillLevel::new(2))].into();
//! let role: LevelMap = [("python".to_string(), SkillLevel::new(4))].into();
//!
//! let report = compute(&employee, &role, &ontology);
//! assert_eq!(report.entries[0].delta, 2);
//! assert_eq!(report.entries[0].status, GapStatus::Below);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod gap;

pub use gap::{compute, GapEntry, GapReport, GapStatus, GapSummary, LevelMap};

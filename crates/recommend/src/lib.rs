//! Upskilling path recommendation over a gap report and an ontology.
//!
//! Turns a [`GapReport`] into a [`LearningPath`]: an ordered sequence of
//! steps that closes the report's gaps, with every step's unsatisfied
//! prerequisites scheduled before it. Ordering ties break by descending gap
//! delta then ascending skill id, mirroring the report's own ordering. An
//! optional budget keeps the longest affordable prefix of the path; this is
//! a knapsack-over-a-DAG approximation, not exact optimization.
//!
//! [`GapReport`]: upskill_analyze::GapReport

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod path;

pub use path::{
    recommend, recommend_with, LearningPath, RecommendError, RecommendOptions,
    RecommendationStep, DEFAULT_BASE_LEVEL_COST, DEFAULT_PREREQ_TARGET_LEVEL,
};

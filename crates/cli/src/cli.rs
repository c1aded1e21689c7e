//! Argument definitions for the `upskill` binary.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use upskill_normalize::{
    MatcherConfig, DEFAULT_FUZZY_MARGIN, DEFAULT_FUZZY_THRESHOLD, DEFAULT_MAX_SUGGESTIONS,
    DEFAULT_SUGGESTION_THRESHOLD,
};
use upskill_ontology::SkillLevel;
use upskill_recommend::{RecommendOptions, DEFAULT_BASE_LEVEL_COST};

/// Output format for analysis results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Plain-text tables for terminals.
    #[default]
    Table,
    /// A single JSON document for downstream tooling.
    Json,
}

/// Command-line interface for the `upskill` application.
#[derive(Debug, Parser)]
#[command(
    name = "upskill",
    about = "Skill gap analysis and prerequisite-aware upskilling paths"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available `upskill` commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compares an employee skill map against a role and prints the gap
    /// report with a learning path.
    Analyze {
        /// Taxonomy file (`.json`, `.yaml`, or `.yml`).
        #[arg(long, value_name = "FILE")]
        taxonomy: PathBuf,
        /// Employee skill map: JSON object of label -> level.
        #[arg(long, value_name = "FILE")]
        employee: PathBuf,
        /// Role requirement map: JSON object of label -> level.
        #[arg(long, value_name = "FILE")]
        role: PathBuf,
        /// Maximum total learning cost; demands beyond it are deferred.
        #[arg(long, env = "UPSKILL_BUDGET")]
        budget: Option<f64>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        #[command(flatten)]
        matcher: MatcherArgs,
        #[command(flatten)]
        recommend: RecommendArgs,
    },
    /// Loads and validates a taxonomy, printing skill and edge counts.
    Check {
        /// Taxonomy file (`.json`, `.yaml`, or `.yml`).
        #[arg(long, value_name = "FILE")]
        taxonomy: PathBuf,
    },
    /// Traces normalization for each label: match kind, confidence, and
    /// suggestions (taxonomy debugging).
    Resolve {
        /// Taxonomy file (`.json`, `.yaml`, or `.yml`).
        #[arg(long, value_name = "FILE")]
        taxonomy: PathBuf,
        /// Labels to resolve.
        #[arg(required = true)]
        labels: Vec<String>,
        #[command(flatten)]
        matcher: MatcherArgs,
    },
}

/// Normalizer tunables, shared by `analyze` and `resolve`.
#[derive(Debug, Args)]
pub struct MatcherArgs {
    /// Fuzzy score the best candidate must exceed to auto-resolve.
    #[arg(long, env = "UPSKILL_FUZZY_THRESHOLD", default_value_t = DEFAULT_FUZZY_THRESHOLD)]
    pub fuzzy_threshold: f64,
    /// Lead over the runner-up a fuzzy match must hold; closer is ambiguous.
    #[arg(long, env = "UPSKILL_FUZZY_MARGIN", default_value_t = DEFAULT_FUZZY_MARGIN)]
    pub fuzzy_margin: f64,
    /// Similarity a "did you mean" suggestion must reach to be shown.
    #[arg(long, env = "UPSKILL_SUGGESTION_THRESHOLD", default_value_t = DEFAULT_SUGGESTION_THRESHOLD)]
    pub suggestion_threshold: f64,
    /// Maximum suggestions per unmatched label.
    #[arg(long, env = "UPSKILL_MAX_SUGGESTIONS", default_value_t = DEFAULT_MAX_SUGGESTIONS)]
    pub max_suggestions: usize,
}

impl MatcherArgs {
    /// Collect the flags into a matcher configuration.
    pub fn to_config(&self) -> MatcherConfig {
        MatcherConfig {
            fuzzy_threshold: self.fuzzy_threshold,
            fuzzy_margin: self.fuzzy_margin,
            suggestion_threshold: self.suggestion_threshold,
            max_suggestions: self.max_suggestions,
        }
    }
}

/// Recommender tunables for `analyze`.
#[derive(Debug, Args)]
pub struct RecommendArgs {
    /// Per-level cost floor added to prerequisite edge weights.
    #[arg(long, env = "UPSKILL_BASE_LEVEL_COST", default_value_t = DEFAULT_BASE_LEVEL_COST)]
    pub base_level_cost: f64,
    /// Level (0-5) an acquired prerequisite is learned to.
    #[arg(long, env = "UPSKILL_PREREQ_TARGET_LEVEL", default_value_t = 1)]
    pub prereq_target_level: u8,
}

impl RecommendArgs {
    /// Collect the flags into recommender options.
    pub fn to_options(&self) -> RecommendOptions {
        RecommendOptions {
            base_level_cost: self.base_level_cost,
            prereq_target_level: SkillLevel::new(self.prereq_target_level),
        }
    }
}

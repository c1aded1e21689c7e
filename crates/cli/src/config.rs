//! Configuration file support for upskill.
//!
//! Loads settings from `~/.upskill/config.toml` with the following
//! precedence: CLI arguments > Environment variables > Config file.
//!
//! ## Configuration File Format
//!
//! ```toml
//! # ~/.upskill/config.toml
//!
//! [matcher]
//! fuzzy_threshold = 0.8
//! fuzzy_margin = 0.05
//! suggestion_threshold = 0.3
//! max_suggestions = 3
//!
//! [recommend]
//! base_level_cost = 1.0
//! prereq_target_level = 1
//! ```

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level configuration structure.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Normalizer tunables.
    #[serde(default)]
    pub matcher: MatcherSection,
    /// Recommender tunables.
    #[serde(default)]
    pub recommend: RecommendSection,
}

/// `[matcher]` section.
#[derive(Debug, Default, Deserialize)]
pub struct MatcherSection {
    /// Fuzzy score the best candidate must exceed to auto-resolve.
    pub fuzzy_threshold: Option<f64>,
    /// Required lead over the runner-up.
    pub fuzzy_margin: Option<f64>,
    /// Minimum similarity for a "did you mean" suggestion.
    pub suggestion_threshold: Option<f64>,
    /// Maximum suggestions per unmatched label.
    pub max_suggestions: Option<usize>,
}

/// `[recommend]` section.
#[derive(Debug, Default, Deserialize)]
pub struct RecommendSection {
    /// Per-level cost floor added to prerequisite edge weights.
    pub base_level_cost: Option<f64>,
    /// Level an acquired prerequisite is learned to.
    pub prereq_target_level: Option<u8>,
}

/// Returns the path to the config file (~/.upskill/config.toml).
fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".upskill").join("config.toml"))
}

/// Loads the configuration file if it exists.
///
/// Returns `Ok(None)` if the file doesn't exist.
/// Returns `Ok(Some(config))` if the file exists and parses successfully.
/// Returns `Err` if the file exists but fails to parse.
pub fn load_config() -> Result<Option<Config>> {
    let Some(path) = config_path() else {
        return Ok(None);
    };

    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&content)?;

    tracing::debug!(
        target: "upskill::config",
        path = %path.display(),
        "Loaded configuration file"
    );

    Ok(Some(config))
}

/// Applies configuration file settings to environment variables.
///
/// Only sets environment variables that are not already set, preserving
/// the precedence: CLI > ENV > config file.
///
/// This should be called early in startup, before parsing CLI arguments.
pub fn apply_config_to_env() {
    if let Ok(Some(config)) = load_config() {
        apply_to_env(&config);
    }
}

fn apply_to_env(config: &Config) {
    // Helper to set env var only if not already set
    fn set_if_absent(key: &str, value: String) {
        if std::env::var(key).is_err() {
            std::env::set_var(key, &value);
            tracing::trace!(
                target: "upskill::config",
                key,
                "Set environment variable from config file"
            );
        }
    }

    let matcher = &config.matcher;
    if let Some(v) = matcher.fuzzy_threshold {
        set_if_absent("UPSKILL_FUZZY_THRESHOLD", v.to_string());
    }
    if let Some(v) = matcher.fuzzy_margin {
        set_if_absent("UPSKILL_FUZZY_MARGIN", v.to_string());
    }
    if let Some(v) = matcher.suggestion_threshold {
        set_if_absent("UPSKILL_SUGGESTION_THRESHOLD", v.to_string());
    }
    if let Some(v) = matcher.max_suggestions {
        set_if_absent("UPSKILL_MAX_SUGGESTIONS", v.to_string());
    }

    let recommend = &config.recommend;
    if let Some(v) = recommend.base_level_cost {
        set_if_absent("UPSKILL_BASE_LEVEL_COST", v.to_string());
    }
    if let Some(v) = recommend.prereq_target_level {
        set_if_absent("UPSKILL_PREREQ_TARGET_LEVEL", v.to_string());
    }
}

//! Configuration for the affiliation resolver
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! table_path = "/srv/sonar/data/affiliations.csv"
//! threshold = 92
//! strategy = "partial_ratio"
//!
//! [[rules]]
//! member = "cern"
//! input_contains = "lucerne"
//! action = "skip_member"
//! ```
//!
//! Listing `[[rules]]` replaces the built-in rules entirely.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AffiliationError, Result};
use crate::rules::{builtin_rules, DisambiguationRule};

/// Table location used when nothing else is configured
pub const DEFAULT_TABLE_PATH: &str = "./data/affiliations.csv";

/// Scores must be strictly above this to count as a match
pub const DEFAULT_THRESHOLD: u8 = 92;

/// Environment variable overriding `table_path`
pub const TABLE_PATH_ENV: &str = "SONAR_AFFILIATIONS_TABLE";

/// How a searched affiliation is compared with a table member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Fuzzy partial ratio above the threshold
    #[default]
    PartialRatio,
    /// Member contained in the searched text, ignoring case
    Containment,
}

/// Resolver settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Tab-separated reference table
    pub table_path: PathBuf,
    /// Exclusive lower bound on a matching score (0-100)
    pub threshold: u8,
    pub strategy: MatchStrategy,
    /// Disambiguation rules in evaluation order
    pub rules: Vec<DisambiguationRule>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            table_path: PathBuf::from(DEFAULT_TABLE_PATH),
            threshold: DEFAULT_THRESHOLD,
            strategy: MatchStrategy::default(),
            rules: builtin_rules(),
        }
    }
}

impl ResolverConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.table_path = path.into();
        self
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_rules(mut self, rules: Vec<DisambiguationRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AffiliationError::Config(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a `.json` or TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| AffiliationError::Config(format!("{}: {}", path.display(), e)))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json(&content)?
        } else {
            Self::from_toml(&content)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup(TABLE_PATH_ENV).filter(|path| !path.is_empty()) {
            self.table_path = PathBuf::from(path);
        }
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.threshold > 100 {
            return Err(AffiliationError::Config(format!(
                "threshold must be between 0 and 100, got {}",
                self.threshold
            )));
        }

        if let Some(index) = self.rules.iter().position(|rule| rule.input_contains.is_empty()) {
            return Err(AffiliationError::Config(format!(
                "rule {} has an empty input_contains",
                index
            )));
        }

        Ok(())
    }
}

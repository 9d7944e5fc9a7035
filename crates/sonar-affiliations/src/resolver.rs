//! Controlled affiliation resolution
//!
//! Maps a free-text affiliation (as found on a contributor of an imported
//! document) onto the canonical names of the reference table.

use std::sync::OnceLock;

use serde::Serialize;

use crate::config::{MatchStrategy, ResolverConfig};
use crate::error::Result;
use crate::fuzz::partial_ratio;
use crate::rules::{first_applicable, RuleAction};
use crate::table::AffiliationTable;

/// Score reported for a containment match
const CONTAINMENT_SCORE: u8 = 100;

/// A table group matched by a searched affiliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AffiliationMatch {
    /// Canonical name of the matched group
    pub canonical: String,
    /// Group member that produced the match
    pub member: String,
    pub score: u8,
}

/// Resolves free-text affiliations against the reference table
///
/// The table is read on first use and kept for the resolver's lifetime. A
/// failed read is kept as well: every later call returns the same error, and
/// retrying means building a new resolver. Concurrent first calls read the
/// file once.
#[derive(Debug)]
pub struct AffiliationResolver {
    config: ResolverConfig,
    table: OnceLock<Result<AffiliationTable>>,
}

impl Default for AffiliationResolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl AffiliationResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            table: OnceLock::new(),
        }
    }

    /// Resolver over an already loaded table; `config.table_path` is unused
    pub fn with_table(config: ResolverConfig, table: AffiliationTable) -> Self {
        Self {
            config,
            table: OnceLock::from(Ok(table)),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Whether the table has been read (successfully or not)
    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    /// The reference table, read from `config.table_path` on first access
    pub fn load_table(&self) -> Result<&AffiliationTable> {
        self.table
            .get_or_init(|| {
                AffiliationTable::load(&self.config.table_path).inspect_err(|e| {
                    tracing::warn!("Affiliation resolver disabled: {}", e);
                })
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Canonical names of every group matching `searched`, in table order
    ///
    /// Empty input resolves to nothing without reading the table.
    pub fn resolve(&self, searched: &str) -> Result<Vec<String>> {
        Ok(self
            .resolve_matches(searched)?
            .into_iter()
            .map(|found| found.canonical)
            .collect())
    }

    /// Like [`resolve`](Self::resolve), keeping the member and score behind
    /// each match
    pub fn resolve_matches(&self, searched: &str) -> Result<Vec<AffiliationMatch>> {
        if searched.is_empty() {
            return Ok(Vec::new());
        }

        let table = self.load_table()?;
        let searched_lower = searched.to_lowercase();
        let mut matches: Vec<AffiliationMatch> = Vec::new();

        'groups: for group in table {
            for member in group.members() {
                let Some(score) = self.member_score(searched, &searched_lower, member) else {
                    continue;
                };

                match first_applicable(&self.config.rules, member, &searched_lower) {
                    Some(RuleAction::SkipMember) => {
                        tracing::trace!(member = %member, "Match discarded by rule");
                        continue;
                    }
                    Some(RuleAction::SkipGroup) => {
                        tracing::trace!(canonical = group.canonical(), "Group skipped by rule");
                        continue 'groups;
                    }
                    None => {}
                }

                tracing::trace!(canonical = group.canonical(), member = %member, score, "Matched");
                if !matches.iter().any(|found| found.canonical == group.canonical()) {
                    matches.push(AffiliationMatch {
                        canonical: group.canonical().to_string(),
                        member: member.clone(),
                        score,
                    });
                }
                continue 'groups;
            }
        }

        Ok(matches)
    }

    /// Score of a member that matches under the configured strategy
    fn member_score(&self, searched: &str, searched_lower: &str, member: &str) -> Option<u8> {
        match self.config.strategy {
            MatchStrategy::PartialRatio => {
                let score = partial_ratio(searched, member);
                (score > self.config.threshold).then_some(score)
            }
            MatchStrategy::Containment => searched_lower
                .contains(&member.to_lowercase())
                .then_some(CONTAINMENT_SCORE),
        }
    }
}

//! Controlled affiliation resolution for SONAR bibliographic records
//!
//! Contributors of imported documents carry free-text affiliations such as
//! "Clinic for Cardiovascular Surgery, University Hospital Zurich". This crate
//! maps them onto the standardized institution names of a curated reference
//! table:
//!
//! - `table`: the tab-separated synonym table (canonical name + alternates)
//! - `fuzz`: partial-ratio fuzzy similarity on a 0-100 scale
//! - `rules`: ordered disambiguation rules for known name collisions
//! - `resolver`: lazy table loading and matching
//! - `enrich`: `controlledAffiliation` values on document contributions
//!
//! ```no_run
//! use sonar_affiliations::{AffiliationResolver, ResolverConfig};
//!
//! let resolver = AffiliationResolver::new(ResolverConfig::default().with_env_overrides());
//! let controlled = resolver.resolve("University Hospital Zurich, Switzerland")?;
//! # let _ = controlled;
//! # Ok::<(), sonar_affiliations::AffiliationError>(())
//! ```

pub mod config;
pub mod enrich;
pub mod error;
pub mod fuzz;
pub mod resolver;
pub mod rules;
pub mod table;

pub use config::{MatchStrategy, ResolverConfig};
pub use enrich::{enrich_contribution, enrich_contributions, Contribution};
pub use error::{AffiliationError, Result};
pub use fuzz::{partial_ratio, ratio};
pub use resolver::{AffiliationMatch, AffiliationResolver};
pub use rules::{builtin_rules, DisambiguationRule, RuleAction};
pub use table::{AffiliationGroup, AffiliationTable};

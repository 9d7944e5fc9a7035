//! Reference table helpers for integration tests

use std::path::PathBuf;

use sonar_affiliations::{AffiliationResolver, ResolverConfig};

/// Get the path to a file under the crate's `data/` directory
pub fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

/// Resolver over the bundled reference table
pub fn bundled_resolver() -> AffiliationResolver {
    AffiliationResolver::new(
        ResolverConfig::default().with_table_path(data_path("affiliations.csv")),
    )
}


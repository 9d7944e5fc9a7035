//! Controlled affiliations on document contributions
//!
//! Imported and deposited documents list their contributors with a free-text
//! `affiliation`. Enrichment resolves it and stores the canonical names as
//! `controlledAffiliation`. Resolution problems never fail the import: they
//! are logged and the contribution is left as it was.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::resolver::AffiliationResolver;

/// A contribution entry of a document's metadata
///
/// Fields this crate does not interpret are kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub role: Vec<String>,
    /// Affiliation as supplied by the author or source record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controlled_affiliation: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Contribution {
    pub fn with_affiliation(affiliation: impl Into<String>) -> Self {
        Self {
            affiliation: Some(affiliation.into()),
            ..Default::default()
        }
    }
}

/// Set `controlled_affiliation` when the affiliation resolves to something
///
/// Returns whether the contribution was changed.
pub fn enrich_contribution(resolver: &AffiliationResolver, contribution: &mut Contribution) -> bool {
    let Some(affiliation) = contribution.affiliation.as_deref() else {
        return false;
    };

    match resolver.resolve(affiliation) {
        Ok(controlled) if !controlled.is_empty() => {
            contribution.controlled_affiliation = controlled;
            true
        }
        Ok(_) => false,
        Err(e) => {
            tracing::warn!(affiliation, "No controlled affiliation determined: {}", e);
            false
        }
    }
}

/// Enrich every contribution, returning how many were changed
pub fn enrich_contributions(resolver: &AffiliationResolver, contributions: &mut [Contribution]) -> usize {
    contributions
        .iter_mut()
        .map(|contribution| enrich_contribution(resolver, contribution))
        .filter(|&changed| changed)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::table::AffiliationTable;

    fn resolver() -> AffiliationResolver {
        let table = AffiliationTable::from_reader(
            "1\tZHdK (Zurich)\tZurich University of the Arts\n2\tIST\tIST\n".as_bytes(),
        )
        .unwrap();
        AffiliationResolver::with_table(ResolverConfig::default(), table)
    }

    #[test]
    fn test_enrich_sets_controlled_affiliation() {
        let resolver = resolver();
        let mut contribution = Contribution::with_affiliation(
            "Institute for Computer Music and Sound Technology, Zurich University of the Arts",
        );
        assert!(enrich_contribution(&resolver, &mut contribution));
        assert_eq!(contribution.controlled_affiliation, vec!["ZHdK (Zurich)"]);
    }

    #[test]
    fn test_enrich_leaves_unmatched_untouched() {
        let resolver = resolver();
        let mut without = Contribution::default();
        let mut unmatched = Contribution::with_affiliation("Not existing");
        assert!(!enrich_contribution(&resolver, &mut without));
        assert!(!enrich_contribution(&resolver, &mut unmatched));
        assert!(unmatched.controlled_affiliation.is_empty());
    }

    #[test]
    fn test_enrich_survives_missing_table() {
        let resolver = AffiliationResolver::new(
            ResolverConfig::default().with_table_path("/nonexistent/affiliations.csv"),
        );
        let mut contributions = vec![Contribution::with_affiliation("IST")];
        assert_eq!(enrich_contributions(&resolver, &mut contributions), 0);
        assert!(contributions[0].controlled_affiliation.is_empty());
    }

    #[test]
    fn test_enrich_contributions_counts_changes() {
        let resolver = resolver();
        let mut contributions = vec![
            Contribution::with_affiliation("IST"),
            Contribution::with_affiliation("Not existing"),
            Contribution::default(),
        ];
        assert_eq!(enrich_contributions(&resolver, &mut contributions), 1);
    }

    #[test]
    fn test_json_shape_preserved() {
        let json = r#"{
            "agent": {"type": "bf:Person", "preferred_name": "Doe, John"},
            "role": ["cre"],
            "affiliation": "IST",
            "order": 1
        }"#;
        let mut contribution: Contribution = serde_json::from_str(json).unwrap();
        assert!(enrich_contribution(&resolver(), &mut contribution));

        let value = serde_json::to_value(&contribution).unwrap();
        assert_eq!(value["controlledAffiliation"], serde_json::json!(["IST"]));
        assert_eq!(value["agent"]["preferred_name"], "Doe, John");
        assert_eq!(value["order"], 1);
    }
}

//! Reference table of affiliation name variants
//!
//! The table is a tab-separated file with one institution per row:
//!
//! ```text
//! <id>\t<canonical>\t<alternate 1>\t<alternate 2>\t...
//! ```
//!
//! The identifier column is ignored and empty cells are dropped. A row left
//! with no names contributes nothing. There is no header row: the first line
//! is read like any other.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AffiliationError, Result};

/// One institution: its canonical name followed by its alternate forms
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct AffiliationGroup {
    members: Vec<String>,
}

impl AffiliationGroup {
    /// Build a group from names in order, dropping empty ones
    ///
    /// Returns `None` when no name is left.
    pub fn new<I, S>(names: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members: Vec<String> = names
            .into_iter()
            .map(Into::into)
            .filter(|name| !name.is_empty())
            .collect();

        if members.is_empty() {
            None
        } else {
            Some(Self { members })
        }
    }

    /// The standardized name reported for a match
    pub fn canonical(&self) -> &str {
        &self.members[0]
    }

    pub fn alternates(&self) -> &[String] {
        &self.members[1..]
    }

    /// Canonical name first, then the alternates
    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Groups are never empty
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl TryFrom<Vec<String>> for AffiliationGroup {
    type Error = String;

    fn try_from(names: Vec<String>) -> std::result::Result<Self, Self::Error> {
        Self::new(names).ok_or_else(|| "affiliation group has no names".to_string())
    }
}

impl From<AffiliationGroup> for Vec<String> {
    fn from(group: AffiliationGroup) -> Self {
        group.members
    }
}

/// Ordered affiliation groups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AffiliationTable {
    groups: Vec<AffiliationGroup>,
}

impl AffiliationTable {
    pub fn new(groups: Vec<AffiliationGroup>) -> Self {
        Self { groups }
    }

    /// Read a table file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = path.display().to_string();

        let file = File::open(path).map_err(|e| AffiliationError::data_load(&source, e))?;
        let table = Self::parse(BufReader::new(file), &source)?;

        tracing::debug!(path = %source, groups = table.len(), "Loaded affiliation table");
        Ok(table)
    }

    /// Read a table from any tab-separated source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::parse(reader, "<reader>")
    }

    fn parse<R: Read>(reader: R, source: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut groups = Vec::new();
        let mut skipped = 0usize;
        for result in reader.records() {
            let record = result.map_err(|e| AffiliationError::data_load(source, e))?;
            match AffiliationGroup::new(record.iter().skip(1)) {
                Some(group) => groups.push(group),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::debug!(source, skipped, "Skipped affiliation rows without names");
        }
        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[AffiliationGroup] {
        &self.groups
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AffiliationGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<'a> IntoIterator for &'a AffiliationTable {
    type Item = &'a AffiliationGroup;
    type IntoIter = std::slice::Iter<'a, AffiliationGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> AffiliationTable {
        AffiliationTable::from_reader(content.as_bytes()).unwrap()
    }

    #[test]
    fn test_group_requires_a_name() {
        assert!(AffiliationGroup::new(Vec::<String>::new()).is_none());
        assert!(AffiliationGroup::new(["", ""]).is_none());

        let group = AffiliationGroup::new(["", "CERN", "", "cern"]).unwrap();
        assert_eq!(group.canonical(), "CERN");
        assert_eq!(group.alternates(), ["cern".to_string()]);
        assert_eq!(group.len(), 2);
        assert!(!group.is_empty());
    }

    #[test]
    fn test_parse_skips_identifier_and_empty_cells() {
        let table = parse("1\tUni of Geneva\t\tUniversity of Geneva\tUNIGE\t\n");
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.groups()[0].members(),
            ["Uni of Geneva", "University of Geneva", "UNIGE"]
        );
    }

    #[test]
    fn test_parse_drops_rows_without_names() {
        let table = parse("1\tEPFL\n2\n3\t\t\t\n\n4\tIST\tIST\n");
        assert_eq!(table.len(), 2);
        assert_eq!(table.groups()[0].canonical(), "EPFL");
        assert_eq!(table.groups()[1].canonical(), "IST");
    }

    #[test]
    fn test_parse_first_row_is_not_a_header() {
        let table = parse("id\tname\talternate\n1\tEPFL\tEPF Lausanne\n");
        assert_eq!(table.len(), 2);
        assert_eq!(table.groups()[0].members(), ["name", "alternate"]);
    }

    #[test]
    fn test_parse_keeps_commas_and_quotes() {
        let table = parse("1\tHES-SO\t\"Haute école, Suisse occidentale\"\n");
        assert_eq!(
            table.groups()[0].alternates(),
            ["Haute école, Suisse occidentale".to_string()]
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = AffiliationTable::load("/nonexistent/affiliations.csv").unwrap_err();
        match err {
            AffiliationError::DataLoad { path, .. } => {
                assert_eq!(path, "/nonexistent/affiliations.csv")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("affiliations.csv");
        std::fs::write(&path, "1\tEPFL\tEPF Lausanne\n2\n").unwrap();

        let table = AffiliationTable::load(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.groups()[0].members(), ["EPFL", "EPF Lausanne"]);
    }

    #[test]
    fn test_load_rejects_invalid_utf8() {
        let err = AffiliationTable::from_reader(&b"1\tUniversit\xe4t Bern\n"[..]).unwrap_err();
        assert!(matches!(err, AffiliationError::DataLoad { .. }));
    }

    #[test]
    fn test_group_serde_rejects_empty() {
        let group: AffiliationGroup = serde_json::from_str(r#"["EPFL", "EPF Lausanne"]"#).unwrap();
        assert_eq!(group.canonical(), "EPFL");
        assert!(serde_json::from_str::<AffiliationGroup>("[]").is_err());
    }
}

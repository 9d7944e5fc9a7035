//! Disambiguation rules for fuzzy affiliation matches
//!
//! A fuzzy match between the searched text and a table member is checked
//! against an ordered list of rules. The first rule that applies decides
//! what happens to the match; when none applies the match stands.

use serde::{Deserialize, Serialize};

/// What to do with a member match a rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    /// Discard this member's match and go on with the group's next member
    SkipMember,
    /// Stop matching the current group; its canonical name is not reported
    SkipGroup,
}

/// One `(member, input, action)` rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisambiguationRule {
    /// Member name the rule is restricted to (case-insensitive equality).
    /// Applies to every member when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    /// Text the searched affiliation must contain (case-insensitive)
    pub input_contains: String,
    pub action: RuleAction,
}

impl DisambiguationRule {
    pub fn skip_member(member: impl Into<String>, input_contains: impl Into<String>) -> Self {
        Self {
            member: Some(member.into()),
            input_contains: input_contains.into(),
            action: RuleAction::SkipMember,
        }
    }

    pub fn skip_group(input_contains: impl Into<String>) -> Self {
        Self {
            member: None,
            input_contains: input_contains.into(),
            action: RuleAction::SkipGroup,
        }
    }

    /// Whether the rule covers a match of `member` against a searched text
    /// already lower-cased by the caller
    pub fn applies(&self, member: &str, searched_lower: &str) -> bool {
        let member_matches = self
            .member
            .as_ref()
            .map_or(true, |expected| expected.to_lowercase() == member.to_lowercase());

        member_matches && searched_lower.contains(&self.input_contains.to_lowercase())
    }
}

/// Rules shipped with the resolver, in evaluation order
///
/// - "Zurich University" is a partial match of "Zurich University of the
///   Arts", a different institution.
/// - "cern" is a substring of "Lucerne".
/// - "University of Freiburg" (Germany) scores above threshold against
///   "University of Fribourg" (Switzerland); no group is guessed.
pub fn builtin_rules() -> Vec<DisambiguationRule> {
    vec![
        DisambiguationRule::skip_member("zurich university", "zurich university of the arts"),
        DisambiguationRule::skip_member("cern", "lucerne"),
        DisambiguationRule::skip_group("university of freiburg"),
    ]
}

/// Action of the first rule that applies, if any
pub fn first_applicable(
    rules: &[DisambiguationRule],
    member: &str,
    searched_lower: &str,
) -> Option<RuleAction> {
    rules
        .iter()
        .find(|rule| rule.applies(member, searched_lower))
        .map(|rule| rule.action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_rule_is_case_insensitive() {
        let rule = DisambiguationRule::skip_member("cern", "lucerne");
        assert!(rule.applies("CERN", "university of lucerne"));
        assert!(rule.applies("cern", "university of lucerne"));
        assert!(!rule.applies("CERN", "cern, geneva"));
        assert!(!rule.applies("European Organization for Nuclear Research", "lucerne"));
    }

    #[test]
    fn test_group_rule_applies_to_any_member() {
        let rule = DisambiguationRule::skip_group("University of Freiburg");
        assert!(rule.applies("University of Fribourg", "university of freiburg, germany"));
        assert!(rule.applies("anything", "dept. x, university of freiburg"));
        assert!(!rule.applies("University of Fribourg", "université de fribourg"));
    }

    #[test]
    fn test_builtin_rule_order() {
        let rules = builtin_rules();
        assert_eq!(
            first_applicable(&rules, "Zurich University", "zurich university of the arts"),
            Some(RuleAction::SkipMember)
        );
        assert_eq!(
            first_applicable(&rules, "cern", "university of lucerne"),
            Some(RuleAction::SkipMember)
        );
        assert_eq!(
            first_applicable(&rules, "University of Fribourg", "university of freiburg, germany"),
            Some(RuleAction::SkipGroup)
        );
        assert_eq!(first_applicable(&rules, "Zurich University", "university of zurich"), None);
    }

    #[test]
    fn test_member_rule_wins_over_later_group_rule() {
        let rules = builtin_rules();
        let searched = "cern and university of lucerne and university of freiburg";
        assert_eq!(first_applicable(&rules, "CERN", searched), Some(RuleAction::SkipMember));
        assert_eq!(first_applicable(&rules, "EPFL", searched), Some(RuleAction::SkipGroup));
    }

    #[test]
    fn test_rule_serde() {
        let rule: DisambiguationRule =
            toml::from_str("input_contains = \"university of freiburg\"\naction = \"skip_group\"")
                .unwrap();
        assert_eq!(rule, DisambiguationRule::skip_group("university of freiburg"));
    }
}

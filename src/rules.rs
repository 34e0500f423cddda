//! Rule rows and the validated rule set built from them.
//!
//! A rule row is what the user typed: a pair of strings, possibly empty.
//! [`RuleSet::build`] turns an ordered list of rows into the ordered rule set
//! the renamer applies, or rejects the whole list.

use crate::renamer::{RenameError, RenameResult};
use serde::{Deserialize, Serialize};

/// One user-entered replacement row, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRow {
    /// Substring to look for.
    #[serde(default)]
    pub before: String,
    /// Replacement text.
    #[serde(default)]
    pub after: String,
}

impl RuleRow {
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }
}

/// A single literal substring replacement. Both sides are non-empty and differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub before: String,
    pub after: String,
}

impl Rule {
    /// Returns true if `name` contains the before-string.
    pub fn matches(&self, name: &str) -> bool {
        name.contains(&self.before)
    }

    /// Replaces every occurrence of the before-string in `name`.
    pub fn apply(&self, name: &str) -> String {
        name.replace(&self.before, &self.after)
    }
}

/// Ordered collection of rules, keyed by before-string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Builds a rule set from rows in order.
    ///
    /// Rows with both sides empty, or with identical sides, are skipped. A row
    /// with exactly one side empty rejects the whole list. A repeated
    /// before-string replaces the earlier rule's after-string but keeps the
    /// earlier position.
    ///
    /// # Errors
    ///
    /// Returns `RenameError::IncompleteRule` for the first half-filled row.
    ///
    /// # Examples
    ///
    /// ```
    /// use multirename::rules::{RuleRow, RuleSet};
    ///
    /// let rows = vec![RuleRow::new("a", "b"), RuleRow::new("", ""), RuleRow::new("a", "c")];
    /// let rules = RuleSet::build(&rows).unwrap();
    /// assert_eq!(rules.len(), 1);
    /// assert_eq!(rules.get("a"), Some("c"));
    /// ```
    pub fn build(rows: &[RuleRow]) -> RenameResult<Self> {
        let mut set = RuleSet::default();

        for (index, row) in rows.iter().enumerate() {
            match (row.before.is_empty(), row.after.is_empty()) {
                (true, true) => continue,
                (true, false) | (false, true) => {
                    return Err(RenameError::IncompleteRule { row: index });
                }
                (false, false) => {}
            }

            if row.before == row.after {
                log::debug!("Skipping no-op rule row {}: '{}'", index, row.before);
                continue;
            }

            set.insert(&row.before, &row.after);
        }

        Ok(set)
    }

    fn insert(&mut self, before: &str, after: &str) {
        if let Some(existing) = self.rules.iter_mut().find(|r| r.before == before) {
            log::debug!(
                "Rule for '{}' overwritten: '{}' -> '{}'",
                before,
                existing.after,
                after
            );
            existing.after = after.to_string();
        } else {
            self.rules.push(Rule {
                before: before.to_string(),
                after: after.to_string(),
            });
        }
    }

    /// Looks up the after-string for a before-string.
    pub fn get(&self, before: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|r| r.before == before)
            .map(|r| r.after.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(pairs: &[(&str, &str)]) -> Vec<RuleRow> {
        pairs.iter().map(|(b, a)| RuleRow::new(*b, *a)).collect()
    }

    #[test]
    fn test_both_empty_row_is_skipped() {
        let set = RuleSet::build(&rows(&[("", "")])).expect("empty row should not fail");
        assert!(set.is_empty());
    }

    #[test]
    fn test_identical_sides_are_skipped() {
        let set = RuleSet::build(&rows(&[("same", "same"), ("x", "y")])).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("same"), None);
        assert_eq!(set.get("x"), Some("y"));
    }

    #[test]
    fn test_half_filled_row_rejects_everything() {
        let result = RuleSet::build(&rows(&[("a", "b"), ("c", ""), ("d", "e")]));
        match result {
            Err(RenameError::IncompleteRule { row }) => assert_eq!(row, 1),
            other => panic!("expected IncompleteRule, got {:?}", other),
        }

        let result = RuleSet::build(&rows(&[("", "only-after")]));
        assert!(matches!(result, Err(RenameError::IncompleteRule { row: 0 })));
    }

    #[test]
    fn test_duplicate_before_last_write_wins() {
        let set = RuleSet::build(&rows(&[("a", "b"), ("a", "c")])).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("a"), Some("c"));
    }

    #[test]
    fn test_overwritten_rule_keeps_first_position() {
        let set = RuleSet::build(&rows(&[("a", "b"), ("x", "y"), ("a", "c")])).unwrap();
        let order: Vec<_> = set.iter().map(|r| r.before.as_str()).collect();
        assert_eq!(order, vec!["a", "x"]);
        assert_eq!(set.get("a"), Some("c"));
    }

    #[test]
    fn test_whitespace_is_significant() {
        let set = RuleSet::build(&rows(&[(" a", "a ")])).unwrap();
        assert_eq!(set.get(" a"), Some("a "));
        assert_eq!(set.get("a"), None);
    }

    #[test]
    fn test_rule_apply_replaces_all_occurrences() {
        let rule = Rule {
            before: "ab".to_string(),
            after: "x".to_string(),
        };
        assert!(rule.matches("abcab.txt"));
        assert_eq!(rule.apply("abcab.txt"), "xcx.txt");
        assert!(!rule.matches("a_b.txt"));
    }
}

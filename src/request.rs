//! Rename requests handed over by the presentation layer.
//!
//! A [`RenameRequest`] carries the root path and the rule rows exactly as the
//! user entered them. [`RenameRequest::prepare`] performs every check that
//! must pass before the filesystem is touched.

use crate::renamer::{PlannedRename, RenameError, RenameReport, RenameResult, Renamer};
use crate::rules::{RuleRow, RuleSet};
use std::path::{Path, PathBuf};

/// Root path and rule rows for one rename invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameRequest {
    pub root: String,
    pub rows: Vec<RuleRow>,
}

impl RenameRequest {
    pub fn new(root: impl Into<String>, rows: Vec<RuleRow>) -> Self {
        Self {
            root: root.into(),
            rows,
        }
    }

    /// Appends a rule row.
    pub fn with_row(mut self, before: impl Into<String>, after: impl Into<String>) -> Self {
        self.rows.push(RuleRow::new(before, after));
        self
    }

    /// Validates the request and builds its rule set.
    ///
    /// Checks run in this order, stopping at the first failure:
    /// 1. the root path is non-empty and exists
    /// 2. at least one rule row is present
    /// 3. every row is either complete or completely empty
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath`, `EmptyRuleSet` or `IncompleteRule`.
    pub fn prepare(&self) -> RenameResult<PreparedRename> {
        let root = validate_root(&self.root)?;

        if self.rows.is_empty() {
            return Err(RenameError::EmptyRuleSet);
        }

        let rules = RuleSet::build(&self.rows)?;
        log::debug!(
            "Prepared {} rules from {} rows for {}",
            rules.len(),
            self.rows.len(),
            root.display()
        );

        Ok(PreparedRename { root, rules })
    }
}

/// A request that passed validation and is ready to run.
#[derive(Debug, Clone)]
pub struct PreparedRename {
    root: PathBuf,
    rules: RuleSet,
}

impl PreparedRename {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Runs the rename over the tree.
    pub fn execute(&self) -> RenameResult<RenameReport> {
        Renamer::execute(&self.rules, &self.root)
    }

    /// Computes the renames without performing them.
    pub fn plan(&self) -> Vec<PlannedRename> {
        Renamer::plan(&self.rules, &self.root)
    }
}

/// Checks that a root path string is usable.
///
/// The path must be non-empty and exist. It is not required to be a
/// directory; renaming under a plain file does nothing.
pub fn validate_root(path: &str) -> RenameResult<PathBuf> {
    if path.is_empty() {
        return Err(RenameError::InvalidPath {
            path: path.to_string(),
        });
    }

    let root = PathBuf::from(path);
    if !root.exists() {
        return Err(RenameError::InvalidPath {
            path: path.to_string(),
        });
    }

    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_root_rejects_empty_and_missing() {
        assert!(matches!(
            validate_root(""),
            Err(RenameError::InvalidPath { .. })
        ));
        assert!(matches!(
            validate_root("/non/existent/path"),
            Err(RenameError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_validate_root_accepts_plain_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").expect("Failed to write test file");

        let root = validate_root(file.to_str().unwrap()).expect("files are accepted");
        assert_eq!(root, file);
    }

    #[test]
    fn test_prepare_checks_path_before_rows() {
        let request = RenameRequest::new("", Vec::new());
        assert!(matches!(
            request.prepare(),
            Err(RenameError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_prepare_without_rows_is_empty_rule_set() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let request = RenameRequest::new(temp_dir.path().to_string_lossy(), Vec::new());

        assert!(matches!(request.prepare(), Err(RenameError::EmptyRuleSet)));
    }

    #[test]
    fn test_prepare_with_only_blank_rows_succeeds() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let request = RenameRequest::new(temp_dir.path().to_string_lossy(), Vec::new())
            .with_row("", "")
            .with_row("same", "same");

        let prepared = request.prepare().expect("blank rows are not an error");
        assert!(prepared.rules().is_empty());
        assert_eq!(prepared.root(), temp_dir.path());
    }

    #[test]
    fn test_prepare_rejects_incomplete_row() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let request = RenameRequest::new(temp_dir.path().to_string_lossy(), Vec::new())
            .with_row("cat", "dog")
            .with_row("bird", "");

        assert!(matches!(
            request.prepare(),
            Err(RenameError::IncompleteRule { row: 1 })
        ));
    }
}

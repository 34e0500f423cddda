//! Rule application over a directory tree.
//!
//! The renamer applies a [`RuleSet`] to every file below a root directory.
//! Rules run as a pipeline: each rule walks the whole tree again, so it sees
//! the names produced by the rules before it.

use crate::config::ConfigError;
use crate::rules::{Rule, RuleSet};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Errors that can occur while validating or running a rename.
#[derive(Debug)]
pub enum RenameError {
    /// The root path is empty or does not exist.
    InvalidPath { path: String },
    /// The request carried no rule rows at all.
    EmptyRuleSet,
    /// A rule row has exactly one of its two sides filled in.
    IncompleteRule { row: usize },
    /// A rename call failed. The tree is left as far as it got.
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    /// Reading a directory for the listing failed.
    ListFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Another rename is still running.
    Busy,
    /// A previous rename failed and the worker has not been re-armed.
    Jammed,
    /// The worker thread could not be started or died without reporting.
    WorkerFailed { reason: String },
    /// The rule file could not be loaded.
    Config(ConfigError),
}

impl std::fmt::Display for RenameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPath { path } => write!(f, "Invalid Path: '{}'", path),
            Self::EmptyRuleSet => write!(f, "No Items to Rename"),
            Self::IncompleteRule { row } => {
                write!(f, "Both fields must be filled (rule {})", row + 1)
            }
            Self::RenameFailed { from, to, source } => {
                write!(
                    f,
                    "Failed to rename {} to {}: {}",
                    from.display(),
                    to.display(),
                    source
                )
            }
            Self::ListFailed { path, source } => {
                write!(f, "Failed to list {}: {}", path.display(), source)
            }
            Self::Busy => write!(f, "A rename is already in progress"),
            Self::Jammed => write!(
                f,
                "The previous rename failed; re-arm the worker before starting another"
            ),
            Self::WorkerFailed { reason } => write!(f, "Rename worker failed: {}", reason),
            Self::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RenameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RenameFailed { source, .. } | Self::ListFailed { source, .. } => Some(source),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for RenameError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Result type for rename operations.
pub type RenameResult<T> = Result<T, RenameError>;

/// A single rename performed (or planned) by one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameStep {
    /// Position of the rule in the rule set.
    pub rule: usize,
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Summary of a completed rename run.
#[derive(Debug, Clone, Serialize)]
pub struct RenameReport {
    /// ISO 8601 timestamp of when the run started.
    pub started_at: String,
    pub root: PathBuf,
    /// The rules that were applied, in order.
    pub rules: RuleSet,
    /// Every rename in the order it happened.
    pub renames: Vec<RenameStep>,
}

impl RenameReport {
    fn new(root: PathBuf, rules: RuleSet) -> Self {
        Self {
            started_at: chrono::Utc::now().to_rfc3339(),
            root,
            rules,
            renames: Vec::new(),
        }
    }

    /// Pairs each rule with the number of files it renamed.
    pub fn counts_per_rule(&self) -> Vec<(&Rule, usize)> {
        self.rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                let count = self.renames.iter().filter(|s| s.rule == index).count();
                (rule, count)
            })
            .collect()
    }
}

/// The predicted fate of one file in a dry run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedRename {
    pub from: PathBuf,
    pub to: PathBuf,
    /// Intermediate renames, one per rule that matched.
    pub steps: Vec<RenameStep>,
}

/// Applies rule sets to directory trees.
pub struct Renamer;

impl Renamer {
    /// Renames every matching file under `root`, one full tree pass per rule.
    ///
    /// For each rule in order, the tree is walked fresh and every file whose
    /// name contains the before-string is renamed in place with all
    /// occurrences replaced. Directories are walked but never renamed. A
    /// root that is not a directory yields an empty report.
    ///
    /// # Errors
    ///
    /// The first failing rename aborts the run with
    /// `RenameError::RenameFailed`. Renames already done stay done.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use multirename::renamer::Renamer;
    /// use multirename::rules::{RuleRow, RuleSet};
    /// use std::path::Path;
    ///
    /// let rules = RuleSet::build(&[RuleRow::new("cat", "feline")]).unwrap();
    /// let report = Renamer::execute(&rules, Path::new("/path/to/photos")).unwrap();
    /// println!("Renamed {} files", report.renames.len());
    /// ```
    pub fn execute(rules: &RuleSet, root: &Path) -> RenameResult<RenameReport> {
        let mut report = RenameReport::new(root.to_path_buf(), rules.clone());

        for (index, rule) in rules.iter().enumerate() {
            log::info!(
                "Applying rule {}: '{}' -> '{}'",
                index + 1,
                rule.before,
                rule.after
            );

            // Each directory is read in full when the walk reaches it, so
            // renames within it are not seen again by this pass.
            for path in walk_files(root) {
                let Some(name) = file_name_str(&path) else {
                    continue;
                };
                if !rule.matches(name) {
                    continue;
                }

                let destination = path.with_file_name(rule.apply(name));
                fs::rename(&path, &destination).map_err(|e| RenameError::RenameFailed {
                    from: path.clone(),
                    to: destination.clone(),
                    source: e,
                })?;
                log::debug!("{} -> {}", path.display(), destination.display());

                report.renames.push(RenameStep {
                    rule: index,
                    from: path,
                    to: destination,
                });
            }
        }

        log::info!(
            "Renamed {} files with {} rules under {}",
            report.renames.len(),
            rules.len(),
            root.display()
        );
        Ok(report)
    }

    /// Predicts what [`Renamer::execute`] would do without touching the tree.
    ///
    /// Each file's name is run through the rules in order. Only files whose
    /// final name differs from the original are returned. Collisions between
    /// planned names are not detected.
    pub fn plan(rules: &RuleSet, root: &Path) -> Vec<PlannedRename> {
        if rules.is_empty() {
            return Vec::new();
        }

        let mut planned = Vec::new();
        for path in walk_files(root) {
            let Some(original) = file_name_str(&path) else {
                continue;
            };

            let mut current = path.clone();
            let mut name = original.to_string();
            let mut steps = Vec::new();

            for (index, rule) in rules.iter().enumerate() {
                if !rule.matches(&name) {
                    continue;
                }
                name = rule.apply(&name);
                let next = current.with_file_name(&name);
                steps.push(RenameStep {
                    rule: index,
                    from: current,
                    to: next.clone(),
                });
                current = next;
            }

            if current != path {
                planned.push(PlannedRename {
                    from: path,
                    to: current,
                    steps,
                });
            }
        }

        planned
    }
}

/// Yields every file below `root` top-down, excluding directories and the
/// root itself.
///
/// A directory's entries are read and sorted when the walk enters it, and
/// subdirectories are entered lazily. A file moved into a directory the
/// walk has not reached yet is yielded again from there.
///
/// Unreadable entries are logged and skipped. Symlinks are not followed;
/// one that points at a directory is treated as a directory.
fn walk_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(is_file_entry)
        .map(DirEntry::into_path)
}

fn is_file_entry(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }

    let file_type = entry.file_type();
    if file_type.is_dir() {
        return false;
    }
    if file_type.is_symlink() {
        return !entry.path().is_dir();
    }
    true
}

fn file_name_str(path: &Path) -> Option<&str> {
    let name = path.file_name()?;
    let name = name.to_str();
    if name.is_none() {
        log::warn!("Skipping non-UTF-8 file name: {}", path.display());
    }
    name
}

//! Command-line interface module for multirename.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Merging rule rows from the rule file and the command line
//! - Running the rename on the background worker
//! - Dry runs and plain listings

use crate::config::RenameConfig;
use crate::listing::{SortOrder, list_directory};
use crate::output::OutputFormatter;
use crate::renamer::{PlannedRename, RenameReport, RenameResult};
use crate::request::{RenameRequest, validate_root};
use crate::rules::RuleRow;
use crate::worker::RenameWorker;
use clap::{ArgAction, Parser};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Batch-rename files in a directory tree with literal substring rules.
#[derive(Debug, Parser)]
#[command(name = "multirename", version, about)]
pub struct Cli {
    /// Directory whose files are renamed (recursively).
    pub directory: String,

    /// Replace BEFORE with AFTER in file names. Repeat to add rules; they run in order.
    #[arg(
        short = 'r',
        long = "rule",
        num_args = 2,
        value_names = ["BEFORE", "AFTER"],
        allow_hyphen_values = true
    )]
    pub rules: Vec<String>,

    /// TOML rule file. Defaults to .multirename.toml in the current directory.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Show what would be renamed without touching any file.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Only list the directory.
    #[arg(long, conflicts_with = "dry_run")]
    pub list: bool,

    /// List directory entries in descending order.
    #[arg(long)]
    pub descending: bool,

    /// Print results as JSON.
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Rule rows given with `--rule`, in command-line order.
    pub fn rule_rows(&self) -> Vec<RuleRow> {
        self.rules
            .chunks_exact(2)
            .map(|pair| RuleRow::new(pair[0].as_str(), pair[1].as_str()))
            .collect()
    }

    pub fn command(&self) -> RenameCommand {
        if self.list {
            RenameCommand::List
        } else {
            RenameCommand::Rename {
                dry_run: self.dry_run,
            }
        }
    }

    pub fn options(&self) -> RunOptions {
        RunOptions {
            config_path: self.config.clone(),
            order: self.descending.then_some(SortOrder::Descending),
            json: self.json,
        }
    }
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameCommand {
    /// Rename files in a directory.
    Rename {
        /// If true, simulate the operation without making changes.
        dry_run: bool,
    },
    /// List the directory without renaming.
    List,
}

/// Settings that shape a run but not what it renames.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Rule file to load instead of the default lookup.
    pub config_path: Option<PathBuf>,
    /// Listing order; falls back to the rule file's setting.
    pub order: Option<SortOrder>,
    pub json: bool,
}

/// Runs the command described by parsed arguments.
pub fn run(cli: &Cli) -> Result<(), String> {
    run_cli_with_config(cli.command(), &cli.directory, cli.rule_rows(), &cli.options())
}

/// Runs a command with default options.
///
/// # Examples
///
/// ```no_run
/// use multirename::cli::{run_cli, RenameCommand};
/// use multirename::rules::RuleRow;
///
/// let rows = vec![RuleRow::new("cat", "feline")];
/// match run_cli(RenameCommand::Rename { dry_run: false }, "/path/to/photos", rows) {
///     Ok(()) => println!("Operation completed successfully"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(command: RenameCommand, directory: &str, rows: Vec<RuleRow>) -> Result<(), String> {
    run_cli_with_config(command, directory, rows, &RunOptions::default())
}

/// Runs a command, loading the rule file first.
///
/// Rows from the rule file come before `rows`.
pub fn run_cli_with_config(
    command: RenameCommand,
    directory: &str,
    rows: Vec<RuleRow>,
    options: &RunOptions,
) -> Result<(), String> {
    let config = load_config(options.config_path.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let order = options.order.unwrap_or(config.listing.order);

    let mut all_rows = config.rules;
    all_rows.extend(rows);
    let request = RenameRequest::new(directory, all_rows);

    match command {
        RenameCommand::Rename { dry_run: true } => dry_run(&request, options.json),
        RenameCommand::Rename { dry_run: false } => rename(&request, order, options.json),
        RenameCommand::List => list(directory, order, options.json),
    }
}

fn load_config(path: Option<&Path>) -> RenameResult<RenameConfig> {
    Ok(RenameConfig::load(path)?)
}

#[derive(Serialize)]
struct RenameOutput<'a> {
    report: &'a RenameReport,
    files: &'a [String],
}

/// Renames on the background worker, then shows the refreshed listing.
fn rename(request: &RenameRequest, order: SortOrder, json: bool) -> Result<(), String> {
    if !json {
        OutputFormatter::info(&format!("Renaming files under: {}", request.root));
    }

    let worker = RenameWorker::new();
    let handle = worker.start(request).map_err(|e| e.to_string())?;
    let report = handle.wait().map_err(|e| {
        format!(
            "{}\nRename aborted; files renamed before the failure keep their new names.",
            e
        )
    })?;

    let files = refreshed_listing(&report.root, order);

    if json {
        return print_json(&RenameOutput {
            report: &report,
            files: files.as_deref().unwrap_or_default(),
        });
    }

    if report.renames.is_empty() {
        OutputFormatter::warning("No file names matched any rule.");
    } else {
        OutputFormatter::header("Renamed files:");
        for step in &report.renames {
            OutputFormatter::plain(&format!(
                " - {} → {}",
                relative(&step.from, &report.root),
                relative(&step.to, &report.root)
            ));
        }
    }

    let rule_counts: Vec<(String, usize)> = report
        .counts_per_rule()
        .into_iter()
        .map(|(rule, count)| (format!("{} → {}", rule.before, rule.after), count))
        .collect();
    if !rule_counts.is_empty() {
        OutputFormatter::summary_table(&rule_counts, report.renames.len());
    }

    if let Some(files) = &files {
        print_listing(files);
    }
    OutputFormatter::success("Files Renamed Successfully");

    Ok(())
}

/// Lists the root after a rename. A plain-file root has no listing.
fn refreshed_listing(root: &Path, order: SortOrder) -> Option<Vec<String>> {
    match list_directory(root, order) {
        Ok(files) => Some(files),
        Err(e) => {
            log::warn!("{}", e);
            None
        }
    }
}

/// Shows the final name each file would get, without renaming anything.
fn dry_run(request: &RenameRequest, json: bool) -> Result<(), String> {
    let prepared = request.prepare().map_err(|e| e.to_string())?;
    let plan: Vec<PlannedRename> = prepared.plan();

    if json {
        return print_json(&plan);
    }

    OutputFormatter::dry_run_notice(&format!(
        "Analyzing contents of: {}",
        prepared.root().display()
    ));

    if plan.is_empty() {
        OutputFormatter::plain("No files would be renamed.");
        return Ok(());
    }

    OutputFormatter::header("Files would be renamed as follows:");
    for planned in &plan {
        OutputFormatter::plain(&format!(
            " - {} → {}",
            relative(&planned.from, prepared.root()),
            relative(&planned.to, prepared.root())
        ));
        if planned.steps.len() > 1 {
            let chain: Vec<String> = planned
                .steps
                .iter()
                .map(|step| format!("rule {}", step.rule + 1))
                .collect();
            OutputFormatter::plain(&format!("   via {}", chain.join(", ")));
        }
    }

    OutputFormatter::plain(&format!("\nTotal files: {}", plan.len()));
    OutputFormatter::success("Dry run complete. No files were modified.");

    Ok(())
}

fn list(directory: &str, order: SortOrder, json: bool) -> Result<(), String> {
    let root = validate_root(directory).map_err(|e| e.to_string())?;
    let files = list_directory(&root, order).map_err(|e| e.to_string())?;

    if json {
        return print_json(&files);
    }

    print_listing(&files);
    Ok(())
}

fn print_listing(files: &[String]) {
    OutputFormatter::header("File List");
    if files.is_empty() {
        OutputFormatter::plain("(empty)");
    }
    for name in files {
        OutputFormatter::plain(name);
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| format!("JSON serialization failed: {}", e))?;
    OutputFormatter::plain(&text);
    Ok(())
}

/// Shows `path` relative to `root` when possible.
fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::renamer::RenameError;
    use tempfile::TempDir;

    #[test]
    fn test_rule_flags_pair_up_in_order() {
        let cli = Cli::try_parse_from([
            "multirename",
            "photos",
            "-r",
            "cat",
            "feline",
            "--rule",
            "",
            "",
            "--rule",
            "-old",
            "-new",
        ])
        .expect("arguments should parse");

        assert_eq!(
            cli.rule_rows(),
            vec![
                RuleRow::new("cat", "feline"),
                RuleRow::new("", ""),
                RuleRow::new("-old", "-new"),
            ]
        );
        assert_eq!(cli.command(), RenameCommand::Rename { dry_run: false });
    }

    #[test]
    fn test_rule_flag_requires_two_values() {
        let result = Cli::try_parse_from(["multirename", "photos", "-r", "cat"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_command_and_options() {
        let cli = Cli::try_parse_from(["multirename", "photos", "--list", "--descending", "-vv"])
            .expect("arguments should parse");

        assert_eq!(cli.command(), RenameCommand::List);
        assert_eq!(cli.options().order, Some(SortOrder::Descending));
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["multirename", "photos", "-n"]).unwrap();
        assert_eq!(cli.command(), RenameCommand::Rename { dry_run: true });
        assert_eq!(cli.options().order, None);
    }

    #[test]
    fn test_list_conflicts_with_dry_run() {
        let result = Cli::try_parse_from(["multirename", "photos", "--list", "--dry-run"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_rule_file_is_a_config_error() {
        let result = load_config(Some(Path::new("/non/existent/rules.toml")));
        assert!(matches!(
            result,
            Err(RenameError::Config(ConfigError::ConfigNotFound(_)))
        ));
    }

    #[test]
    fn test_file_root_has_no_refreshed_listing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("cat.txt");
        std::fs::write(&file, "x").expect("Failed to write test file");

        assert_eq!(refreshed_listing(&file, SortOrder::Ascending), None);
        assert_eq!(
            refreshed_listing(temp_dir.path(), SortOrder::Ascending),
            Some(vec!["cat.txt".to_string()])
        );
    }

    #[test]
    fn test_relative_paths() {
        let root = Path::new("/data/photos");
        assert_eq!(relative(Path::new("/data/photos/a/b.png"), root), "a/b.png");
        assert_eq!(relative(Path::new("/elsewhere/c.png"), root), "/elsewhere/c.png");
    }
}

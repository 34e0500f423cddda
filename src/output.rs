//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: colored status lines,
//! section headers and the per-rule summary table.

use colored::*;

/// Manages all CLI output with consistent styling and formatting.
///
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Summary tables with statistics
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use multirename::output::OutputFormatter;
    /// OutputFormatter::success("Files renamed successfully");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints one row per rule with the number of files it renamed.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use multirename::output::OutputFormatter;
    ///
    /// let rows = vec![("cat → feline".to_string(), 2), ("dog → canine".to_string(), 0)];
    /// OutputFormatter::summary_table(&rows, 2);
    /// ```
    pub fn summary_table(rule_counts: &[(String, usize)], total_files: usize) {
        Self::header("SUMMARY");

        let max_rule_len = rule_counts
            .iter()
            .map(|(rule, _)| rule.chars().count())
            .max()
            .unwrap_or(0)
            .max(4); // At least "Rule" width

        println!(
            "{:<width$} | {}",
            "Rule".bold(),
            "Renamed".bold(),
            width = max_rule_len
        );
        println!("{}", "-".repeat(max_rule_len + 12));

        for (rule, count) in rule_counts {
            println!(
                "{:<width$} | {} {}",
                rule,
                count.to_string().green(),
                Self::file_word(*count),
                width = max_rule_len
            );
        }

        println!("{}", "-".repeat(max_rule_len + 12));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            Self::file_word(total_files),
            width = max_rule_len
        );
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    fn file_word(count: usize) -> &'static str {
        if count == 1 { "file" } else { "files" }
    }
}

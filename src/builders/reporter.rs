use colored::Colorize;
use std::path::Path;

use crate::builders::profiles::Profile;
use crate::core::engine::FixReport;
use crate::core::error::{FixError, RestoreOutcome};

/// Receives progress events from the `FixEngine`.
///
/// The engine knows nothing about the terminal; everything the user reads
/// comes through an implementation of this trait.
pub trait ProgressReporter {
    /// The backup copy was written to `backup_path`.
    fn backup_created(&self, backup_path: &Path);

    /// A line was commented out, or would be when `dry_run` is set.
    fn line_commented(&self, line_number: usize, line: &str, rule_id: &str, dry_run: bool);

    /// The run finished without error.
    fn finished(&self, report: &FixReport);

    /// The run failed.
    fn failed(&self, error: &FixError);
}

/// Prints progress and the final summary to standard output.
pub struct ConsoleReporter {
    profile: Profile,
    verbose: bool,
}

impl ConsoleReporter {
    /// Constructs a new `ConsoleReporter`. In verbose mode every commented
    /// line also shows the id of the rule that matched it.
    pub fn new(profile: Profile, verbose: bool) -> Self {
        Self { profile, verbose }
    }

    /// Formats the per-line message, e.g. `Line 12: Commented out: SET transaction_timeout = 0;`.
    fn format_change(&self, line_number: usize, line: &str, rule_id: &str, dry_run: bool) -> String {
        let action = if dry_run { "Would comment out" } else { "Commented out" };
        let mut message = format!("Line {line_number}: {action}: {}", line.trim());
        if self.verbose {
            message.push_str(&format!(" [{rule_id}]"));
        }
        message
    }
}

impl ProgressReporter for ConsoleReporter {
    fn backup_created(&self, backup_path: &Path) {
        println!("Backup created: {}", backup_path.display());
    }

    fn line_commented(&self, line_number: usize, line: &str, rule_id: &str, dry_run: bool) {
        println!("{}", self.format_change(line_number, line, rule_id, dry_run));
    }

    fn finished(&self, report: &FixReport) {
        let count = report.changed_count();

        if report.dry_run {
            println!(
                "\n{} {count} {} would be commented out in '{}' ({} lines scanned).",
                "Dry run:".cyan().bold(),
                self.profile.issue_noun(),
                report.path.display(),
                report.total_lines
            );
            println!("No files were modified.");
            return;
        }

        if count > 0 {
            println!(
                "\n{}",
                self.profile.success_message(count).green().bold()
            );
            println!("The file '{}' has been updated.", report.path.display());
        } else {
            println!("{}", self.profile.nothing_found());
        }

        let mut notes = self.profile.closing_notes().iter();
        if let Some(first) = notes.next() {
            println!("\n{} {first}", "File fixed successfully!".green().bold());
        }
        for note in notes {
            println!("{note}");
        }
    }

    fn failed(&self, error: &FixError) {
        println!("{}", format_failure(error).red().bold());

        if let FixError::ProcessingFailure { restore, .. } = error {
            match restore {
                RestoreOutcome::Restored => println!("File restored from backup due to error."),
                RestoreOutcome::Failed => {
                    println!("{}", "Could not restore from backup!".red().bold())
                }
                RestoreOutcome::NotNeeded => {}
            }
        }

        println!("\nFailed to fix the file. Please check the error messages above.");
    }
}

/// `Error: <message>`, the first line of every failure report.
fn format_failure(error: &FixError) -> String {
    format!("Error: {error}")
}

/// Prints nothing except failures. Selected with `--quiet`.
pub struct QuietReporter;

impl ProgressReporter for QuietReporter {
    fn backup_created(&self, _backup_path: &Path) {}

    fn line_commented(&self, _line_number: usize, _line: &str, _rule_id: &str, _dry_run: bool) {}

    fn finished(&self, _report: &FixReport) {}

    fn failed(&self, error: &FixError) {
        eprintln!("{} ({})", format_failure(error), error.path().display());
    }
}

use anyhow::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::builders::filter::{self, FilterOutcome, LineChange};
use crate::builders::reporter::{ConsoleReporter, ProgressReporter};
use crate::builders::rules::RuleSet;
use crate::builders::storage::{BackupStore, backup_store_for};
use crate::core::config::FixerConfig;
use crate::core::error::{FixError, RestoreOutcome};

/// What a finished run did to one dump file.
#[derive(Debug, Clone)]
pub struct FixReport {
    pub path: PathBuf,
    /// Where the backup was written. `None` for dry runs and in-memory backups.
    pub backup_path: Option<PathBuf>,
    pub total_lines: usize,
    pub changes: Vec<LineChange>,
    pub dry_run: bool,
}

impl FixReport {
    pub fn changed_count(&self) -> usize {
        self.changes.len()
    }
}

/// Rewrites dump files in place, one at a time.
///
/// A run checks the input exists, backs it up, filters it and writes it
/// back. If anything fails after the backup was taken, the engine puts the
/// backup back over the input before returning the error.
pub struct FixEngine {
    rules: RuleSet,
    storage: Box<dyn BackupStore>,
    reporter: Box<dyn ProgressReporter>,
    dry_run: bool,
}

impl FixEngine {
    /// Builds an engine with the configured backup strategy and the console reporter.
    pub fn new(config: &FixerConfig) -> Result<Self> {
        Self::with_reporter(config, Box::new(ConsoleReporter::new(config.profile, false)))
    }

    /// Builds an engine with the configured backup strategy and the given reporter.
    pub fn with_reporter(config: &FixerConfig, reporter: Box<dyn ProgressReporter>) -> Result<Self> {
        let storage = backup_store_for(config.backup_strategy, &config.backup_suffix);
        Self::with_parts(config, storage, reporter)
    }

    /// Builds an engine with the given backup store and reporter.
    pub fn with_parts(
        config: &FixerConfig,
        storage: Box<dyn BackupStore>,
        reporter: Box<dyn ProgressReporter>,
    ) -> Result<Self> {
        let rules = RuleSet::compile(&config.rules)?;
        debug!(
            profile = %config.profile,
            rules = ?rules.iter().map(|rule| rule.id.as_str()).collect::<Vec<_>>(),
            "compiled rules"
        );
        Ok(Self {
            rules,
            storage,
            reporter,
            dry_run: config.dry_run,
        })
    }

    /// Runs the whole transaction against `path` and reports the result.
    pub fn process_file(&mut self, path: &Path) -> Result<FixReport, FixError> {
        info!(path = %path.display(), dry_run = self.dry_run, "processing dump file");

        let result = self.run(path);
        match &result {
            Ok(report) => {
                info!(changes = report.changed_count(), "finished");
                self.reporter.finished(report);
            }
            Err(e) => {
                debug!(error = %e, "processing failed");
                self.reporter.failed(e);
            }
        }
        result
    }

    fn run(&mut self, path: &Path) -> Result<FixReport, FixError> {
        if !path.exists() {
            return Err(FixError::FileNotFound(path.to_path_buf()));
        }

        let backup_path = if self.dry_run {
            None
        } else {
            let location = self.storage.store_backup(path).map_err(|source| {
                FixError::BackupWriteFailure {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            if let Some(location) = &location {
                self.reporter.backup_created(location);
            }
            location
        };

        match self.rewrite(path) {
            Ok((total_lines, changes)) => Ok(FixReport {
                path: path.to_path_buf(),
                backup_path,
                total_lines,
                changes,
                dry_run: self.dry_run,
            }),
            Err(source) => {
                let restore = if self.dry_run {
                    RestoreOutcome::NotNeeded
                } else {
                    self.restore(path)
                };
                Err(FixError::ProcessingFailure {
                    path: path.to_path_buf(),
                    source,
                    restore,
                })
            }
        }
    }

    /// Reads, filters and (unless dry-running) writes back the file.
    fn rewrite(&self, path: &Path) -> io::Result<(usize, Vec<LineChange>)> {
        let content = fs::read_to_string(path)?;
        let lines = filter::split_lines(&content);
        let total_lines = lines.len();
        debug!(total_lines, "scanning lines");

        let outcome = filter::filter(&lines, &self.rules);
        for change in &outcome.changes {
            debug!(line = change.line_number, rule = %change.rule_id, "matched");
            self.reporter.line_commented(
                change.line_number,
                &change.original,
                &change.rule_id,
                self.dry_run,
            );
        }

        let FilterOutcome { lines, changes } = outcome;
        if !self.dry_run {
            fs::write(path, lines.concat())?;
        }
        Ok((total_lines, changes))
    }

    fn restore(&mut self, path: &Path) -> RestoreOutcome {
        match self.storage.restore_backup(path) {
            Ok(()) => {
                info!(path = %path.display(), "restored original from backup");
                RestoreOutcome::Restored
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not restore from backup");
                RestoreOutcome::Failed
            }
        }
    }
}

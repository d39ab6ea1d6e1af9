use anyhow::Result;
use std::io::IsTerminal;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use crate::builders::reporter::{ConsoleReporter, ProgressReporter, QuietReporter};
use crate::core::config::{ConfigManager, ConfigOptions};
use crate::core::engine::{FixEngine, FixReport};

/// Environment variable that overrides the log filter, e.g. `PG_DUMP_FIXER_LOG=debug`.
pub const LOG_ENV: &str = "PG_DUMP_FIXER_LOG";

/// Sets up diagnostic logging on stderr. Stdout is left to the reporter.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init()
        .ok(); // Ignore error if already initialized
}

/// Resolves the configuration and rewrites `path` with it.
pub fn fix_dump_file(
    path: &Path,
    options: ConfigOptions,
    verbose: bool,
    quiet: bool,
) -> Result<FixReport> {
    let config = ConfigManager::new(options).resolve()?;

    let reporter: Box<dyn ProgressReporter> = if quiet {
        Box::new(QuietReporter)
    } else {
        Box::new(ConsoleReporter::new(config.profile, verbose))
    };
    let mut engine = FixEngine::with_reporter(&config, reporter)?;
    Ok(engine.process_file(path)?)
}

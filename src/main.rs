/// The Big IDEA:
/// A dump taken with a newer `pg_dump`, or by a superuser, often refuses
/// to restore somewhere else. `SET transaction_timeout` breaks older
/// servers, and `ALTER SCHEMA ... OWNER TO postgres` breaks restores as a
/// regular user. Hand-editing a multi-gigabyte dump is no fun, so this tool
/// comments those lines out in place and keeps a backup next to the file.
use clap::Parser;
use clap::error::ErrorKind;
use pg_dump_fixer::builders::profiles::Profile;
use pg_dump_fixer::builders::storage::BackupStrategy;
use pg_dump_fixer::core::config::ConfigOptions;
use pg_dump_fixer::utils;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pg-dump-fixer", version)]
#[command(about = "Comment out PostgreSQL dump statements that fail on restore")]
struct Cli {
    /// Path to the SQL dump file to fix in place
    #[arg(value_name = "PATH_TO_SQL_FILE")]
    file: PathBuf,

    /// Which built-in rule list to apply
    #[arg(short, long, value_enum, default_value_t = Profile::Complete)]
    profile: Profile,

    /// Extra rules file (.toml, .json, .yaml, or a plain `kind:pattern` list)
    #[arg(short, long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Override the backup suffix (`<file>.<suffix>`)
    #[arg(long, value_name = "SUFFIX")]
    backup_suffix: Option<String>,

    /// Keep the backup next to the file, or only in memory for this run
    #[arg(long, value_enum, default_value_t = BackupStrategy::Sidecar)]
    backup_strategy: BackupStrategy,

    /// Show what would be commented out without touching the file
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Print nothing but errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show rule ids and debug logs
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                // Missing or extra arguments exit with 1, like every other failure.
                _ => ExitCode::FAILURE,
            };
        }
    };

    utils::init_logging(cli.verbose);

    let options = ConfigOptions {
        profile: cli.profile,
        rules_file: cli.rules,
        backup_suffix: cli.backup_suffix,
        backup_strategy: cli.backup_strategy,
        dry_run: cli.dry_run,
    };

    match utils::fix_dump_file(&cli.file, options, cli.verbose, cli.quiet) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            // Failures from the engine were already reported; only config errors reach here unprinted.
            if e.downcast_ref::<pg_dump_fixer::core::error::FixError>().is_none() {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

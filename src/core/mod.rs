// This file is the module declaration file for the `core` module.
// It declares the submodules that drive a single run of the tool and
// exposes them to the rest of the crate.

// `config` module:
// Resolves the command-line options and an optional rules file into one
// `FixerConfig`: the selected profile, the ordered rule list, the backup
// suffix and the dry-run flag. It also runs the validator before anything
// touches the dump.
pub mod config;

// `engine` module:
// The file transaction wrapper. `FixEngine` checks the input exists, takes
// the backup, runs the line filter, writes the result back and restores the
// backup if the rewrite fails.
pub mod engine;

// `error` module:
// The typed errors a rewrite can end with (`FileNotFound`,
// `BackupWriteFailure`, `ProcessingFailure`).
pub mod error;

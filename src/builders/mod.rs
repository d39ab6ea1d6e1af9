// This file is the module declaration file for the `builders` module.
// It declares and makes public all the sub-modules within the `src/builders`
// directory. These modules hold the pieces the engine is assembled from.

// `filter` module:
// The line filter itself. It walks a document line by line, comments out
// lines that match a rule, leaves existing comments alone and records each
// change.
pub mod filter;

// `importer` module:
// Loads extra rules from a user-supplied file. TOML, JSON and YAML files are
// parsed as structured documents; anything else is read as a plain
// `kind:pattern` list.
pub mod importer;

// `profiles` module:
// The built-in rule lists (`compatibility`, `complete`, `permissions`)
// together with each profile's backup suffix and summary wording.
pub mod profiles;

// `reporter` module:
// Turns engine events into the messages printed to the terminal. Defines
// the `ProgressReporter` trait with a console and a quiet implementation.
pub mod reporter;

// `rules` module:
// Defines `Rule` and `RuleKind`, compiles rules into case-insensitive
// regexes, and provides `RuleSet::first_match` for in-order matching.
pub mod rules;

// `storage` module:
// Abstracts the backup copy behind `BackupStore`, with a sidecar file
// implementation (`<input>.<suffix>`) and an in-memory one.
pub mod storage;

// `validator` module:
// Checks the resolved rule list for invalid regexes, empty patterns,
// duplicate ids and patterns that would match every line.
pub mod validator;

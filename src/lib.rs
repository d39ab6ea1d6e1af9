//! pg-dump-fixer: comment out the statements in a PostgreSQL dump that
//! stop it from restoring on another server or as another user.
//!
//! The binary lives in `src/main.rs`; the library exposes the pieces so the
//! integration tests can drive them directly.

pub mod builders;
pub mod core;
pub mod utils;

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// What happened when the engine tried to put the original content back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored,
    Failed,
    /// No backup was taken (dry run), so there was nothing to restore.
    NotNeeded,
}

/// The ways a single rewrite of a dump file can fail. All of them end the run.
#[derive(Debug, Error)]
pub enum FixError {
    #[error("File '{}' not found.", .0.display())]
    FileNotFound(PathBuf),

    #[error("could not create backup: {source}")]
    BackupWriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not process file: {source}")]
    ProcessingFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
        restore: RestoreOutcome,
    },
}

impl FixError {
    /// The dump file the error is about.
    pub fn path(&self) -> &PathBuf {
        match self {
            FixError::FileNotFound(path)
            | FixError::BackupWriteFailure { path, .. }
            | FixError::ProcessingFailure { path, .. } => path,
        }
    }
}

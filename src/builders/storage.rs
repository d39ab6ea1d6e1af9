use clap::ValueEnum;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Holds the byte-for-byte snapshot of a dump taken before it is rewritten.
///
/// The engine calls `store_backup` exactly once before touching the input and
/// `restore_backup` only when the rewrite fails.
pub trait BackupStore {
    /// Snapshots `source`. Returns where the copy lives, if it lives on disk.
    fn store_backup(&mut self, source: &Path) -> io::Result<Option<PathBuf>>;

    /// Writes the snapshot of `target` back over it.
    fn restore_backup(&mut self, target: &Path) -> io::Result<()>;
}

/// Where the snapshot of the input is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BackupStrategy {
    /// A sibling file, `<input>.<suffix>`, left in place after the run.
    #[default]
    Sidecar,
    /// Process memory only. Nothing is written next to the input, and the
    /// snapshot is gone once the run ends.
    Memory,
}

impl fmt::Display for BackupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupStrategy::Sidecar => write!(f, "sidecar"),
            BackupStrategy::Memory => write!(f, "memory"),
        }
    }
}

/// Builds the store for `strategy`. `suffix` only matters for sidecar files.
pub fn backup_store_for(strategy: BackupStrategy, suffix: &str) -> Box<dyn BackupStore> {
    match strategy {
        BackupStrategy::Sidecar => Box::new(SidecarBackup::new(suffix)),
        BackupStrategy::Memory => Box::new(MemoryBackup::new()),
    }
}

/// Keeps the backup as a sibling file named `<input>.<suffix>`.
///
/// The sidecar file is left in place after a successful run so the user can
/// diff or roll back by hand.
pub struct SidecarBackup {
    suffix: String,
}

impl SidecarBackup {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// `dump.sql` with suffix `backup` becomes `dump.sql.backup`.
    pub fn backup_path(&self, source: &Path) -> PathBuf {
        let mut name = source.as_os_str().to_owned();
        name.push(".");
        name.push(&self.suffix);
        PathBuf::from(name)
    }
}

impl BackupStore for SidecarBackup {
    fn store_backup(&mut self, source: &Path) -> io::Result<Option<PathBuf>> {
        let backup_path = self.backup_path(source);
        let bytes = fs::copy(source, &backup_path)?;
        debug!(backup = %backup_path.display(), bytes, "stored sidecar backup");
        Ok(Some(backup_path))
    }

    fn restore_backup(&mut self, target: &Path) -> io::Result<()> {
        let backup_path = self.backup_path(target);
        fs::copy(&backup_path, target)?;
        debug!(backup = %backup_path.display(), "restored from sidecar backup");
        Ok(())
    }
}

/// Keeps backups in memory for the life of the process. Nothing is written
/// next to the input.
#[derive(Default)]
pub struct MemoryBackup {
    backups: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryBackup {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BackupStore for MemoryBackup {
    fn store_backup(&mut self, source: &Path) -> io::Result<Option<PathBuf>> {
        let content = fs::read(source)?;
        self.backups.insert(source.to_path_buf(), content);
        Ok(None)
    }

    fn restore_backup(&mut self, target: &Path) -> io::Result<()> {
        match self.backups.get(target) {
            Some(content) => fs::write(target, content),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no backup held for {}", target.display()),
            )),
        }
    }
}

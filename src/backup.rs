// 💾 Backup Service - timestamped directory snapshots
//
// backup_directory(src) creates <base>/backup-<timestamp> and mirrors the
// whole tree under src into it. Directories are created before the files
// inside them are copied; files overwrite whatever is at the target path.
//
// The first I/O failure aborts the walk. Anything already copied stays.

use crate::config::{snapshot_timestamp, AppConfig};
use crate::error::BackupError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Prefix of every snapshot directory name
pub const BACKUP_PREFIX: &str = "backup-";

#[derive(Debug, Clone)]
pub struct BackupService {
    base_dir: PathBuf,
}

impl BackupService {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        BackupService {
            base_dir: base_dir.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.data_dir.clone())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Snapshot `source` into a fresh destination and return its path
    pub fn backup_directory(&self, source: &Path) -> Result<PathBuf, BackupError> {
        if !source.is_dir() {
            return Err(BackupError::SourceNotDirectory {
                path: source.to_path_buf(),
            });
        }

        let destination = self.claim_destination()?;

        tracing::info!(
            source = %source.display(),
            destination = %destination.display(),
            "backup started"
        );

        let mut directories = 0usize;
        let mut files = 0usize;
        let mut bytes = 0u64;

        // Pre-order walk: a directory is always yielded before its contents.
        // The destination is pruned in case it lives inside the source.
        let walker = WalkDir::new(source)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.path() != destination.as_path());
        for entry in walker {
            let entry = entry.map_err(|e| BackupError::Walk {
                root: source.to_path_buf(),
                source: e,
            })?;

            let relative = entry.path().strip_prefix(source).unwrap_or(Path::new(""));
            let target = destination.join(relative);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                fs::create_dir_all(&target).map_err(|e| BackupError::CreateDirectory {
                    path: target.clone(),
                    source: e,
                })?;
                directories += 1;
            } else if file_type.is_file() || points_to_file(entry.path()) {
                let copied = fs::copy(entry.path(), &target).map_err(|e| BackupError::Copy {
                    from: entry.path().to_path_buf(),
                    to: target.clone(),
                    source: e,
                })?;
                tracing::trace!(file = %relative.display(), bytes = copied, "copied");
                files += 1;
                bytes += copied;
            } else {
                tracing::warn!(path = %entry.path().display(), "skipping non-regular entry");
            }
        }

        tracing::info!(
            destination = %destination.display(),
            directories,
            files,
            bytes,
            "backup finished"
        );
        Ok(destination)
    }

    /// Create `<base>/backup-<timestamp>` and return it
    ///
    /// `create_dir` is the claim: it fails with AlreadyExists when another
    /// snapshot got the name first, and the next `-N` suffix is tried.
    fn claim_destination(&self) -> Result<PathBuf, BackupError> {
        fs::create_dir_all(&self.base_dir).map_err(|e| BackupError::CreateDirectory {
            path: self.base_dir.clone(),
            source: e,
        })?;

        self.claim_named(&format!("{}{}", BACKUP_PREFIX, snapshot_timestamp()))
    }

    fn claim_named(&self, name: &str) -> Result<PathBuf, BackupError> {
        let mut candidate = self.base_dir.join(name);
        let mut n = 1u32;
        loop {
            match fs::create_dir(&candidate) {
                Ok(()) => return Ok(candidate),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(taken = %candidate.display(), "destination taken, retrying");
                    candidate = self.base_dir.join(format!("{}-{}", name, n));
                    n += 1;
                }
                Err(e) => {
                    return Err(BackupError::CreateDirectory {
                        path: candidate,
                        source: e,
                    })
                }
            }
        }
    }
}

/// Symlinks are followed only when they resolve to a regular file
fn points_to_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

// ============================================================================
// TESTS
// ============================================================================

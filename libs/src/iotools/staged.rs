use super::{parent_dir, stage_file};
use crate::errors::{ArtifactError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};
use tracing::{debug, warn};

/// A batch of file writes that either all land or none do.
///
/// Each payload goes to a temporary file in the target's directory first.
/// [`StagedWrites::commit`] renames them into place; dropping the batch
/// uncommitted removes every temporary.
#[derive(Debug, Default)]
pub struct StagedWrites {
    staged: Vec<(NamedTempFile, PathBuf)>,
}

/// A target already moved into place, with the file it replaced set aside.
struct Committed {
    target: PathBuf,
    previous: Option<TempPath>,
}

impl StagedWrites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&mut self, target: PathBuf, bytes: &[u8]) -> Result<()> {
        let tmp = stage_file(&target, bytes)?;
        debug!(path = ?target, bytes = bytes.len(), "staged artifact");
        self.staged.push((tmp, target));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Moves every staged file to its target path, in staging order.
    ///
    /// Targets that exist must be regular files; this is checked before the first
    /// move. If a move still fails, targets already moved are removed and the files
    /// they replaced are put back.
    pub fn commit(self) -> Result<Vec<PathBuf>> {
        for (_, target) in &self.staged {
            check_target(target)?;
        }

        let mut committed: Vec<Committed> = Vec::with_capacity(self.staged.len());
        for (tmp, target) in self.staged {
            let previous = match set_aside(&target) {
                Ok(previous) => previous,
                Err(e) => {
                    roll_back(committed);
                    return Err(e);
                }
            };
            if let Err(e) = tmp.persist(&target) {
                roll_back(committed);
                restore(&target, previous);
                return Err(ArtifactError::stream(&target, e.error));
            }
            committed.push(Committed { target, previous });
        }

        Ok(committed.into_iter().map(|entry| entry.target).collect())
    }
}

fn check_target(target: &Path) -> Result<()> {
    match fs::symlink_metadata(target) {
        Ok(meta) if !meta.is_file() => Err(ArtifactError::stream(
            target,
            io::Error::new(io::ErrorKind::Other, "target exists and is not a regular file"),
        )),
        _ => Ok(()),
    }
}

/// Moves an existing target to a temporary path beside it; dropped unused, it is deleted.
fn set_aside(target: &Path) -> Result<Option<TempPath>> {
    if !target.exists() {
        return Ok(None);
    }
    let dir = parent_dir(target);
    let backup = NamedTempFile::new_in(dir)
        .map_err(|e| ArtifactError::stream(dir, e))?
        .into_temp_path();
    fs::rename(target, &backup).map_err(|e| ArtifactError::stream(target, e))?;
    Ok(Some(backup))
}

fn restore(target: &Path, previous: Option<TempPath>) {
    if let Some(previous) = previous {
        if let Err(e) = previous.persist(target) {
            warn!(path = ?target, error = %e.error, "could not restore previous artifact");
        }
    }
}

fn roll_back(committed: Vec<Committed>) {
    for entry in committed.into_iter().rev() {
        if let Err(e) = fs::remove_file(&entry.target) {
            warn!(path = ?entry.target, error = %e, "could not remove committed artifact");
        }
        restore(&entry.target, entry.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_commit_writes_all_targets() {
        let dir = TempDir::new().unwrap();
        let mut batch = StagedWrites::new();
        batch.stage(dir.path().join("a"), b"first").unwrap();
        batch.stage(dir.path().join("b"), b"second").unwrap();
        assert_eq!(batch.len(), 2);

        let written = batch.commit().unwrap();
        assert_eq!(written, vec![dir.path().join("a"), dir.path().join("b")]);
        assert_eq!(std::fs::read(dir.path().join("a")).unwrap(), b"first");
        assert_eq!(std::fs::read(dir.path().join("b")).unwrap(), b"second");
    }

    #[test]
    fn test_dropped_batch_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        {
            let mut batch = StagedWrites::new();
            batch.stage(dir.path().join("a"), b"first").unwrap();
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_non_file_target_fails_before_any_move() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a"), b"old").unwrap();
        std::fs::create_dir(dir.path().join("b")).unwrap();

        let mut batch = StagedWrites::new();
        batch.stage(dir.path().join("a"), b"new").unwrap();
        batch.stage(dir.path().join("b"), b"second").unwrap();
        batch.stage(dir.path().join("c"), b"third").unwrap();
        let err = batch.commit().unwrap_err();

        assert!(matches!(err, ArtifactError::Stream { .. }));
        assert_eq!(std::fs::read(dir.path().join("a")).unwrap(), b"old");
        assert!(dir.path().join("b").is_dir());
        assert!(!dir.path().join("c").exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_roll_back_restores_replaced_files() {
        let dir = TempDir::new().unwrap();
        let replaced = dir.path().join("a");
        let created = dir.path().join("b");
        std::fs::write(&replaced, b"old").unwrap();

        let previous = set_aside(&replaced).unwrap();
        assert!(previous.is_some());
        assert!(set_aside(&created).unwrap().is_none());
        std::fs::write(&replaced, b"new").unwrap();
        std::fs::write(&created, b"new").unwrap();

        roll_back(vec![
            Committed { target: replaced.clone(), previous },
            Committed { target: created.clone(), previous: None },
        ]);

        assert_eq!(std::fs::read(&replaced).unwrap(), b"old");
        assert!(!created.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_commit_replaces_and_cleans_up_previous() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a"), b"old").unwrap();
        let mut batch = StagedWrites::new();
        batch.stage(dir.path().join("a"), b"new").unwrap();
        batch.commit().unwrap();
        assert_eq!(std::fs::read(dir.path().join("a")).unwrap(), b"new");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_directory_is_stream_error() {
        let dir = TempDir::new().unwrap();
        let mut batch = StagedWrites::new();
        let err = batch.stage(dir.path().join("nope").join("a"), b"x").unwrap_err();
        assert!(matches!(err, ArtifactError::Stream { .. }));
    }
}

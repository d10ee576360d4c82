//! Artifact persistence

use crate::error::{ExportError, ExportResult};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Artifact bytes written to a temp file next to their destination
#[derive(Debug)]
pub struct StagedArtifact {
    path: PathBuf,
    temp_path: PathBuf,
}

impl StagedArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A target that was replaced during a commit, with its previous content
struct Replaced {
    path: PathBuf,
    backup: Option<PathBuf>,
}

/// Writes artifacts to disk and reads them back
///
/// Writes happen in two steps: [`ArtifactStore::stage`] writes each artifact
/// to a sibling temp file, [`ArtifactStore::commit`] renames a group of
/// staged artifacts into place. A commit that fails part way restores the
/// targets it already replaced, so a group lands completely or not at all.
/// Concurrent writers to the same paths must be serialized by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactStore;

impl ArtifactStore {
    pub fn new() -> Self {
        Self
    }

    /// Create or replace the artifact at `path`
    pub fn write(&self, path: &Path, bytes: &[u8]) -> ExportResult<()> {
        let staged = self.stage(path, bytes)?;
        self.commit(vec![staged])
    }

    /// Write `bytes` to a temp file beside `path` without touching `path`
    pub fn stage(&self, path: &Path, bytes: &[u8]) -> ExportResult<StagedArtifact> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ExportError::persistence(parent, e))?;
        }

        let temp_path = path.with_extension("tmp");
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| ExportError::persistence(&temp_path, e))?;

        file.write_all(bytes)
            .and_then(|_| file.sync_all())
            .map_err(|e| {
                let _ = fs::remove_file(&temp_path);
                ExportError::persistence(&temp_path, e)
            })?;

        debug!(path = %path.display(), bytes = bytes.len(), "Staged artifact");
        Ok(StagedArtifact {
            path: path.to_path_buf(),
            temp_path,
        })
    }

    /// Move every staged artifact into place, or none of them
    pub fn commit(&self, staged: Vec<StagedArtifact>) -> ExportResult<()> {
        let mut replaced = Vec::with_capacity(staged.len());
        let mut pending = staged.into_iter();

        while let Some(artifact) = pending.next() {
            match Self::swap_in(&artifact) {
                Ok(backup) => replaced.push(Replaced {
                    path: artifact.path,
                    backup,
                }),
                Err(e) => {
                    self.discard(std::iter::once(artifact).chain(pending.by_ref()).collect());
                    Self::roll_back(replaced);
                    return Err(e);
                }
            }
        }

        for target in replaced {
            if let Some(backup) = target.backup {
                let _ = fs::remove_file(backup);
            }
            debug!(path = %target.path.display(), "Committed artifact");
        }
        Ok(())
    }

    /// Remove the temp files of artifacts that will not be committed
    pub fn discard(&self, staged: Vec<StagedArtifact>) {
        for artifact in staged {
            let _ = fs::remove_file(&artifact.temp_path);
        }
    }

    /// Read the artifact at `path`
    pub fn read(&self, path: &Path) -> ExportResult<Vec<u8>> {
        fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ExportError::NotFound(path.to_path_buf()),
            _ => ExportError::persistence(path, e),
        })
    }

    /// Rename the temp file over the target, keeping the previous file as a backup
    fn swap_in(artifact: &StagedArtifact) -> ExportResult<Option<PathBuf>> {
        let backup = if artifact.path.is_file() {
            let backup = artifact.path.with_extension("bak");
            fs::rename(&artifact.path, &backup)
                .map_err(|e| ExportError::persistence(&artifact.path, e))?;
            Some(backup)
        } else {
            None
        };

        if let Err(e) = fs::rename(&artifact.temp_path, &artifact.path) {
            if let Some(backup) = &backup {
                let _ = fs::rename(backup, &artifact.path);
            }
            return Err(ExportError::persistence(&artifact.path, e));
        }

        Ok(backup)
    }

    fn roll_back(replaced: Vec<Replaced>) {
        for target in replaced.into_iter().rev() {
            let restored = match &target.backup {
                Some(backup) => fs::rename(backup, &target.path),
                None => fs::remove_file(&target.path),
            };
            if let Err(e) = restored {
                warn!(path = %target.path.display(), error = %e, "Failed to roll back artifact");
            }
        }
    }
}

//! Placing finished archives in the output directory.
//!
//! An archive is staged in a hidden `.glowfic-*.part` file next to its
//! target and renamed over it once fully written and synced, so a reader
//! never sees a half-written EPUB and a rerun replaces the previous one.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use engine_logging::engine_debug;
use tempfile::Builder;
use thiserror::Error;

const STAGING_PREFIX: &str = ".glowfic-";
const STAGING_SUFFIX: &str = ".part";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory {} is unusable: {reason}", path.display())]
    OutputDir { path: PathBuf, reason: String },
    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Creates `dir` (and its parents) unless it already is a directory.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    let unusable = |reason: String| PersistError::OutputDir {
        path: dir.to_path_buf(),
        reason,
    };
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(unusable("not a directory".to_string())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            engine_debug!("creating output directory {}", dir.display());
            fs::create_dir_all(dir).map_err(|err| unusable(err.to_string()))
        }
        Err(err) => Err(unusable(err.to_string())),
    }
}

pub struct ArchiveWriter {
    dir: PathBuf,
}

impl ArchiveWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Writes `archive` as `filename` inside the output directory and
    /// returns the final path.
    pub fn write(&self, filename: &str, archive: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let failed = |source: io::Error| PersistError::Write {
            path: target.clone(),
            source,
        };

        let mut staged = Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(STAGING_SUFFIX)
            .tempfile_in(&self.dir)
            .map_err(failed)?;
        staged.write_all(archive).map_err(failed)?;
        staged.as_file().sync_all().map_err(failed)?;
        staged.persist(&target).map_err(|err| failed(err.error))?;

        engine_debug!("{} bytes written to {}", archive.len(), target.display());
        Ok(target)
    }
}

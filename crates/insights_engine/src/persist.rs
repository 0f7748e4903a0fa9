use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("not a plain file name: {0:?}")]
    InvalidName(String),
    #[error("source file missing: {0}")]
    MissingSource(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure a directory exists; create it (and parents) if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))
}

/// Writes whole files into one directory via temp file + rename.
///
/// Readers never observe a half-written file; an existing file of the same
/// name is replaced.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// `filename` must be a single normal path component.
    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        let mut parts = Path::new(filename).components();
        if !matches!((parts.next(), parts.next()), (Some(Component::Normal(_)), None))
            || filename.contains(['/', '\\'])
        {
            return Err(PersistError::InvalidName(filename.to_string()));
        }
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// Move `source` into `dest_dir`, keeping its file name.
///
/// Falls back to copy + remove when a rename cannot cross filesystems. An
/// existing file of the same name in `dest_dir` is replaced.
pub fn move_into(source: &Path, dest_dir: &Path) -> Result<PathBuf, PersistError> {
    let name = source
        .file_name()
        .ok_or_else(|| PersistError::MissingSource(source.to_path_buf()))?;
    if !source.is_file() {
        return Err(PersistError::MissingSource(source.to_path_buf()));
    }
    ensure_output_dir(dest_dir)?;

    let target = dest_dir.join(name);
    if target.exists() {
        fs::remove_file(&target)?;
    }
    if fs::rename(source, &target).is_err() {
        fs::copy(source, &target)?;
        fs::remove_file(source)?;
    }
    Ok(target)
}

use std::fs;
use std::path::{Path, PathBuf};

use crate::persist::{ensure_output_dir, PersistError};

pub const DEFAULT_ROOT: &str = "crawler_output";
pub const COLLECTION_DIR: &str = "collection";
pub const PROCESSED_DIR: &str = "processed";

/// The three directories used as file-state queues.
///
/// Intake holds extracted posts awaiting enrichment, collection holds enriched
/// files named by paper id, processed archives intake files once enriched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub intake_dir: PathBuf,
    pub collection_dir: PathBuf,
    pub processed_dir: PathBuf,
}

impl Layout {
    /// Standard layout: intake at `root`, `collection/` and `processed/` inside it.
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            collection_dir: root.join(COLLECTION_DIR),
            processed_dir: root.join(PROCESSED_DIR),
            intake_dir: root,
        }
    }

    /// Create any missing directory.
    pub fn ensure(&self) -> Result<(), PersistError> {
        ensure_output_dir(&self.intake_dir)?;
        ensure_output_dir(&self.collection_dir)?;
        ensure_output_dir(&self.processed_dir)
    }

    /// `.txt` files directly inside the intake directory, sorted by name.
    pub fn intake_files(&self) -> Result<Vec<PathBuf>, PersistError> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.intake_dir)?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .map(|e| e.path())
            .filter(|p| is_text_file(p))
            .collect();
        files.sort();
        Ok(files)
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::under(DEFAULT_ROOT)
    }
}

fn is_text_file(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("txt")
}

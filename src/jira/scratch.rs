//! Scratch directory
//!
//! Local staging folder for attachments: downloads land here and uploads are
//! read from here. Nothing in it is ever deleted automatically.

use std::path::{PathBuf, MAIN_SEPARATOR};

use crate::error::{Result, ValidationError};
use crate::jira::types::ScratchListing;

/// Handle to the scratch directory
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the directory if it doesn't exist
    pub async fn ensure(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Path of `filename` inside the directory
    pub fn path_for(&self, filename: &str) -> Result<PathBuf> {
        Ok(self.root.join(sanitize_filename(filename)?))
    }

    /// Write `bytes` to `filename`, replacing any existing file
    pub async fn write(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path_for(filename)?;
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    /// Read `filename`, failing with `FileNotFound` if it isn't a file here
    pub async fn read(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.path_for(filename)?;
        if !tokio::fs::metadata(&path).await.map(|m| m.is_file()).unwrap_or(false) {
            return Err(ValidationError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        Ok(tokio::fs::read(&path).await?)
    }

    /// List regular files, sorted by name
    pub async fn list_files(&self) -> Result<ScratchListing> {
        let label = self.root.display();

        if !tokio::fs::try_exists(&self.root).await? {
            return Ok(ScratchListing {
                files: Vec::new(),
                count: None,
                message: format!("{} directory does not exist", label),
            });
        }

        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                files.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        files.sort();

        let count = files.len();
        Ok(ScratchListing {
            files,
            count: Some(count),
            message: format!("Found {} files in {} directory", count, label),
        })
    }
}

/// Reduce a filename to its final path component
///
/// Only `/` and the platform separator split components; any other
/// character, surrounding whitespace included, is part of the name.
pub fn sanitize_filename(filename: &str) -> Result<&str> {
    let name = filename
        .rsplit(|c: char| c == '/' || c == MAIN_SEPARATOR)
        .next()
        .unwrap_or_default();

    if name.is_empty() || name == "." || name == ".." {
        return Err(ValidationError::InvalidParameter {
            name: "filename".to_string(),
            message: format!("{:?} is not a usable file name", filename),
        }
        .into());
    }
    Ok(name)
}

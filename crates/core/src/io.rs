//! Font file reads and writes.

use std::{
    fs::{create_dir_all, read, write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

/// A font file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFile {
    path: PathBuf,
}

impl FontFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<Vec<u8>> {
        read(&self.path).with_context(|| format!("failed to read {}", self.path.display()))
    }

    /// Create the directories leading up to this file.
    pub fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        Ok(())
    }

    /// Write `data`, creating missing parent directories first.
    pub fn write(&self, data: impl AsRef<[u8]>) -> Result<()> {
        self.ensure_parent_dir()?;
        write(&self.path, data).with_context(|| format!("failed to write {}", self.path.display()))
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        self.path.file_stem().and_then(|s| s.to_str()).unwrap_or("font")
    }
}

impl AsRef<Path> for FontFile {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

pub fn read_font(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    FontFile::new(path.as_ref()).read()
}

pub fn write_font(path: impl AsRef<Path>, data: impl AsRef<[u8]>) -> Result<()> {
    FontFile::new(path.as_ref()).write(data)
}

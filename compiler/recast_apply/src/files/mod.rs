//! Where diffs read their files from and write them to.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::error::ApplyError;

/// A file's path (relative to its source root) and text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        SourceFile {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Reads files by relative path. Shared across worker threads.
pub trait FileSource: Send + Sync {
    fn read_file(&self, path: &str) -> Result<SourceFile, ApplyError>;
}

/// Receives rewritten files. Shared across worker threads.
pub trait FileDestination: Send + Sync {
    fn write_file(&self, file: &SourceFile) -> Result<(), ApplyError>;

    /// Called once after every diff has been applied.
    fn flush(&self) -> Result<(), ApplyError> {
        Ok(())
    }
}

/// Files under a root directory, read and written in place.
#[derive(Clone, Debug)]
pub struct FsFiles {
    root: PathBuf,
}

impl FsFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsFiles { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl FileSource for FsFiles {
    fn read_file(&self, path: &str) -> Result<SourceFile, ApplyError> {
        let content =
            std::fs::read_to_string(self.resolve(path)).map_err(|err| ApplyError::io(path, err))?;
        Ok(SourceFile::new(path, content))
    }
}

impl FileDestination for FsFiles {
    fn write_file(&self, file: &SourceFile) -> Result<(), ApplyError> {
        std::fs::write(self.resolve(&file.path), &file.content)
            .map_err(|err| ApplyError::io(&file.path, err))
    }
}

/// An in-memory file set, usable as both source and destination.
#[derive(Debug, Default)]
pub struct MemoryFiles {
    files: Mutex<FxHashMap<String, String>>,
    flushes: Mutex<usize>,
}

impl MemoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.lock().insert(path.into(), content.into());
        self
    }

    pub fn get(&self, path: &str) -> Option<String> {
        self.files.lock().get(path).cloned()
    }

    /// How many times [`FileDestination::flush`] ran.
    pub fn flush_count(&self) -> usize {
        *self.flushes.lock()
    }
}

impl FileSource for MemoryFiles {
    fn read_file(&self, path: &str) -> Result<SourceFile, ApplyError> {
        match self.files.lock().get(path) {
            Some(content) => Ok(SourceFile::new(path, content.clone())),
            None => Err(ApplyError::NotFound { path: path.to_string() }),
        }
    }
}

impl FileDestination for MemoryFiles {
    fn write_file(&self, file: &SourceFile) -> Result<(), ApplyError> {
        self.files.lock().insert(file.path.clone(), file.content.clone());
        Ok(())
    }

    fn flush(&self) -> Result<(), ApplyError> {
        *self.flushes.lock() += 1;
        Ok(())
    }
}

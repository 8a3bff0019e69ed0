//! Per-file diffs.

use recast_ir::{ChangeTracker, CompilationUnit};
use recast_patterns::Fix;

use crate::error::ApplyError;
use crate::files::SourceFile;

/// The changes one run makes to one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diff {
    path: String,
    changes: ChangeTracker,
    /// Length of the text the edits were computed against.
    base_len: usize,
}

impl Diff {
    pub fn new(path: impl Into<String>, changes: ChangeTracker, base_len: usize) -> Self {
        Diff {
            path: path.into(),
            changes,
            base_len,
        }
    }

    /// The edits of `fix` against `unit`, import lines included.
    pub fn from_fix(path: impl Into<String>, fix: &Fix, unit: &CompilationUnit) -> Self {
        Diff::new(path, fix.to_tracker(unit), unit.source.len())
    }

    /// Path of the file, relative to the file source's root.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Rewrite `file` in place.
    ///
    /// Fails without touching `file` when its text cannot be the text the
    /// edits were computed against, or when two edits overlap.
    pub fn apply_differences(&self, file: &mut SourceFile) -> Result<(), ApplyError> {
        if file.content.len() != self.base_len {
            return Err(self.not_applicable(format!(
                "expected {} bytes, found {}",
                self.base_len,
                file.content.len()
            )));
        }
        for edit in self.changes.edits() {
            let (start, end) = (edit.span.start as usize, edit.span.end as usize);
            if !file.content.is_char_boundary(start) || !file.content.is_char_boundary(end) {
                let reason = format!("edit at {} splits a character", edit.span);
                return Err(self.not_applicable(reason));
            }
        }
        let content = self
            .changes
            .apply_checked(&file.content)
            .map_err(|source| ApplyError::Conflict {
                path: self.path.clone(),
                source,
            })?;
        file.content = content;
        Ok(())
    }

    fn not_applicable(&self, reason: String) -> ApplyError {
        ApplyError::NotApplicable {
            path: self.path.clone(),
            reason,
        }
    }
}

//! The edit produced by one accepted match.

use std::collections::BTreeSet;

use recast_ir::{ChangeTracker, CompilationUnit, EditConflict, TextEdit};

/// Text edits against a unit's source, plus the imports they rely on.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Fix {
    pub edits: Vec<TextEdit>,
    pub imports_to_add: BTreeSet<String>,
    pub static_imports_to_add: BTreeSet<String>,
}

impl Fix {
    pub fn new(edits: Vec<TextEdit>) -> Self {
        Fix {
            edits,
            ..Fix::default()
        }
    }

    #[must_use]
    pub fn with_imports(
        mut self,
        imports: BTreeSet<String>,
        static_imports: BTreeSet<String>,
    ) -> Self {
        self.imports_to_add = imports;
        self.static_imports_to_add = static_imports;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
            && self.imports_to_add.is_empty()
            && self.static_imports_to_add.is_empty()
    }

    /// Fold another fix for the same unit into this one.
    pub fn merge(&mut self, other: Fix) {
        self.edits.extend(other.edits);
        self.imports_to_add.extend(other.imports_to_add);
        self.static_imports_to_add.extend(other.static_imports_to_add);
    }

    /// The import lines this fix adds to `unit`, skipping ones the unit
    /// already has. Regular imports come before static ones.
    pub fn import_lines(&self, unit: &CompilationUnit) -> Vec<String> {
        let regular = self
            .imports_to_add
            .iter()
            .filter(|path| !unit.has_import(path, false))
            .map(|path| format!("import {path};"));
        let statics = self
            .static_imports_to_add
            .iter()
            .filter(|path| !unit.has_import(path, true))
            .map(|path| format!("import static {path};"));
        regular.chain(statics).collect()
    }

    /// All edits for `unit`, with the import lines as one insertion after
    /// the last import (or the package declaration).
    pub fn to_tracker(&self, unit: &CompilationUnit) -> ChangeTracker {
        let mut tracker: ChangeTracker = self.edits.iter().cloned().collect();
        let lines = self.import_lines(unit);
        if lines.is_empty() {
            return tracker;
        }
        let (at, lead) = unit.import_insertion_point();
        let text = if lead.is_empty() {
            let mut text: String = lines.iter().map(|line| format!("{line}\n")).collect();
            text.push('\n');
            text
        } else {
            format!("{lead}{}", lines.join("\n"))
        };
        tracker.insert_before(at, text);
        tracker
    }

    /// The unit's source with this fix applied.
    pub fn apply_to(&self, unit: &CompilationUnit) -> Result<String, EditConflict> {
        self.to_tracker(unit).apply_checked(&unit.source)
    }
}

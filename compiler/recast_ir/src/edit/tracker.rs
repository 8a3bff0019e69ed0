//! Change Tracker
//!
//! Gathers the replacements that rule applications produce against one
//! source text, then splices them in with a single forward pass.

use std::fmt;

use crate::Span;

/// Text that takes the place of `span` in the original source.
///
/// An empty span inserts; an empty `new_text` deletes.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct TextEdit {
    pub span: Span,
    pub new_text: String,
}

impl TextEdit {
    pub fn replace(span: Span, new_text: impl Into<String>) -> Self {
        Self {
            span,
            new_text: new_text.into(),
        }
    }

    pub fn insert(offset: u32, text: impl Into<String>) -> Self {
        Self::replace(Span::new(offset, offset), text)
    }

    pub fn delete(span: Span) -> Self {
        Self::replace(span, String::new())
    }

    fn is_pure_insertion(&self) -> bool {
        self.span.is_empty()
    }
}

impl fmt::Display for TextEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {:?}", self.span, self.new_text)
    }
}

/// Two edits claim the same source bytes.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("conflicting edits {first} and {second}")]
pub struct EditConflict {
    pub first: TextEdit,
    pub second: TextEdit,
}

/// Edits queued against one source text, in the order they were added.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ChangeTracker {
    edits: Vec<TextEdit>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, span: Span, text: impl Into<String>) {
        self.push(TextEdit::replace(span, text));
    }

    pub fn insert_before(&mut self, offset: u32, text: impl Into<String>) {
        self.push(TextEdit::insert(offset, text));
    }

    pub fn push(&mut self, edit: TextEdit) {
        self.edits.push(edit);
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    /// Edits by start offset. Ties keep insertion order, so several
    /// insertions at one offset come out in the order they were queued.
    fn ordered(&self) -> Vec<&TextEdit> {
        let mut ordered: Vec<&TextEdit> = self.edits.iter().collect();
        ordered.sort_by_key(|edit| (edit.span.start, edit.span.end));
        ordered
    }

    /// The first pair of edits that overlap.
    ///
    /// Touching spans are fine, and so is any number of insertions sharing
    /// an offset.
    pub fn check_conflicts(&self) -> Option<EditConflict> {
        let ordered = self.ordered();
        ordered.iter().zip(ordered.iter().skip(1)).find_map(|(&first, &second)| {
            let shared_insert = first.is_pure_insertion() && second.is_pure_insertion();
            (first.span.end > second.span.start && !shared_insert).then(|| EditConflict {
                first: first.clone(),
                second: second.clone(),
            })
        })
    }

    /// Splice every edit into `source`.
    ///
    /// Spans past the end of `source` are clamped to it. Overlapping edits
    /// are not rejected here; the later one only sees what the earlier one
    /// left. Spans must fall on char boundaries.
    pub fn apply(&self, source: &str) -> String {
        let limit = source.len();
        let mut out = String::with_capacity(limit);
        let mut cursor = 0;
        for edit in self.ordered() {
            let start = (edit.span.start as usize).clamp(cursor, limit);
            let end = (edit.span.end as usize).clamp(start, limit);
            out.push_str(&source[cursor..start]);
            out.push_str(&edit.new_text);
            cursor = end;
        }
        out.push_str(&source[cursor..]);
        out
    }

    /// Like [`apply`](Self::apply), but refuses overlapping edits.
    pub fn apply_checked(&self, source: &str) -> Result<String, EditConflict> {
        match self.check_conflicts() {
            Some(conflict) => Err(conflict),
            None => Ok(self.apply(source)),
        }
    }
}

impl Extend<TextEdit> for ChangeTracker {
    fn extend<I: IntoIterator<Item = TextEdit>>(&mut self, iter: I) {
        self.edits.extend(iter);
    }
}

impl FromIterator<TextEdit> for ChangeTracker {
    fn from_iter<I: IntoIterator<Item = TextEdit>>(iter: I) -> Self {
        let mut tracker = Self::new();
        tracker.extend(iter);
        tracker
    }
}

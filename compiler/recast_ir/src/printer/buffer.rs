//! The text buffer the printer writes into.

/// Indentation unit for nested blocks.
const INDENT: &str = "    ";

/// Printed text so far. Offsets are byte offsets into the final text, which
/// is what layout spans record.
#[derive(Debug, Default)]
pub(super) struct SourceBuffer {
    text: String,
}

impl SourceBuffer {
    pub(super) fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub(super) fn space(&mut self) {
        self.text.push(' ');
    }

    pub(super) fn newline(&mut self) {
        self.text.push('\n');
    }

    pub(super) fn indent(&mut self, level: usize) {
        self.text.extend(std::iter::repeat(INDENT).take(level));
    }

    pub(super) fn offset(&self) -> usize {
        self.text.len()
    }

    /// End the text on a line break, if it does not already.
    pub(super) fn end_line(&mut self) {
        if !self.text.ends_with('\n') {
            self.text.push('\n');
        }
    }

    pub(super) fn into_string(self) -> String {
        self.text
    }
}

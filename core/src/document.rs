//! Read-only document views and the in-memory text buffer.
//!
//! The engine never touches files or editor buffers directly; it talks to a
//! [`DocumentView`]. The view hands out line geometry and raw bytes, and
//! receives the marker instructions the engine emits. [`TextBuffer`] is the
//! canonical in-memory implementation used by the CLI and the test suites;
//! editor adapters implement the same trait over their own storage.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Marker masks attached to lines by the engine. The values are opaque bits
/// passed through to the adapter; renderers map them to whatever visual
/// treatment they like.
pub mod marker {
    pub const CHANGED: u32 = 1 << 0;
    pub const ADDED: u32 = 1 << 1;
    pub const REMOVED: u32 = 1 << 2;
    /// Softer hue for lines inside a matched (but not moved) sub-run.
    pub const ADDED_LOCAL: u32 = 1 << 3;
    pub const REMOVED_LOCAL: u32 = 1 << 4;
    pub const MOVED_LINE: u32 = 1 << 5;
    pub const MOVED_BEGIN: u32 = 1 << 6;
    pub const MOVED_MID: u32 = 1 << 7;
    pub const MOVED_END: u32 = 1 << 8;
}

/// A contiguous line range of a document. `len == 0` at the public entry
/// means "from `off` to the end of the document".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub off: usize,
    pub len: usize,
}

impl Section {
    pub fn new(off: usize, len: usize) -> Self {
        Self { off, len }
    }

    /// Whole-document section.
    pub fn all() -> Self {
        Self { off: 0, len: 0 }
    }
}

/// Abstract view over one document being compared.
///
/// Positions (`line_start`, `line_end`, `text`, `mark_changed_text`) are byte
/// offsets into the document; line numbers are zero-based. `line_end` points
/// just past the last content byte of the line, before its end-of-line bytes.
pub trait DocumentView {
    fn line_count(&self) -> usize;
    fn total_char_count(&self) -> usize;
    fn line_start(&self, line: usize) -> usize;
    fn line_end(&self, line: usize) -> usize;
    fn text(&self, start: usize, end: usize) -> Cow<'_, [u8]>;

    /// Whether the presentation layer can align content above the first
    /// line. Editor adapters that cannot (annotations only attach below a
    /// line) return `false` and receive a blank-line insertion at the top
    /// when the comparison starts with a difference.
    fn can_align_before_first_line(&self) -> bool {
        true
    }

    fn insert_text(&mut self, pos: usize, text: &[u8]);
    fn clear_modified_flag(&mut self);

    fn add_marker(&mut self, line: usize, mask: u32);
    fn mark_changed_text(&mut self, pos: usize, len: usize);
}

/// In-memory document backed by a byte buffer, with recorded markers.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: Vec<u8>,
    /// Byte offset of the first character of each line.
    line_starts: Vec<usize>,
    markers: BTreeMap<usize, u32>,
    changed_spans: Vec<(usize, usize)>,
    modified: bool,
}

impl TextBuffer {
    pub fn new(text: impl Into<Vec<u8>>) -> Self {
        let text = text.into();
        let line_starts = index_lines(&text);
        Self {
            text,
            line_starts,
            markers: BTreeMap::new(),
            changed_spans: Vec::new(),
            modified: false,
        }
    }

    pub fn from_str(text: &str) -> Self {
        Self::new(text.as_bytes().to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.text
    }

    pub fn line_text(&self, line: usize) -> &[u8] {
        &self.text[self.line_start(line)..self.line_end(line)]
    }

    /// Combined marker mask recorded for a line (0 when unmarked).
    pub fn marker_mask(&self, line: usize) -> u32 {
        self.markers.get(&line).copied().unwrap_or(0)
    }

    pub fn markers(&self) -> &BTreeMap<usize, u32> {
        &self.markers
    }

    pub fn changed_spans(&self) -> &[(usize, usize)] {
        &self.changed_spans
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn clear_marks(&mut self) {
        self.markers.clear();
        self.changed_spans.clear();
    }
}

fn index_lines(text: &[u8]) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, &b) in text.iter().enumerate() {
        if b == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

impl DocumentView for TextBuffer {
    fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn total_char_count(&self) -> usize {
        self.text.len()
    }

    fn line_start(&self, line: usize) -> usize {
        self.line_starts[line]
    }

    fn line_end(&self, line: usize) -> usize {
        let end = match self.line_starts.get(line + 1) {
            Some(&next) => next - 1,
            None => self.text.len(),
        };
        // End-of-line is "\n" or "\r\n"; content stops before either.
        if end > self.line_starts[line] && self.text.get(end - 1) == Some(&b'\r') {
            end - 1
        } else {
            end
        }
    }

    fn text(&self, start: usize, end: usize) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.text[start..end])
    }

    fn insert_text(&mut self, pos: usize, text: &[u8]) {
        self.text.splice(pos..pos, text.iter().copied());
        self.line_starts = index_lines(&self.text);
        self.modified = true;
    }

    fn clear_modified_flag(&mut self) {
        self.modified = false;
    }

    fn add_marker(&mut self, line: usize, mask: u32) {
        *self.markers.entry(line).or_insert(0) |= mask;
    }

    fn mark_changed_text(&mut self, pos: usize, len: usize) {
        self.changed_spans.push((pos, len));
    }
}

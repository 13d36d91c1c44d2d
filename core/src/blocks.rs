//! Annotated diff blocks.
//!
//! The raw LCS output is lifted into [`BlockDiff`]s that accumulate the
//! annotations added by the later passes: matched sub-runs found by the
//! move detector, the replacement partner link, and per-line change spans
//! from the word differ. Partners are vector indices, never references;
//! the block vector owns every block for the run.

use crate::document::Section;
use crate::lcs::{BlockKind, RawBlock};

/// A sub-run of a block matched to a counterpart on the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MatchSection {
    pub off: usize,
    pub len: usize,
    /// True when the run was classified as moved rather than duplicated.
    pub moved: bool,
}

/// A line inside a replacement pair that differs only in parts, with its
/// change spans in original source columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChangedLine {
    pub line: usize,
    pub changes: Vec<Section>,
}

impl ChangedLine {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            changes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct BlockDiff {
    pub kind: BlockKind,
    /// Offset into the hashed line array of the block's own side (side A
    /// for `Match`); re-based to document lines by the driver.
    pub off: usize,
    pub len: usize,
    /// Index of the adjacent block this one replaces / is replaced by.
    pub partner: Option<usize>,
    pub changed_lines: Vec<ChangedLine>,
    pub matches: Vec<MatchSection>,
}

impl BlockDiff {
    pub fn from_raw(raw: RawBlock) -> Self {
        Self {
            kind: raw.kind,
            off: raw.off,
            len: raw.len,
            partner: None,
            changed_lines: Vec::new(),
            matches: Vec::new(),
        }
    }

    /// The matched sub-run covering `line` (block-relative), if any.
    /// Returns the full run length and its moved flag; callers that only
    /// probe boundaries must not assume the run starts at `line`.
    pub fn matched_section(&self, line: usize) -> Option<(usize, bool)> {
        self.matches
            .iter()
            .find(|m| line >= m.off && line < m.off + m.len)
            .map(|m| (m.len, m.moved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matched_section_covers_inclusive_range() {
        let mut block = BlockDiff::from_raw(RawBlock {
            kind: BlockKind::OnlyInA,
            off: 0,
            len: 10,
        });
        block.matches.push(MatchSection {
            off: 2,
            len: 3,
            moved: true,
        });

        assert_eq!(block.matched_section(1), None);
        assert_eq!(block.matched_section(2), Some((3, true)));
        assert_eq!(block.matched_section(4), Some((3, true)));
        assert_eq!(block.matched_section(5), None);
    }
}

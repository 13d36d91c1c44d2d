//! Marker emission and side-by-side alignment synthesis.
//!
//! Walks the annotated block list with one line cursor per document,
//! emitting marker instructions through the document views and building the
//! alignment table that lets a renderer put corresponding sections on the
//! same visual row. Rows are pushed before cursors advance, so each row
//! names the first line of the region it describes.

use serde::{Deserialize, Serialize};

use crate::blocks::BlockDiff;
use crate::config::DocSide;
use crate::document::{marker, DocumentView};
use crate::engine::DocState;
use crate::lcs::BlockKind;
use crate::progress::{Cancelled, ProgressMonitor};

/// One row of the alignment table: a line in each document plus the marker
/// mask painted on that row (0 for unmarked).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentRow {
    pub a_line: usize,
    pub a_mask: u32,
    pub b_line: usize,
    pub b_mask: u32,
}

pub(crate) fn push_row(
    alignment: &mut Vec<AlignmentRow>,
    side1: DocSide,
    line1: usize,
    mask1: u32,
    line2: usize,
    mask2: u32,
) {
    let row = if side1 == DocSide::A {
        AlignmentRow {
            a_line: line1,
            a_mask: mask1,
            b_line: line2,
            b_mask: mask2,
        }
    } else {
        AlignmentRow {
            a_line: line2,
            a_mask: mask2,
            b_line: line1,
            b_mask: mask1,
        }
    };

    debug_assert!(
        alignment
            .last()
            .map_or(true, |prev| prev.a_line <= row.a_line && prev.b_line <= row.b_line),
        "alignment rows must be non-decreasing on both sides"
    );

    alignment.push(row);
}

/// Mark `sub_len` lines of `block` starting at block-relative `sub_off`.
/// Lines outside any matched sub-run get the block's side mask; matched
/// runs get the local variant or the moved begin/mid/end chain.
fn mark_section(
    view: &mut dyn DocumentView,
    block: &BlockDiff,
    sub_off: usize,
    sub_len: usize,
    block_mask: u32,
) {
    let end = sub_off + sub_len;
    let mut i = sub_off;
    let mut line = block.off + sub_off;

    while i < end {
        match block.matched_section(i) {
            None => {
                view.add_marker(line, block_mask);
                i += 1;
                line += 1;
            }
            Some((len, moved)) => {
                let len = len.min(sub_len);
                if !moved {
                    let mask = if block_mask == marker::ADDED {
                        marker::ADDED_LOCAL
                    } else {
                        marker::REMOVED_LOCAL
                    };
                    for _ in 0..len {
                        view.add_marker(line, mask);
                        line += 1;
                    }
                    i += len;
                } else if len == 1 {
                    view.add_marker(line, marker::MOVED_LINE);
                    i += 1;
                    line += 1;
                } else {
                    view.add_marker(line, marker::MOVED_BEGIN);
                    line += 1;
                    for _ in 0..len - 2 {
                        view.add_marker(line, marker::MOVED_MID);
                        line += 1;
                    }
                    view.add_marker(line, marker::MOVED_END);
                    line += 1;
                    i += len;
                }
            }
        }
    }
}

/// Paint one positionally-paired changed line on both documents: the line
/// marker plus every in-line change span.
fn mark_line_diffs<'a>(
    view1: &'a mut dyn DocumentView,
    block1: &BlockDiff,
    view2: &'a mut dyn DocumentView,
    block2: &BlockDiff,
    idx: usize,
) {
    for (view, block) in [(view1, block1), (view2, block2)] {
        let changed = &block.changed_lines[idx];
        let line = block.off + changed.line;
        let line_pos = view.line_start(line);
        for change in &changed.changes {
            view.mark_changed_text(line_pos + change.off, change.len);
        }
        view.add_marker(line, marker::CHANGED);
    }
}

/// Walk the block list, mark every line, and fill the alignment table.
pub(crate) fn mark_all_diffs(
    doc1: &mut DocState<'_>,
    doc2: &mut DocState<'_>,
    blocks: &[BlockDiff],
    selection_compare: bool,
    alignment: &mut Vec<AlignmentRow>,
    progress: &mut dyn ProgressMonitor,
) -> Result<(), Cancelled> {
    progress.set_max(blocks.len());

    let side1 = doc1.side;
    let mut line1 = doc1.section.off;
    let mut line2 = doc2.section.off;

    let mut i = 0;
    while i < blocks.len() {
        let block = &blocks[i];
        match block.kind {
            BlockKind::Match => {
                push_row(alignment, side1, line1, 0, line2, 0);
                line1 += block.len;
                line2 += block.len;
            }
            BlockKind::OnlyInB => {
                mark_section(doc2.view, block, 0, block.len, doc2.mask);
                push_row(alignment, side1, line1, 0, line2, doc2.mask);
                line2 += block.len;
            }
            BlockKind::OnlyInA => {
                if let Some(pi) = block.partner {
                    let partner = &blocks[pi];
                    let mut off1 = 0;
                    let mut off2 = 0;

                    for j in 0..block.changed_lines.len() {
                        let len1 = block.changed_lines[j].line - off1;
                        let len2 = partner.changed_lines[j].line - off2;

                        if len1 > 0 || len2 > 0 {
                            push_row(alignment, side1, line1, doc1.mask, line2, doc2.mask);
                            if len1 > 0 {
                                mark_section(doc1.view, block, off1, len1, doc1.mask);
                                line1 += len1;
                            }
                            if len2 > 0 {
                                mark_section(doc2.view, partner, off2, len2, doc2.mask);
                                line2 += len2;
                            }
                        }

                        push_row(alignment, side1, line1, marker::CHANGED, line2, marker::CHANGED);
                        mark_line_diffs(doc1.view, block, doc2.view, partner, j);

                        off1 = block.changed_lines[j].line + 1;
                        off2 = partner.changed_lines[j].line + 1;
                        line1 += 1;
                        line2 += 1;
                    }

                    let tail1 = block.len - off1;
                    let tail2 = partner.len - off2;
                    if tail1 > 0 || tail2 > 0 {
                        push_row(alignment, side1, line1, doc1.mask, line2, doc2.mask);
                        if tail1 > 0 {
                            mark_section(doc1.view, block, off1, tail1, doc1.mask);
                            line1 += tail1;
                        }
                        if tail2 > 0 {
                            mark_section(doc2.view, partner, off2, tail2, doc2.mask);
                            line2 += tail2;
                        }
                    }

                    // The pair is fully consumed; skip the partner block.
                    i += 1;
                } else {
                    mark_section(doc1.view, block, 0, block.len, doc1.mask);
                    push_row(alignment, side1, line1, doc1.mask, line2, 0);
                    line1 += block.len;
                }
            }
        }

        if !progress.advance() {
            return Err(Cancelled);
        }
        i += 1;
    }

    if selection_compare {
        push_row(alignment, side1, line1, 0, line2, 0);
    }

    if !progress.next_phase() {
        return Err(Cancelled);
    }

    Ok(())
}

//! Comparison driver and public entry point.
//!
//! Orchestrates the pipeline: hash both documents, diff the hash vectors,
//! detect moves, pair replacement blocks line-by-line, then emit markers
//! and the alignment table. The entry point isolates panics from
//! collaborators and guarantees the progress monitor is closed on every
//! exit path.

use std::panic::{self, AssertUnwindSafe};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::align::{mark_all_diffs, AlignmentRow};
use crate::blocks::BlockDiff;
use crate::config::{CompareConfig, DocSide};
use crate::document::{marker, DocumentView, Section};
use crate::find_unique::run_find_unique;
use crate::hashing::compute_line_hashes;
use crate::lcs::{diff_blocks, BlockKind};
use crate::moves::detect_moves;
use crate::pairing::compare_blocks;
use crate::progress::{Cancelled, ProgressMonitor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareMode {
    /// Positional diff with markers and alignment.
    Full,
    /// Mark only lines with no hash-equal counterpart on the other side.
    FindUnique,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareStatus {
    /// The documents are equal under the configured normalization.
    Match,
    /// Differences were found; markers and alignment were emitted.
    Mismatch,
    /// The progress monitor cancelled the run; partial markers are left in
    /// place for the adapter to wipe.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub status: CompareStatus,
    pub alignment: Vec<AlignmentRow>,
}

#[derive(Debug, Error)]
pub enum CompareError {
    /// A collaborator panicked or an internal invariant was violated.
    #[error("internal comparison failure: {message}")]
    Internal { message: String },
}

/// Per-document pipeline state. `side` remembers which caller-side this
/// document is, so markers and alignment re-attribute correctly after the
/// driver swaps the two for the algorithmic passes.
pub(crate) struct DocState<'a> {
    pub view: &'a mut dyn DocumentView,
    pub side: DocSide,
    pub section: Section,
    pub mask: u32,
}

/// Compare two documents.
///
/// A `section` with `len == 0` covers the document from `off` to its end;
/// passing an explicit non-zero length on either side marks the run as a
/// selection compare, which appends a terminal unmarked alignment row.
///
/// Returns `Err` only for internal failures; cancellation is a status.
pub fn compare(
    doc_a: &mut dyn DocumentView,
    section_a: Section,
    doc_b: &mut dyn DocumentView,
    section_b: Section,
    mode: CompareMode,
    config: &CompareConfig,
    progress: &mut dyn ProgressMonitor,
    progress_label: &str,
) -> Result<Comparison, CompareError> {
    progress.begin(progress_label);

    let selection_compare = section_a.len > 0 || section_b.len > 0;
    let (mask_a, mask_b) = if config.old_side == DocSide::A {
        (marker::REMOVED, marker::ADDED)
    } else {
        (marker::ADDED, marker::REMOVED)
    };

    let mut alignment = Vec::new();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let doc1 = DocState {
            view: doc_a,
            side: DocSide::A,
            section: section_a,
            mask: mask_a,
        };
        let doc2 = DocState {
            view: doc_b,
            side: DocSide::B,
            section: section_b,
            mask: mask_b,
        };

        match mode {
            CompareMode::Full => run_compare(
                doc1,
                doc2,
                selection_compare,
                config,
                progress,
                &mut alignment,
            ),
            CompareMode::FindUnique => {
                let mut doc1 = doc1;
                let mut doc2 = doc2;
                run_find_unique(&mut doc1, &mut doc2, config, progress, &mut alignment)
            }
        }
    }));

    progress.close();

    match outcome {
        Ok(Ok(status)) => Ok(Comparison { status, alignment }),
        Ok(Err(Cancelled)) => Ok(Comparison {
            status: CompareStatus::Cancelled,
            alignment,
        }),
        Err(payload) => Err(CompareError::Internal {
            message: panic_message(payload.as_ref()),
        }),
    }
}

/// Whole-document comparison with default progress handling.
pub fn compare_documents(
    doc_a: &mut dyn DocumentView,
    doc_b: &mut dyn DocumentView,
    config: &CompareConfig,
) -> Result<Comparison, CompareError> {
    compare(
        doc_a,
        Section::all(),
        doc_b,
        Section::all(),
        CompareMode::Full,
        config,
        &mut crate::progress::NoProgress,
        "",
    )
}

fn run_compare<'a>(
    mut doc1: DocState<'a>,
    mut doc2: DocState<'a>,
    selection_compare: bool,
    config: &CompareConfig,
    progress: &mut dyn ProgressMonitor,
    alignment: &mut Vec<AlignmentRow>,
) -> Result<CompareStatus, Cancelled> {
    let mut hashes1 = compute_line_hashes(&*doc1.view, &mut doc1.section, config, progress)?;
    if !progress.next_phase() {
        return Err(Cancelled);
    }
    let mut hashes2 = compute_line_hashes(&*doc2.view, &mut doc2.section, config, progress)?;
    if !progress.next_phase() {
        return Err(Cancelled);
    }

    // The differ's cost tracks the shorter input's edits, and the move
    // detector probes the unmatched sections of side 1; keep the longer
    // document there.
    if hashes1.len() < hashes2.len() {
        std::mem::swap(&mut doc1, &mut doc2);
        std::mem::swap(&mut hashes1, &mut hashes2);
    }

    let mut blocks: Vec<BlockDiff> = diff_blocks(&hashes1, &hashes2)
        .into_iter()
        .map(BlockDiff::from_raw)
        .collect();
    debug!(
        "diffed {} vs {} lines into {} blocks",
        hashes1.len(),
        hashes2.len(),
        blocks.len()
    );

    if blocks.is_empty() || (blocks.len() == 1 && blocks[0].kind == BlockKind::Match) {
        // Equal documents still get an alignment anchor at the origins (and
        // the terminal row in selection mode), as the mark walk would emit
        // for a single matched block.
        crate::align::push_row(
            alignment,
            doc1.side,
            doc1.section.off,
            0,
            doc2.section.off,
            0,
        );
        if selection_compare {
            crate::align::push_row(
                alignment,
                doc1.side,
                doc1.section.off + doc1.section.len,
                0,
                doc2.section.off + doc2.section.len,
                0,
            );
        }
        return Ok(CompareStatus::Match);
    }

    if config.detect_moves {
        detect_moves(&mut blocks, &hashes1, &hashes2);
    }

    // Presentation layers that cannot align content above the first line
    // get a blank line to hang the alignment on when the comparison starts
    // with a difference.
    if blocks[0].kind != BlockKind::Match
        && (doc1.section.off == 0 || doc2.section.off == 0)
        && (!doc1.view.can_align_before_first_line() || !doc2.view.can_align_before_first_line())
    {
        for doc in [&mut doc1, &mut doc2] {
            doc.view.insert_text(0, b"\n");
            doc.view.clear_modified_flag();
            doc.section.off += 1;
        }
    }

    // Re-base block offsets from section-relative to document lines.
    if doc1.section.off > 0 || doc2.section.off > 0 {
        for block in &mut blocks {
            match block.kind {
                BlockKind::OnlyInB => block.off += doc2.section.off,
                _ => block.off += doc1.section.off,
            }
        }
    }

    if !progress.next_phase() {
        return Err(Cancelled);
    }

    // Pair every adjacent removal/insertion as a replacement and diff its
    // lines word-by-word.
    progress.set_max(blocks.len());
    for i in 0..blocks.len() {
        if blocks[i].kind == BlockKind::OnlyInB
            && i != 0
            && blocks[i - 1].kind == BlockKind::OnlyInA
        {
            blocks[i - 1].partner = Some(i);
            blocks[i].partner = Some(i - 1);
            compare_blocks(&*doc1.view, &*doc2.view, config, &mut blocks, i - 1, i);
        }
        if !progress.advance() {
            return Err(Cancelled);
        }
    }

    if !progress.next_phase() {
        return Err(Cancelled);
    }

    mark_all_diffs(
        &mut doc1,
        &mut doc2,
        &blocks,
        selection_compare,
        alignment,
        progress,
    )?;

    Ok(CompareStatus::Mismatch)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

//! Find-unique mode.
//!
//! A simpler top level requested explicitly by the caller: instead of a
//! positional diff, every line that has no hash-equal counterpart anywhere
//! on the other side is marked with its side's mask. Ordering is ignored;
//! a single alignment row anchors the two section origins.

use rustc_hash::FxHashMap;

use crate::align::AlignmentRow;
use crate::config::CompareConfig;
use crate::engine::{CompareStatus, DocState};
use crate::hashing::compute_line_hashes;
use crate::progress::{Cancelled, ProgressMonitor};

pub(crate) fn run_find_unique(
    doc1: &mut DocState<'_>,
    doc2: &mut DocState<'_>,
    config: &CompareConfig,
    progress: &mut dyn ProgressMonitor,
    alignment: &mut Vec<AlignmentRow>,
) -> Result<CompareStatus, Cancelled> {
    let hashes1 = compute_line_hashes(&*doc1.view, &mut doc1.section, config, progress)?;
    if !progress.next_phase() {
        return Err(Cancelled);
    }
    let hashes2 = compute_line_hashes(&*doc2.view, &mut doc2.section, config, progress)?;
    if !progress.next_phase() {
        return Err(Cancelled);
    }

    let mut buckets1: FxHashMap<u64, Vec<usize>> = FxHashMap::default();
    for (line, &hash) in hashes1.iter().enumerate() {
        buckets1.entry(hash).or_default().push(line);
    }
    if !progress.next_phase() {
        return Err(Cancelled);
    }

    let mut buckets2: FxHashMap<u64, Vec<usize>> = FxHashMap::default();
    for (line, &hash) in hashes2.iter().enumerate() {
        buckets2.entry(hash).or_default().push(line);
    }
    if !progress.next_phase() {
        return Err(Cancelled);
    }

    // Hashes present on both sides are not unique anywhere: drop them from
    // side 2 and skip marking side 1.
    let mut unique_in_1 = 0usize;
    for (hash, lines) in &buckets1 {
        if buckets2.remove(hash).is_none() {
            for &line in lines {
                doc1.view.add_marker(line + doc1.section.off, doc1.mask);
                unique_in_1 += 1;
            }
        }
    }

    if unique_in_1 == 0 && buckets2.is_empty() {
        return Ok(CompareStatus::Match);
    }

    for lines in buckets2.values() {
        for &line in lines {
            doc2.view.add_marker(line + doc2.section.off, doc2.mask);
        }
    }

    alignment.push(AlignmentRow {
        a_line: doc1.section.off,
        a_mask: 0,
        b_line: doc2.section.off,
        b_mask: 0,
    });

    Ok(CompareStatus::Mismatch)
}

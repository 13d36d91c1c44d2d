//! Move detection across unmatched blocks.
//!
//! After the block differ runs, sub-runs of `OnlyInA` blocks that reappear
//! verbatim inside `OnlyInB` blocks are matched to each other so the
//! renderer can show them as moved (or, for duplicated content, as locally
//! matched) instead of plain removals and additions.
//!
//! A run is classified *moved* only when its occurrence counts line up:
//! `|A occurrences| + 1 == |B occurrences|`, excluding single lines that
//! appear several times in B. One equal line among many is ambiguous
//! noise, while a longer repeated run is still a real correspondence.

use crate::blocks::{BlockDiff, MatchSection};
use crate::document::Section;
use crate::hashing::HASH_SEED;
use crate::lcs::BlockKind;

/// Candidate match for one anchor line: the run it sits in (relative to the
/// anchor's block) and every equal-length occurrence found so far, as
/// `(block_index, block_relative_offset)` pairs.
#[derive(Debug, Default)]
struct MatchInfo {
    sec: Section,
    matches_in_a: Vec<(usize, usize)>,
    matches_in_b: Vec<(usize, usize)>,
}

/// Locate every maximal run in the B-side blocks equal to the run around
/// `anchor_line`, keeping only occurrences of the longest length seen.
fn find_matches(
    blocks: &[BlockDiff],
    hashes_a: &[u64],
    hashes_b: &[u64],
    anchor_block: usize,
    anchor_line: usize,
) -> MatchInfo {
    let mut mi = MatchInfo::default();
    let mut min_match_len = 1usize;
    let anchor = &blocks[anchor_block];
    let anchor_hash = hashes_a[anchor.off + anchor_line];

    for (bi, block_b) in blocks.iter().enumerate() {
        if block_b.kind != BlockKind::OnlyInB {
            continue;
        }

        let mut e2 = 0usize;
        while e2 + min_match_len <= block_b.len {
            if hashes_b[block_b.off + e2] != anchor_hash {
                e2 += 1;
                continue;
            }
            if let Some((mlen, _)) = block_b.matched_section(e2) {
                e2 += mlen;
                continue;
            }

            // Extend the run symmetrically; the B side stops at runs that
            // are already matched.
            let mut back = 0usize;
            while back < anchor_line
                && back < e2
                && block_b.matched_section(e2 - back - 1).is_none()
                && hashes_a[anchor.off + anchor_line - back - 1]
                    == hashes_b[block_b.off + e2 - back - 1]
            {
                back += 1;
            }
            let mut fwd = 0usize;
            while anchor_line + fwd + 1 < anchor.len
                && e2 + fwd + 1 < block_b.len
                && block_b.matched_section(e2 + fwd + 1).is_none()
                && hashes_a[anchor.off + anchor_line + fwd + 1]
                    == hashes_b[block_b.off + e2 + fwd + 1]
            {
                fwd += 1;
            }

            let start_a = anchor_line - back;
            let start_b = e2 - back;
            let match_len = back + fwd + 1;

            if mi.sec.len > match_len {
                e2 += 1;
                continue;
            }
            if mi.sec.len < match_len {
                mi.sec = Section::new(start_a, match_len);
                mi.matches_in_b.clear();
                min_match_len = match_len;
            }
            mi.matches_in_b.push((bi, start_b));
            e2 = start_b + match_len;
        }
    }

    mi
}

/// Probe `probe_block` for other occurrences of the anchor's line. A longer
/// run replaces the candidate (and moves the anchor); an equal-length run
/// with identical content joins the candidate's A occurrences.
fn find_better_match(
    blocks: &[BlockDiff],
    hashes_a: &[u64],
    hashes_b: &[u64],
    probe_block: usize,
    anchor: &mut (usize, usize),
    best: &mut MatchInfo,
) {
    if best.sec.len == 0 {
        return;
    }

    let mut i = if probe_block == anchor.0 {
        best.sec.off + best.sec.len
    } else {
        0
    };

    while i + best.sec.len <= blocks[probe_block].len {
        let anchor_hash = hashes_a[blocks[anchor.0].off + anchor.1];
        if hashes_a[blocks[probe_block].off + i] != anchor_hash {
            i += 1;
            continue;
        }
        if let Some((mlen, _)) = blocks[probe_block].matched_section(i) {
            i += mlen;
            continue;
        }

        let mi = find_matches(blocks, hashes_a, hashes_b, probe_block, i);
        if mi.sec.len == 0 {
            i += 1;
            continue;
        }

        if best.sec.len < mi.sec.len {
            *anchor = (probe_block, i);
            *best = mi;
            i = best.sec.off + best.sec.len;
        } else if best.sec.len == mi.sec.len {
            let best_off = blocks[anchor.0].off + best.sec.off;
            let probe_off = blocks[probe_block].off + mi.sec.off;
            let identical =
                (0..mi.sec.len).all(|k| hashes_a[best_off + k] == hashes_a[probe_off + k]);
            if identical {
                best.matches_in_a.push((probe_block, mi.sec.off));
                i = mi.sec.off + mi.sec.len;
            } else {
                i += 1;
            }
        } else {
            i += 1;
        }
    }
}

/// Walk every unmatched line of every `OnlyInA` block, find its best run in
/// B, widen the search to competing A occurrences, classify, and record the
/// match on every participating block.
pub(crate) fn detect_moves(blocks: &mut [BlockDiff], hashes_a: &[u64], hashes_b: &[u64]) {
    for di1 in 0..blocks.len() {
        if blocks[di1].kind != BlockKind::OnlyInA {
            continue;
        }

        let mut e1 = 0usize;
        while e1 < blocks[di1].len {
            if let Some((mlen, _)) = blocks[di1].matched_section(e1) {
                e1 += mlen;
                continue;
            }
            // Blank lines are never move anchors.
            if hashes_a[blocks[di1].off + e1] == HASH_SEED {
                e1 += 1;
                continue;
            }

            let mut anchor = (di1, e1);
            let mut best = find_matches(blocks, hashes_a, hashes_b, di1, e1);
            if best.sec.len == 0 {
                e1 += 1;
                continue;
            }

            // The same line may sit in a better run elsewhere: first within
            // this block past the candidate, then in every later A block.
            find_better_match(blocks, hashes_a, hashes_b, di1, &mut anchor, &mut best);
            for di2 in di1 + 1..blocks.len() {
                if blocks[di2].kind == BlockKind::OnlyInA {
                    find_better_match(blocks, hashes_a, hashes_b, di2, &mut anchor, &mut best);
                }
            }

            let moved = best.matches_in_a.len() + 1 == best.matches_in_b.len()
                && !(best.sec.len == 1 && best.matches_in_b.len() > 1);

            blocks[anchor.0].matches.push(MatchSection {
                off: best.sec.off,
                len: best.sec.len,
                moved,
            });
            for &(bi, off) in &best.matches_in_a {
                blocks[bi].matches.push(MatchSection {
                    off,
                    len: best.sec.len,
                    moved,
                });
            }
            for &(bi, off) in &best.matches_in_b {
                blocks[bi].matches.push(MatchSection {
                    off,
                    len: best.sec.len,
                    moved,
                });
            }

            if anchor == (di1, e1) {
                e1 = best.sec.off + best.sec.len;
            }
            // Otherwise the current line is still unmatched: revisit it, it
            // may match something else now.
        }
    }
}

//! Changed-line pairing inside a replacement pair.
//!
//! Given an adjacent `OnlyInA`/`OnlyInB` pair, lines are paired one-to-one
//! by convergence: the percentage of matching words or characters between
//! the two lines, normalized by the larger side. A greedy mapping is built
//! from every starting candidate in turn; exploring each start is enough to
//! escape a locally attractive pair that blocks a better global mapping,
//! without paying for a full combinatorial search. The winning mapping is
//! the one whose monotonic subsequence carries the most convergence.

use std::collections::BTreeMap;

use crate::blocks::{BlockDiff, ChangedLine};
use crate::config::CompareConfig;
use crate::document::{DocumentView, Section};
use crate::lcs::{diff_blocks, BlockKind, RawBlock};
use crate::words::{split_words, Word};

/// Pair the lines of the replacement pair `(ia, ib)` and record in-line
/// change spans on both blocks. Block offsets must already be document
/// lines.
pub(crate) fn compare_blocks(
    doc_a: &dyn DocumentView,
    doc_b: &dyn DocumentView,
    config: &CompareConfig,
    blocks: &mut [BlockDiff],
    ia: usize,
    ib: usize,
) {
    let len_a = blocks[ia].len;
    let len_b = blocks[ib].len;

    let words_a = split_words(doc_a, blocks[ia].off, len_a, config);
    let words_b = split_words(doc_b, blocks[ib].off, len_b, config);

    let chars_a: Vec<usize> = words_a.iter().map(|ws| line_chars(ws)).collect();
    let chars_b: Vec<usize> = words_b.iter().map(|ws| line_chars(ws)).collect();

    // Every eligible pair scored above the threshold, ordered by
    // (convergence desc, a_line asc, b_line asc).
    let mut candidates: Vec<(usize, usize, usize)> = Vec::new();

    let mut la = 0usize;
    while la < len_a {
        if words_a[la].is_empty() {
            la += 1;
            continue;
        }
        if let Some((mlen, true)) = blocks[ia].matched_section(la) {
            la += mlen;
            continue;
        }

        let mut lb = 0usize;
        while lb < len_b {
            if words_b[lb].is_empty() {
                lb += 1;
                continue;
            }
            if let Some((mlen, true)) = blocks[ib].matched_section(lb) {
                lb += mlen;
                continue;
            }

            if let Some(conv) = line_convergence(
                &words_a[la],
                &words_b[lb],
                chars_a[la].max(chars_b[lb]),
                config,
            ) {
                candidates.push((conv, la, lb));
            }
            lb += 1;
        }
        la += 1;
    }

    candidates.sort_by(|x, y| {
        y.0.cmp(&x.0)
            .then(x.1.cmp(&y.1))
            .then(x.2.cmp(&y.2))
    });

    let mut best_mapping: BTreeMap<usize, (usize, usize)> = BTreeMap::new();
    let mut best_conv = 0usize;

    for start in 0..candidates.len() {
        let mut mapping: BTreeMap<usize, (usize, usize)> = BTreeMap::new();
        let mut used_a = vec![false; len_a];
        let mut used_b = vec![false; len_b];
        let mut mapped_a = 0usize;
        let mut mapped_b = 0usize;

        for &(conv, ca, cb) in &candidates[start..] {
            if used_a[ca] || used_b[cb] {
                continue;
            }
            mapping.insert(ca, (conv, cb));
            mapped_a += 1;
            mapped_b += 1;
            if mapped_a == len_a || mapped_b == len_b {
                break;
            }
            used_a[ca] = true;
            used_b[cb] = true;
        }

        // Only the monotonic subsequence of the mapping survives emission,
        // so score exactly that.
        let mut conv_sum = 0usize;
        let mut last_b: Option<usize> = None;
        for (_, &(conv, cb)) in &mapping {
            if last_b.map_or(true, |prev| cb > prev) {
                conv_sum += conv;
                last_b = Some(cb);
            }
        }

        if conv_sum > best_conv {
            best_conv = conv_sum;
            best_mapping = mapping;
        }
    }

    if !best_mapping.is_empty() {
        compare_lines(blocks, ia, ib, &words_a, &words_b, &best_mapping);
    }
}

fn line_chars(words: &[Word]) -> usize {
    words.iter().map(|w| w.len).sum()
}

/// Convergence percentage for one line pair, or `None` when the pair is
/// too dissimilar to be worth comparing.
fn line_convergence(
    line_a: &[Word],
    line_b: &[Word],
    max_chars: usize,
    config: &CompareConfig,
) -> Option<usize> {
    let (long, short) = if line_a.len() < line_b.len() {
        (line_b, line_a)
    } else {
        (line_a, line_b)
    };

    if long.len() > config.max_word_ratio as usize * short.len() {
        return None;
    }

    let segs = diff_blocks(long, short);

    let mut matched_words = 0usize;
    let mut matched_chars = 0usize;
    for seg in segs.iter().filter(|s| s.kind == BlockKind::Match) {
        matched_words += seg.len;
        matched_chars += line_chars(&long[seg.off..seg.off + seg.len]);
    }

    let word_conv = matched_words * 100 / long.len();
    let char_conv = matched_chars * 100 / max_chars;
    let conv = word_conv.max(char_conv);

    (conv >= config.min_line_convergence as usize).then_some(conv)
}

/// Run the word differ over each monotonically paired line and record the
/// change spans, positionally paired across the two blocks.
fn compare_lines(
    blocks: &mut [BlockDiff],
    ia: usize,
    ib: usize,
    words_a: &[Vec<Word>],
    words_b: &[Vec<Word>],
    mapping: &BTreeMap<usize, (usize, usize)>,
) {
    let mut last_b: Option<usize> = None;

    for (&la, &(_conv, lb)) in mapping {
        // a_lines ascend by construction; b_lines must too.
        if last_b.map_or(false, |prev| lb <= prev) {
            continue;
        }
        last_b = Some(lb);

        let (i1, i2, l1, l2, w1, w2) = if words_a[la].len() < words_b[lb].len() {
            (ib, ia, lb, la, &words_b[lb], &words_a[la])
        } else {
            (ia, ib, la, lb, &words_a[la], &words_b[lb])
        };

        let segs = diff_blocks(w1.as_slice(), w2.as_slice());
        if segs.len() == 1 && segs[0].kind == BlockKind::Match {
            continue;
        }

        let mut changed_1 = ChangedLine::new(l1);
        let mut changed_2 = ChangedLine::new(l2);

        for seg in &segs {
            match seg.kind {
                BlockKind::OnlyInA => changed_1.changes.push(span_of(w1, seg)),
                BlockKind::OnlyInB => changed_2.changes.push(span_of(w2, seg)),
                BlockKind::Match => {}
            }
        }

        blocks[i1].changed_lines.push(changed_1);
        blocks[i2].changed_lines.push(changed_2);
    }
}

/// Absolute column span of a word run, whitespace included.
fn span_of(words: &[Word], seg: &RawBlock) -> Section {
    let first = words[seg.off];
    let last = words[seg.off + seg.len - 1];
    Section::new(first.col, last.col + last.len - first.col)
}

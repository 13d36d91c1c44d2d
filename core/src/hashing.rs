//! Line fingerprinting.
//!
//! Every in-scope line is reduced to a 64-bit hash under the configured
//! normalization (ASCII case folding, space/tab elision). An empty line
//! hashes to the seed value; the move detector and the trailing-blank trim
//! rely on that sentinel.

use crate::config::CompareConfig;
use crate::document::{DocumentView, Section};
use crate::progress::{Cancelled, ProgressMonitor};

pub(crate) const HASH_SEED: u64 = 0x8422_2325;

/// One step of the byte-mix hash.
#[inline]
pub(crate) fn hash_byte(hval: u64, byte: u8) -> u64 {
    let h = hval ^ u64::from(byte);
    h.wrapping_add(
        (h << 1)
            .wrapping_add(h << 4)
            .wrapping_add(h << 5)
            .wrapping_add(h << 7)
            .wrapping_add(h << 8)
            .wrapping_add(h << 40),
    )
}

/// Hash every line of `section`, clamping the section against the live
/// document first (`len == 0` or overrun means "to end of document").
///
/// A trailing line that is empty after normalization is dropped and the
/// section shrunk by one so a phantom final blank never produces a
/// spurious difference.
pub(crate) fn compute_line_hashes(
    doc: &dyn DocumentView,
    section: &mut Section,
    config: &CompareConfig,
    progress: &mut dyn ProgressMonitor,
) -> Result<Vec<u64>, Cancelled> {
    let interval = config.cancel_check_lines.max(1) as usize;

    let mut line_count = doc.total_char_count();
    if line_count != 0 {
        line_count = doc.line_count();
    }

    if section.len == 0 || section.off + section.len > line_count {
        section.len = line_count.saturating_sub(section.off);
    }

    progress.set_max(section.len / interval + 1);

    let mut hashes = vec![HASH_SEED; section.len];

    for i in 0..section.len {
        if i % interval == 0 && !progress.advance() {
            return Err(Cancelled);
        }

        let line = section.off + i;
        let start = doc.line_start(line);
        let end = doc.line_end(line);
        if end <= start {
            continue;
        }

        let text = doc.text(start, end);
        let mut h = HASH_SEED;
        for &b in text.iter() {
            let b = if config.ignore_case {
                b.to_ascii_lowercase()
            } else {
                b
            };
            if config.ignore_whitespace && (b == b' ' || b == b'\t') {
                continue;
            }
            h = hash_byte(h, b);
        }
        hashes[i] = h;
    }

    if section.len > 0 && hashes.last() == Some(&HASH_SEED) {
        hashes.pop();
        section.len -= 1;
    }

    Ok(hashes)
}

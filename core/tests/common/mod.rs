//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use sidediff::{
    compare, CompareConfig, CompareMode, Comparison, NoProgress, Section, TextBuffer,
};

pub fn compare_texts(
    a: &str,
    b: &str,
    config: &CompareConfig,
) -> (Comparison, TextBuffer, TextBuffer) {
    compare_texts_mode(a, b, CompareMode::Full, config)
}

pub fn compare_texts_mode(
    a: &str,
    b: &str,
    mode: CompareMode,
    config: &CompareConfig,
) -> (Comparison, TextBuffer, TextBuffer) {
    let mut buf_a = TextBuffer::from_str(a);
    let mut buf_b = TextBuffer::from_str(b);
    let cmp = compare(
        &mut buf_a,
        Section::all(),
        &mut buf_b,
        Section::all(),
        mode,
        config,
        &mut NoProgress,
        "test",
    )
    .expect("comparison should not fail");
    (cmp, buf_a, buf_b)
}

/// All `(line, mask)` pairs recorded on a buffer, ascending by line.
pub fn marked_lines(buf: &TextBuffer) -> Vec<(usize, u32)> {
    buf.markers().iter().map(|(&line, &mask)| (line, mask)).collect()
}

pub fn assert_alignment_monotonic(cmp: &Comparison) {
    for pair in cmp.alignment.windows(2) {
        assert!(
            pair[0].a_line <= pair[1].a_line && pair[0].b_line <= pair[1].b_line,
            "alignment rows must be non-decreasing: {:?}",
            cmp.alignment
        );
    }
}

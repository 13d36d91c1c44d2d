mod common;

use std::borrow::Cow;

use common::{assert_alignment_monotonic, compare_texts};
use sidediff::{
    compare, marker, AlignmentRow, CompareConfig, CompareMode, CompareStatus, Comparison,
    DocumentView, NoProgress, Section, TextBuffer,
};

#[test]
fn alignment_rows_are_monotonic_for_mixed_edits() {
    let (cmp, _, _) = compare_texts(
        "intro\nmoved1\nmoved2\nshared a b c\nkept\ntail one\ntail two",
        "intro\nkept\nshared a b d\nmoved1\nmoved2\nbrand new\ntail two",
        &CompareConfig::default(),
    );
    assert_eq!(cmp.status, CompareStatus::Mismatch);
    assert!(!cmp.alignment.is_empty());
    assert_alignment_monotonic(&cmp);
}

#[test]
fn every_marked_line_is_within_its_document() {
    let (_, a, b) = compare_texts(
        "one\ntwo\nthree\nfour",
        "zero\ntwo\nfour\nfive\nsix",
        &CompareConfig::default(),
    );
    for (&line, _) in a.markers() {
        assert!(line < a.line_count());
    }
    for (&line, _) in b.markers() {
        assert!(line < b.line_count());
    }
}

#[test]
fn comparison_serializes_to_json_and_back() {
    let (cmp, _, _) = compare_texts("x\ny", "x\nz", &CompareConfig::default());
    let json = serde_json::to_string(&cmp).unwrap();
    let back: Comparison = serde_json::from_str(&json).unwrap();
    assert_eq!(cmp, back);
}

/// Wraps a `TextBuffer` as a presentation layer that cannot align content
/// above its first line, opting in to the blank-line workaround.
struct EditorLikeDoc(TextBuffer);

impl DocumentView for EditorLikeDoc {
    fn line_count(&self) -> usize {
        self.0.line_count()
    }
    fn total_char_count(&self) -> usize {
        self.0.total_char_count()
    }
    fn line_start(&self, line: usize) -> usize {
        self.0.line_start(line)
    }
    fn line_end(&self, line: usize) -> usize {
        self.0.line_end(line)
    }
    fn text(&self, start: usize, end: usize) -> Cow<'_, [u8]> {
        self.0.text(start, end)
    }
    fn can_align_before_first_line(&self) -> bool {
        false
    }
    fn insert_text(&mut self, pos: usize, text: &[u8]) {
        self.0.insert_text(pos, text)
    }
    fn clear_modified_flag(&mut self) {
        self.0.clear_modified_flag()
    }
    fn add_marker(&mut self, line: usize, mask: u32) {
        self.0.add_marker(line, mask)
    }
    fn mark_changed_text(&mut self, pos: usize, len: usize) {
        self.0.mark_changed_text(pos, len)
    }
}

#[test]
fn leading_difference_inserts_blank_lines_for_editor_adapters() {
    let mut a = EditorLikeDoc(TextBuffer::from_str("a\nx"));
    let mut b = EditorLikeDoc(TextBuffer::from_str("b\nx"));
    let cmp = compare(
        &mut a,
        Section::all(),
        &mut b,
        Section::all(),
        CompareMode::Full,
        &CompareConfig::default(),
        &mut NoProgress,
        "",
    )
    .unwrap();
    assert_eq!(cmp.status, CompareStatus::Mismatch);

    // Both documents grew a blank first line and everything shifted down.
    assert_eq!(a.0.line_count(), 3);
    assert_eq!(b.0.line_count(), 3);
    assert_eq!(a.0.line_text(0), b"");
    assert!(!a.0.is_modified(), "save point must be restored");

    assert_eq!(a.0.marker_mask(1), marker::REMOVED);
    assert_eq!(b.0.marker_mask(1), marker::ADDED);
    assert_eq!(
        cmp.alignment,
        vec![
            AlignmentRow {
                a_line: 1,
                a_mask: marker::REMOVED,
                b_line: 1,
                b_mask: marker::ADDED
            },
            AlignmentRow {
                a_line: 2,
                a_mask: 0,
                b_line: 2,
                b_mask: 0
            },
        ]
    );
}

#[test]
fn in_memory_buffers_never_get_the_blank_line_workaround() {
    let (cmp, a, _) = compare_texts("a\nx", "b\nx", &CompareConfig::default());
    assert_eq!(cmp.status, CompareStatus::Mismatch);
    assert_eq!(a.line_count(), 2);
    assert_eq!(cmp.alignment[0].a_line, 0);
}

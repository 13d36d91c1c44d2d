//! Terminal rendering of a finished comparison.

use sidediff::{marker, AlignmentRow, Comparison, DocumentView, TextBuffer};

const GUTTER_WIDTH: usize = 40;

fn glyph(mask: u32) -> char {
    if mask & marker::CHANGED != 0 {
        '!'
    } else if mask & (marker::ADDED | marker::ADDED_LOCAL) != 0 {
        '+'
    } else if mask & (marker::REMOVED | marker::REMOVED_LOCAL) != 0 {
        '-'
    } else if mask
        & (marker::MOVED_LINE | marker::MOVED_BEGIN | marker::MOVED_MID | marker::MOVED_END)
        != 0
    {
        '>'
    } else {
        ' '
    }
}

fn cell(buf: &TextBuffer, line: Option<usize>) -> String {
    match line {
        Some(line) if line < buf.line_count() => {
            let text = String::from_utf8_lossy(buf.line_text(line));
            let mark = glyph(buf.marker_mask(line));
            format!("{mark} {:<width$.width$}", text, width = GUTTER_WIDTH)
        }
        _ => format!("~ {:<width$}", "", width = GUTTER_WIDTH),
    }
}

/// Lay the two documents out row by row, padding the shorter side of each
/// aligned segment with gap lines.
pub fn side_by_side(a: &TextBuffer, b: &TextBuffer, alignment: &[AlignmentRow]) -> String {
    let mut out = String::new();

    // Segment boundaries: each alignment row plus the document ends.
    let mut bounds: Vec<(usize, usize)> = alignment.iter().map(|r| (r.a_line, r.b_line)).collect();
    if bounds.is_empty() {
        bounds.push((0, 0));
    }
    bounds.push((a.line_count(), b.line_count()));

    for pair in bounds.windows(2) {
        let (a_from, b_from) = pair[0];
        let (a_to, b_to) = pair[1];
        let rows = (a_to - a_from).max(b_to - b_from);
        for i in 0..rows {
            let a_line = (a_from + i < a_to).then_some(a_from + i);
            let b_line = (b_from + i < b_to).then_some(b_from + i);
            out.push_str(&cell(a, a_line));
            out.push_str(" | ");
            out.push_str(&cell(b, b_line));
            out.push('\n');
        }
    }

    out
}

/// Machine-readable dump: status, alignment, and the recorded marker and
/// changed-text instructions for both sides.
pub fn to_json(cmp: &Comparison, a: &TextBuffer, b: &TextBuffer) -> anyhow::Result<String> {
    let markers = |buf: &TextBuffer| -> Vec<serde_json::Value> {
        buf.markers()
            .iter()
            .map(|(&line, &mask)| serde_json::json!({ "line": line, "mask": mask }))
            .collect()
    };
    let spans = |buf: &TextBuffer| -> Vec<serde_json::Value> {
        buf.changed_spans()
            .iter()
            .map(|&(pos, len)| serde_json::json!({ "pos": pos, "len": len }))
            .collect()
    };

    let value = serde_json::json!({
        "status": cmp.status,
        "alignment": cmp.alignment,
        "a": { "markers": markers(a), "changed": spans(a) },
        "b": { "markers": markers(b), "changed": spans(b) },
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_prioritize_changed_over_side_masks() {
        assert_eq!(glyph(marker::CHANGED | marker::ADDED), '!');
        assert_eq!(glyph(marker::ADDED_LOCAL), '+');
        assert_eq!(glyph(marker::MOVED_MID), '>');
        assert_eq!(glyph(0), ' ');
    }

    #[test]
    fn side_by_side_pads_the_shorter_segment() {
        use sidediff::{compare_documents, CompareConfig};

        let mut a = TextBuffer::from_str("same\nonly in a\nsame2");
        let mut b = TextBuffer::from_str("same\nsame2");
        let cmp = compare_documents(&mut a, &mut b, &CompareConfig::default()).unwrap();
        let rendered = side_by_side(&a, &b, &cmp.alignment);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("- only in a"));
        assert!(lines[1].contains("| ~"));
    }
}

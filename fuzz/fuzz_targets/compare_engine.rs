#![no_main]

use libfuzzer_sys::fuzz_target;
use sidediff::{
    compare, CompareConfig, CompareMode, NoProgress, Section, TextBuffer,
};

// Map fuzz bytes onto two small documents over a tiny alphabet so hash
// collisions, duplicated runs and moves all occur, then check the engine
// never panics and its alignment stays monotonic.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let config = CompareConfig {
        ignore_case: data[0] & 1 != 0,
        ignore_whitespace: data[0] & 2 != 0,
        detect_moves: data[0] & 4 != 0,
        ..Default::default()
    };
    let mode = if data[0] & 8 != 0 {
        CompareMode::FindUnique
    } else {
        CompareMode::Full
    };

    let split = 1 + (data[1] as usize % data.len().saturating_sub(1).max(1));
    let doc = |bytes: &[u8]| {
        let mut text = String::new();
        for &b in bytes.iter().take(64) {
            match b % 6 {
                0 => text.push_str("alpha beta\n"),
                1 => text.push_str("gamma delta\n"),
                2 => text.push_str("alpha Beta\n"),
                3 => text.push_str("\n"),
                4 => text.push_str(&format!("line {}\n", b / 6)),
                _ => text.push_str("alpha  beta\n"),
            }
        }
        TextBuffer::from_str(&text)
    };

    let mut a = doc(&data[1..split]);
    let mut b = doc(&data[split..]);

    let cmp = compare(
        &mut a,
        Section::all(),
        &mut b,
        Section::all(),
        mode,
        &config,
        &mut NoProgress,
        "fuzz",
    )
    .expect("engine must not fail on plain buffers");

    for pair in cmp.alignment.windows(2) {
        assert!(pair[0].a_line <= pair[1].a_line);
        assert!(pair[0].b_line <= pair[1].b_line);
    }
    for (&line, _) in a.markers() {
        assert!(line < a.line_count());
    }
    for (&line, _) in b.markers() {
        assert!(line < b.line_count());
    }
});

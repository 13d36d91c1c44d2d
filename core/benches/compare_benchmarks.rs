use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sidediff::{compare_documents, CompareConfig, CompareStatus, TextBuffer};

const SIZES: [usize; 2] = [1_000, 5_000];

/// Deterministic pseudo-text: enough shared vocabulary for realistic
/// convergence, enough variation to avoid degenerate hash collisions.
fn synthetic_doc(lines: usize, seed: u64) -> String {
    let mut state = seed | 1;
    let mut out = String::new();
    for i in 0..lines {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let word = state % 97;
        out.push_str(&format!("fn item_{i}(x: u64) -> u64 {{ x + {word} }}\n"));
    }
    out
}

/// Copy of `src` with every `every`-th line edited and one ten-line block
/// moved toward the end.
fn edited_copy(src: &str, every: usize) -> String {
    let mut lines: Vec<String> = src.lines().map(str::to_string).collect();
    for (i, line) in lines.iter_mut().enumerate() {
        if i % every == 0 {
            line.push_str(" // edited");
        }
    }
    if lines.len() > 40 {
        let block: Vec<String> = lines.drain(10..20).collect();
        let at = lines.len() - 10;
        for (i, line) in block.into_iter().enumerate() {
            lines.insert(at + i, line);
        }
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn bench_identical(c: &mut Criterion) {
    let mut group = c.benchmark_group("identical");
    for &size in &SIZES {
        let text = synthetic_doc(size, 7);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bencher, _| {
            bencher.iter(|| {
                let mut a = TextBuffer::from_str(&text);
                let mut b = TextBuffer::from_str(&text);
                let cmp = compare_documents(&mut a, &mut b, &CompareConfig::default()).unwrap();
                assert_eq!(cmp.status, CompareStatus::Match);
            });
        });
    }
    group.finish();
}

fn bench_edited(c: &mut Criterion) {
    let mut group = c.benchmark_group("edited_with_moves");
    for &size in &SIZES {
        let old = synthetic_doc(size, 7);
        let new = edited_copy(&old, 25);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bencher, _| {
            bencher.iter(|| {
                let mut a = TextBuffer::from_str(&old);
                let mut b = TextBuffer::from_str(&new);
                let cmp = compare_documents(&mut a, &mut b, &CompareConfig::default()).unwrap();
                assert_eq!(cmp.status, CompareStatus::Mismatch);
            });
        });
    }
    group.finish();
}

fn bench_move_detection_off(c: &mut Criterion) {
    let config = CompareConfig {
        detect_moves: false,
        ..Default::default()
    };
    let old = synthetic_doc(5_000, 7);
    let new = edited_copy(&old, 25);
    c.bench_function("edited_without_moves/5000", |bencher| {
        bencher.iter(|| {
            let mut a = TextBuffer::from_str(&old);
            let mut b = TextBuffer::from_str(&new);
            let cmp = compare_documents(&mut a, &mut b, &config).unwrap();
            assert_eq!(cmp.status, CompareStatus::Mismatch);
        });
    });
}

criterion_group!(
    benches,
    bench_identical,
    bench_edited,
    bench_move_detection_off
);
criterion_main!(benches);

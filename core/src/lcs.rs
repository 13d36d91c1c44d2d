//! Generic longest-common-subsequence block differ.
//!
//! Implements Eugene Myers' O((N+M)D) edit-script algorithm over any
//! equality-comparable element slice and folds the edit script into block
//! runs. The output is canonical: no two `Match` blocks are adjacent, and
//! between matches a deletion run (`OnlyInA`) always precedes an insertion
//! run (`OnlyInB`). Ties break toward earlier matches in A.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockKind {
    Match,
    OnlyInA,
    OnlyInB,
}

/// One run of the edit script. `off` indexes the sequence the block belongs
/// to: A for `Match` and `OnlyInA`, B for `OnlyInB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawBlock {
    pub kind: BlockKind,
    pub off: usize,
    pub len: usize,
}

pub(crate) fn diff_blocks<T: PartialEq>(a: &[T], b: &[T]) -> Vec<RawBlock> {
    let prefix = a
        .iter()
        .zip(b.iter())
        .take_while(|(x, y)| x == y)
        .count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    let inner_a = &a[prefix..a.len() - suffix];
    let inner_b = &b[prefix..b.len() - suffix];

    let mut builder = BlockBuilder::default();
    for i in 0..prefix {
        builder.push_equal(i);
    }
    myers(inner_a, inner_b, prefix, &mut builder);
    for i in 0..suffix {
        builder.push_equal(a.len() - suffix + i);
    }
    builder.finish()
}

/// Folds a stream of per-element edits into canonical blocks.
#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<RawBlock>,
    match_run: Option<(usize, usize)>,
    pending_del: Option<(usize, usize)>,
    pending_ins: Option<(usize, usize)>,
}

impl BlockBuilder {
    fn push_equal(&mut self, a_idx: usize) {
        self.flush_pending();
        match self.match_run.as_mut() {
            Some((_, len)) => *len += 1,
            None => self.match_run = Some((a_idx, 1)),
        }
    }

    fn push_del(&mut self, a_idx: usize) {
        self.flush_match();
        match self.pending_del.as_mut() {
            Some((_, len)) => *len += 1,
            None => self.pending_del = Some((a_idx, 1)),
        }
    }

    fn push_ins(&mut self, b_idx: usize) {
        self.flush_match();
        match self.pending_ins.as_mut() {
            Some((_, len)) => *len += 1,
            None => self.pending_ins = Some((b_idx, 1)),
        }
    }

    fn flush_match(&mut self) {
        if let Some((off, len)) = self.match_run.take() {
            self.blocks.push(RawBlock {
                kind: BlockKind::Match,
                off,
                len,
            });
        }
    }

    fn flush_pending(&mut self) {
        if let Some((off, len)) = self.pending_del.take() {
            self.blocks.push(RawBlock {
                kind: BlockKind::OnlyInA,
                off,
                len,
            });
        }
        if let Some((off, len)) = self.pending_ins.take() {
            self.blocks.push(RawBlock {
                kind: BlockKind::OnlyInB,
                off,
                len,
            });
        }
    }

    fn finish(mut self) -> Vec<RawBlock> {
        self.flush_match();
        self.flush_pending();
        self.blocks
    }
}

/// Core Myers loop over pre-trimmed slices, feeding the builder in forward
/// order with indices shifted by `base`.
fn myers<T: PartialEq>(a: &[T], b: &[T], base: usize, builder: &mut BlockBuilder) {
    let n = a.len();
    let m = b.len();

    if n == 0 {
        for j in 0..m {
            builder.push_ins(base + j);
        }
        return;
    }
    if m == 0 {
        for i in 0..n {
            builder.push_del(base + i);
        }
        return;
    }

    let max_d = n + m;
    let offset = max_d as isize;
    let mut v = vec![0usize; 2 * max_d + 1];

    // trace[d] holds the furthest-reaching x for diagonals -d..=d (step 2).
    let mut trace: Vec<Vec<usize>> = Vec::new();

    'outer: for d in 0..=max_d {
        let mut row = Vec::with_capacity(d + 1);
        let mut k = -(d as isize);
        while k <= d as isize {
            let down = k == -(d as isize)
                || (k != d as isize
                    && v[(k - 1 + offset) as usize] < v[(k + 1 + offset) as usize]);
            let mut x = if down {
                v[(k + 1 + offset) as usize]
            } else {
                v[(k - 1 + offset) as usize] + 1
            };
            let mut y = (x as isize - k) as usize;
            while x < n && y < m && a[x] == b[y] {
                x += 1;
                y += 1;
            }
            v[(k + offset) as usize] = x;
            row.push(x);
            if x >= n && y >= m {
                trace.push(row);
                break 'outer;
            }
            k += 2;
        }
        trace.push(row);
    }

    // Backtrack from (n, m); edits come out reversed.
    #[derive(Clone, Copy)]
    enum Step {
        Equal(usize),
        Del(usize),
        Ins(usize),
    }

    let mut steps: Vec<Step> = Vec::new();
    let mut x = n;
    let mut y = m;

    for d in (0..trace.len()).rev() {
        let k = x as isize - y as isize;
        if d == 0 {
            while x > 0 && y > 0 {
                x -= 1;
                y -= 1;
                steps.push(Step::Equal(x));
            }
            break;
        }

        let prev = &trace[d - 1];
        let prev_at = |k: isize| prev[((k + d as isize - 1) / 2) as usize];

        let down = k == -(d as isize)
            || (k != d as isize && prev_at(k - 1) < prev_at(k + 1));
        let prev_k = if down { k + 1 } else { k - 1 };
        let prev_x = prev_at(prev_k);
        let prev_y = (prev_x as isize - prev_k) as usize;

        while x > prev_x && y > prev_y {
            x -= 1;
            y -= 1;
            steps.push(Step::Equal(x));
        }
        if down {
            y -= 1;
            steps.push(Step::Ins(y));
        } else {
            x -= 1;
            steps.push(Step::Del(x));
        }
    }

    for step in steps.into_iter().rev() {
        match step {
            Step::Equal(i) => builder.push_equal(base + i),
            Step::Del(i) => builder.push_del(base + i),
            Step::Ins(j) => builder.push_ins(base + j),
        }
    }
}

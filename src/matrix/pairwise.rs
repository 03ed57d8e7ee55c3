// src/matrix/pairwise.rs

//! Pairwise (2-way) covering arrays.
//!
//! Works on value *indices*: `sizes[i]` is the number of selected values of
//! axis `i`, and every returned row holds one index per axis. The caller maps
//! indices back to axis values.
//!
//! Construction is greedy: each new row is the one covering the most
//! still-uncovered pairs. Pure first-come tie-breaking is not good enough to
//! reach the `k * k` optimum for three axes of `k` values, so a few
//! deterministic passes with different secondary tie-breakers are run and the
//! smallest array wins (earlier passes win ties):
//!
//! 1. exhaustive candidate search, ties to the earliest candidate;
//! 2. exhaustive search, ties to the candidate whose values were used least;
//! 3. exhaustive search, ties to the candidate whose values have the fewest
//!    pairs left;
//! 4. incremental row construction, axis by axis (always run; it is the only
//!    pass used once the full product exceeds [`EXHAUSTIVE_LIMIT`]).
//!
//! Candidates are visited in registration order (last axis fastest), so the
//! result is fully deterministic.

use tracing::debug;

/// Largest full product for which the exhaustive passes are attempted.
pub const EXHAUSTIVE_LIMIT: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TieBreak {
    First,
    LeastUsed,
    Sparsest,
}

/// Bookkeeping of which cross-axis value pairs are still uncovered.
#[derive(Debug)]
struct PairTable {
    sizes: Vec<usize>,
    /// `offsets[i][j]` (for `i < j`) is where the `sizes[i] * sizes[j]` block
    /// of that axis pair starts in `uncovered`.
    offsets: Vec<Vec<usize>>,
    uncovered: Vec<bool>,
    remaining: usize,
}

impl PairTable {
    fn new(sizes: &[usize]) -> Self {
        let n = sizes.len();
        let mut offsets = vec![vec![0; n]; n];
        let mut total = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                offsets[i][j] = total;
                total += sizes[i] * sizes[j];
            }
        }
        Self {
            sizes: sizes.to_vec(),
            offsets,
            uncovered: vec![true; total],
            remaining: total,
        }
    }

    fn slot(&self, i: usize, a: usize, j: usize, b: usize) -> usize {
        let (i, a, j, b) = if i < j { (i, a, j, b) } else { (j, b, i, a) };
        self.offsets[i][j] + a * self.sizes[j] + b
    }

    fn is_uncovered(&self, i: usize, a: usize, j: usize, b: usize) -> bool {
        self.uncovered[self.slot(i, a, j, b)]
    }

    /// Number of uncovered pairs a complete row would cover.
    fn gain(&self, row: &[usize]) -> usize {
        let mut gain = 0;
        for i in 0..row.len() {
            for j in (i + 1)..row.len() {
                if self.is_uncovered(i, row[i], j, row[j]) {
                    gain += 1;
                }
            }
        }
        gain
    }

    /// Number of uncovered pairs value `v` of `axis` would cover together with
    /// the already assigned axes of a partial row.
    fn partial_gain(&self, row: &[Option<usize>], axis: usize, v: usize) -> usize {
        row.iter()
            .enumerate()
            .filter(|(j, other)| *j != axis && other.is_some_and(|b| self.is_uncovered(axis, v, *j, b)))
            .count()
    }

    /// Uncovered pairs involving value `v` of `axis`.
    fn weight(&self, axis: usize, v: usize) -> usize {
        let mut weight = 0;
        for (j, &size) in self.sizes.iter().enumerate() {
            if j == axis {
                continue;
            }
            weight += (0..size).filter(|&b| self.is_uncovered(axis, v, j, b)).count();
        }
        weight
    }

    fn cover(&mut self, row: &[usize]) {
        for i in 0..row.len() {
            for j in (i + 1)..row.len() {
                let slot = self.slot(i, row[i], j, row[j]);
                if self.uncovered[slot] {
                    self.uncovered[slot] = false;
                    self.remaining -= 1;
                }
            }
        }
    }

    fn is_done(&self) -> bool {
        self.remaining == 0
    }
}

/// Build a pairwise covering array over axes of the given sizes.
///
/// - No axes: a single empty row.
/// - Any empty axis: no rows.
/// - One axis: every value once.
pub fn covering_rows(sizes: &[usize]) -> Vec<Vec<usize>> {
    if sizes.is_empty() {
        return vec![Vec::new()];
    }
    if sizes.contains(&0) {
        return Vec::new();
    }
    if let [only] = sizes {
        return (0..*only).map(|v| vec![v]).collect();
    }

    let mut passes = Vec::new();
    if full_product(sizes).is_some_and(|p| p <= EXHAUSTIVE_LIMIT) {
        for tie in [TieBreak::First, TieBreak::LeastUsed, TieBreak::Sparsest] {
            let rows = exhaustive(sizes, tie);
            debug!(?sizes, ?tie, rows = rows.len(), "pairwise exhaustive pass");
            passes.push(rows);
        }
    }
    let rows = incremental(sizes);
    debug!(?sizes, rows = rows.len(), "pairwise incremental pass");
    passes.push(rows);

    passes.into_iter().min_by_key(Vec::len).unwrap_or_default()
}

/// Product of the sizes, `None` on overflow.
pub fn full_product(sizes: &[usize]) -> Option<usize> {
    sizes.iter().try_fold(1usize, |acc, &s| acc.checked_mul(s))
}

/// Advance `row` to the next index tuple, last position fastest.
/// Returns `false` once every tuple has been visited.
pub(crate) fn advance(row: &mut [usize], sizes: &[usize]) -> bool {
    for pos in (0..row.len()).rev() {
        row[pos] += 1;
        if row[pos] < sizes[pos] {
            return true;
        }
        row[pos] = 0;
    }
    false
}

fn exhaustive(sizes: &[usize], tie: TieBreak) -> Vec<Vec<usize>> {
    let mut table = PairTable::new(sizes);
    let mut usage: Vec<Vec<usize>> = sizes.iter().map(|&s| vec![0; s]).collect();
    let mut rows = Vec::new();

    while !table.is_done() {
        let mut best: Option<((usize, i64), Vec<usize>)> = None;
        let mut candidate = vec![0; sizes.len()];
        loop {
            let gain = table.gain(&candidate);
            if gain > 0 {
                let secondary = match tie {
                    TieBreak::First => 0,
                    TieBreak::LeastUsed => -sum_i64(candidate.iter().enumerate().map(|(i, &v)| usage[i][v])),
                    TieBreak::Sparsest => -sum_i64(candidate.iter().enumerate().map(|(i, &v)| table.weight(i, v))),
                };
                let key = (gain, secondary);
                if best.as_ref().is_none_or(|(k, _)| key > *k) {
                    best = Some((key, candidate.clone()));
                }
            }
            if !advance(&mut candidate, sizes) {
                break;
            }
        }

        // `table` is not done, so some candidate has a positive gain.
        let Some((_, row)) = best else { break };
        table.cover(&row);
        for (i, &v) in row.iter().enumerate() {
            usage[i][v] += 1;
        }
        rows.push(row);
    }
    rows
}

fn incremental(sizes: &[usize]) -> Vec<Vec<usize>> {
    let mut table = PairTable::new(sizes);
    let mut rows = Vec::new();

    while !table.is_done() {
        // Seed with the value that has the most pairs left.
        let mut seed: Option<(usize, usize, usize)> = None;
        for (axis, &size) in sizes.iter().enumerate() {
            for v in 0..size {
                let weight = table.weight(axis, v);
                if seed.is_none_or(|(w, _, _)| weight > w) {
                    seed = Some((weight, axis, v));
                }
            }
        }
        let Some((_, seed_axis, seed_value)) = seed else { break };

        let mut row: Vec<Option<usize>> = vec![None; sizes.len()];
        row[seed_axis] = Some(seed_value);
        for (axis, &size) in sizes.iter().enumerate() {
            if row[axis].is_some() {
                continue;
            }
            let mut best: Option<((usize, usize), usize)> = None;
            for v in 0..size {
                let key = (table.partial_gain(&row, axis, v), table.weight(axis, v));
                if best.is_none_or(|(k, _)| key > k) {
                    best = Some((key, v));
                }
            }
            row[axis] = best.map(|(_, v)| v);
        }

        let row: Vec<usize> = row.into_iter().map(|v| v.unwrap_or(0)).collect();
        table.cover(&row);
        rows.push(row);
    }
    rows
}

fn sum_i64(values: impl Iterator<Item = usize>) -> i64 {
    values.map(|v| i64::try_from(v).unwrap_or(i64::MAX)).fold(0i64, i64::saturating_add)
}

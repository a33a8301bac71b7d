// this_file: crates/glyphtools-core/src/ckmeans.rs

//! Optimal one-dimensional k-means
//!
//! On a number line, every optimal k-means cluster is a contiguous run of the
//! sorted values. That turns clustering into choosing `k - 1` cut points, and
//! the best cuts fall out of a dynamic program over prefix sums:
//!
//! ```text
//! D[m][i] = min over j of D[m-1][j-1] + ssq(j..=i)
//! ```
//!
//! where `ssq` is the weighted sum of squared deviations from the run's
//! mean. The optimal `j` never moves left as `i` grows, so each row is filled
//! by divide and conquer in `O(n log n)`, giving `O(k n log n)` overall.

use std::ops::Range;

use crate::error::{GlyphtoolsError, Result};

/// Weighted prefix sums for constant-time range costs
struct PrefixSums {
    w: Vec<f64>,
    wx: Vec<f64>,
    wxx: Vec<f64>,
}

impl PrefixSums {
    fn new(values: &[f64], weights: &[f64]) -> Self {
        // Centre the data to keep the squared sums well conditioned
        let shift = values[values.len() / 2];
        let n = values.len();
        let mut w = Vec::with_capacity(n + 1);
        let mut wx = Vec::with_capacity(n + 1);
        let mut wxx = Vec::with_capacity(n + 1);
        w.push(0.0);
        wx.push(0.0);
        wxx.push(0.0);
        for (&x, &weight) in values.iter().zip(weights) {
            let x = x - shift;
            w.push(w[w.len() - 1] + weight);
            wx.push(wx[wx.len() - 1] + weight * x);
            wxx.push(wxx[wxx.len() - 1] + weight * x * x);
        }
        Self { w, wx, wxx }
    }

    /// Weighted sum of squared deviations of `values[j..=i]`
    fn ssq(&self, j: usize, i: usize) -> f64 {
        let w = self.w[i + 1] - self.w[j];
        if w <= 0.0 {
            return 0.0;
        }
        let wx = self.wx[i + 1] - self.wx[j];
        let wxx = self.wxx[i + 1] - self.wxx[j];
        (wxx - wx * wx / w).max(0.0)
    }
}

/// Split sorted `values` into `k` contiguous clusters with minimal total
/// weighted within-cluster sum of squares.
///
/// `values` must be sorted ascending and `weights` must be positive and the
/// same length. Returns index ranges into `values`, in ascending order, none
/// of them empty.
pub fn ckmeans(values: &[f64], weights: &[f64], k: usize) -> Result<Vec<Range<usize>>> {
    let n = values.len();
    if n == 0 {
        return Err(GlyphtoolsError::InvalidBinRequest(
            "no values to cluster".into(),
        ));
    }
    if k == 0 || k > n {
        return Err(GlyphtoolsError::InvalidBinRequest(format!(
            "cannot split {n} values into {k} clusters"
        )));
    }
    if weights.len() != n {
        return Err(GlyphtoolsError::InvalidBinRequest(format!(
            "{} weights for {n} values",
            weights.len()
        )));
    }
    if values.windows(2).any(|pair| pair[0] > pair[1]) {
        return Err(GlyphtoolsError::InvalidBinRequest(
            "values must be sorted ascending".into(),
        ));
    }

    let sums = PrefixSums::new(values, weights);

    // cost[m][i]: best cost of values[0..=i] in m + 1 clusters
    // start[m][i]: where the last of those clusters begins
    let mut cost = vec![vec![f64::INFINITY; n]; k];
    let mut start = vec![vec![0usize; n]; k];
    for i in 0..n {
        cost[0][i] = sums.ssq(0, i);
    }

    for m in 1..k {
        let (done, rest) = cost.split_at_mut(m);
        let prev = &done[m - 1];
        let row = &mut rest[0];
        fill_row(&sums, prev, row, &mut start[m], m, m, n - 1, m, n - 1);
    }

    let mut clusters = Vec::with_capacity(k);
    let mut end = n;
    for m in (0..k).rev() {
        let begin = if m == 0 { 0 } else { start[m][end - 1] };
        clusters.push(begin..end);
        end = begin;
    }
    clusters.reverse();
    Ok(clusters)
}

/// Fill `row[lo..=hi]` knowing the optimal starts lie in `opt_lo..=opt_hi`.
#[allow(clippy::too_many_arguments)]
fn fill_row(
    sums: &PrefixSums,
    prev: &[f64],
    row: &mut [f64],
    start: &mut [usize],
    m: usize,
    lo: usize,
    hi: usize,
    opt_lo: usize,
    opt_hi: usize,
) {
    if lo > hi {
        return;
    }
    let mid = lo + (hi - lo) / 2;

    let mut best = f64::INFINITY;
    let mut best_j = opt_lo.max(m);
    for j in opt_lo.max(m)..=opt_hi.min(mid) {
        let candidate = prev[j - 1] + sums.ssq(j, mid);
        if candidate < best {
            best = candidate;
            best_j = j;
        }
    }
    row[mid] = best;
    start[mid] = best_j;

    if mid > lo {
        fill_row(sums, prev, row, start, m, lo, mid - 1, opt_lo, best_j);
    }
    fill_row(sums, prev, row, start, m, mid + 1, hi, best_j, opt_hi);
}

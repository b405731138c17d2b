//! Reduction of a measurement series into summary statistics.

use serde::{Deserialize, Serialize};

use crate::{BenchError, BenchResult};

/// Summary of one numeric sample series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub sum: f64,
}

impl StatSummary {
    /// Reduce `samples` into a summary. The slice is left untouched; every
    /// statistic is taken over a sorted copy, so the result does not depend on
    /// sample order.
    ///
    /// An empty series is an error rather than a zeroed summary: a benchmark
    /// without regexes is a configuration mistake.
    pub fn from_samples(samples: &[f64]) -> BenchResult<Self> {
        if samples.is_empty() {
            return Err(BenchError::EmptySeries);
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let sum = compensated_sum(&sorted);
        let mean = sum / sorted.len() as f64;
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let [p25, p50, p75] = quartiles(&sorted);

        Ok(StatSummary {
            mean,
            min,
            max,
            p25,
            p50,
            p75,
            sum,
        })
    }

    /// Values in report column order: avg, min, max, p25, p50, p75, sum.
    pub fn columns(&self) -> [f64; 7] {
        [
            self.mean, self.min, self.max, self.p25, self.p50, self.p75, self.sum,
        ]
    }
}

/// Neumaier summation.
fn compensated_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut carry = 0.0_f64;
    for &v in values {
        let t = sum + v;
        if sum.abs() >= v.abs() {
            carry += (sum - t) + v;
        } else {
            carry += (v - t) + sum;
        }
        sum = t;
    }
    sum + carry
}

/// Three cut points splitting sorted data into four groups, using the
/// exclusive method: positions are taken over `n + 1` and linearly
/// interpolated between neighbours, extrapolating at the edges for small `n`.
///
/// `sorted` must be non-empty and ascending.
pub fn quartiles(sorted: &[f64]) -> [f64; 3] {
    const N: i64 = 4;
    let len = sorted.len();
    if len == 1 {
        return [sorted[0]; 3];
    }

    let ld = len as i64;
    let m = ld + 1;
    let mut out = [0.0; 3];
    for (slot, i) in out.iter_mut().zip(1..N) {
        let j = (i * m / N).clamp(1, ld - 1);
        let delta = i * m - j * N;
        let lo = sorted[(j - 1) as usize];
        let hi = sorted[j as usize];
        *slot = (lo * (N - delta) as f64 + hi * delta as f64) / N as f64;
    }
    out
}

//! Empirical histograms.
//!
//! - [`CountHistogram`] tabulates integer outcomes (clip lengths, Galton
//!   slots, failure rounds) into an ordered outcome → count map.
//! - [`BinnedHistogram`] sorts real-valued observations (sample means)
//!   into equal-width bins.
//!
//! Both are built once and then only read.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::stats::WelfordAccumulator;

// ============================================================================
// Count histogram
// ============================================================================

/// Frequency table over non-negative integer outcomes, ordered by outcome.
///
/// # Examples
/// ```
/// use u_montecarlo::histogram::CountHistogram;
///
/// let h = CountHistogram::from_values([1, 1, 2, 5]);
/// assert_eq!(h.total(), 4);
/// assert_eq!(h.support(), vec![1, 2, 5]);
/// assert_eq!(h.frequencies(), vec![0.5, 0.25, 0.25]);
/// assert_eq!(h.to_dense(6), vec![0, 2, 1, 0, 0, 1]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountHistogram {
    counts: BTreeMap<u64, u64>,
}

impl CountHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tabulates every value of `values`.
    pub fn from_values<I: IntoIterator<Item = u64>>(values: I) -> Self {
        let mut histogram = Self::new();
        for value in values {
            histogram.record(value);
        }
        histogram
    }

    /// Adds one observation of `value`.
    pub fn record(&mut self, value: u64) {
        self.record_n(value, 1);
    }

    /// Adds `n` observations of `value`. Recording zero observations leaves
    /// the support unchanged.
    pub fn record_n(&mut self, value: u64, n: u64) {
        if n > 0 {
            *self.counts.entry(value).or_insert(0) += n;
        }
    }

    /// Total number of observations.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Count observed for `value` (zero if never observed).
    pub fn count(&self, value: u64) -> u64 {
        self.counts.get(&value).copied().unwrap_or(0)
    }

    /// Observed outcomes in ascending order.
    pub fn support(&self) -> Vec<u64> {
        self.counts.keys().copied().collect()
    }

    /// `(outcome, count)` pairs in ascending outcome order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.counts.iter().map(|(&v, &c)| (v, c))
    }

    /// Smallest observed outcome.
    pub fn min(&self) -> Option<u64> {
        self.counts.keys().next().copied()
    }

    /// Largest observed outcome.
    pub fn max(&self) -> Option<u64> {
        self.counts.keys().next_back().copied()
    }

    /// Normalised probability vector over [`support`](Self::support).
    ///
    /// Empty when nothing has been recorded.
    pub fn frequencies(&self) -> Vec<f64> {
        let total = self.total() as f64;
        self.counts.values().map(|&c| c as f64 / total).collect()
    }

    /// Dense count vector of length `len`, indexed by outcome.
    ///
    /// Outcomes at or beyond `len` are not represented.
    pub fn to_dense(&self, len: usize) -> Vec<u64> {
        let mut dense = vec![0; len];
        for (value, count) in self.iter() {
            if let Some(slot) = usize::try_from(value).ok().and_then(|i| dense.get_mut(i)) {
                *slot = count;
            }
        }
        dense
    }

    /// Mean and population variance of the recorded outcomes.
    ///
    /// Returns `None` if the histogram is empty.
    pub fn mean_variance(&self) -> Option<(f64, f64)> {
        let mut acc = WelfordAccumulator::new();
        for (value, count) in self.iter() {
            acc.update_weighted(value as f64, count);
        }
        Some((acc.mean()?, acc.population_variance()?))
    }
}

impl FromIterator<u64> for CountHistogram {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}

// ============================================================================
// Binned histogram
// ============================================================================

/// Equal-width histogram of real-valued observations over `[lo, hi]`.
///
/// Bin `i` covers `[lo + i·w, lo + (i+1)·w)`; the last bin also includes
/// `hi`. When every observation is equal the range is widened to
/// `[x − ½, x + ½]` so that the bins have positive width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinnedHistogram {
    lo: f64,
    hi: f64,
    counts: Vec<u64>,
}

impl BinnedHistogram {
    /// Bins `values` into `num_bins` equal-width bins spanning their range.
    ///
    /// # Returns
    /// - `None` if `values` is empty, `num_bins == 0`, or any value is
    ///   NaN/Inf.
    ///
    /// # Examples
    /// ```
    /// use u_montecarlo::histogram::BinnedHistogram;
    /// let h = BinnedHistogram::from_values(&[0.0, 0.1, 0.9, 1.0], 2).unwrap();
    /// assert_eq!(h.counts(), &[2, 2]);
    /// assert_eq!(h.bin_width(), 0.5);
    /// ```
    pub fn from_values(values: &[f64], num_bins: usize) -> Option<Self> {
        if values.is_empty() || num_bins == 0 || !values.iter().all(|x| x.is_finite()) {
            return None;
        }
        let (mut lo, mut hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            });
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / num_bins as f64;
        let mut counts = vec![0; num_bins];
        for &x in values {
            let index = (((x - lo) / width) as usize).min(num_bins - 1);
            counts[index] += 1;
        }
        Some(Self { lo, hi, counts })
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn num_bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_width(&self) -> f64 {
        (self.hi - self.lo) / self.counts.len() as f64
    }

    /// Lower and upper bound of the binned range.
    pub fn range(&self) -> (f64, f64) {
        (self.lo, self.hi)
    }

    /// Midpoint of bin `index`.
    pub fn bin_center(&self, index: usize) -> f64 {
        self.lo + (index as f64 + 0.5) * self.bin_width()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(bin center, count)` pairs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| (self.bin_center(i), c))
    }
}

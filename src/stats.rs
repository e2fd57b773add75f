//! Descriptive statistics and divergence measures.
//!
//! All functions in this module handle edge cases explicitly and use
//! numerically stable algorithms to avoid catastrophic cancellation.
//!
//! # Algorithms
//!
//! - **Mean**: Neumaier-compensated summation for O(ε) error independent of n.
//! - **Variance/StdDev**: Welford's online algorithm.
//!   Reference: Welford (1962), "Note on a Method for Calculating
//!   Corrected Sums of Squares and Products", *Technometrics* 4(3).
//! - **KL divergence**: sum of [`special::rel_entr`] terms, with the
//!   empirical distribution as the reference.

use crate::special;

/// Computes the arithmetic mean using compensated summation.
///
/// # Returns
/// - `None` if `data` is empty or contains any NaN/Inf.
///
/// # Examples
/// ```
/// use u_montecarlo::stats::mean;
/// let v = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert!((mean(&v).unwrap() - 3.0).abs() < 1e-15);
/// ```
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    if !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    Some(kahan_sum(data) / data.len() as f64)
}

/// Computes the population standard deviation (denominator `n`).
///
/// # Returns
/// - `None` if `data` is empty or contains NaN/Inf.
///
/// # Examples
/// ```
/// use u_montecarlo::stats::population_std_dev;
/// let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((population_std_dev(&v).unwrap() - 2.0).abs() < 1e-10);
/// ```
pub fn population_std_dev(data: &[f64]) -> Option<f64> {
    if data.is_empty() || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    let mut acc = WelfordAccumulator::new();
    for &x in data {
        acc.update(x);
    }
    acc.population_std_dev()
}

/// Neumaier's improved Kahan summation.
///
/// Extends classic Kahan summation to also handle the case where the
/// addend is larger in magnitude than the running sum.
///
/// Reference: Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren
/// zur Summation endlicher Summen", *Zeitschrift für Angewandte
/// Mathematik und Mechanik* 54(1), pp. 39–51.
///
/// # Complexity
/// Time: O(n), Space: O(1)
pub fn kahan_sum(data: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for &x in data {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

/// Kullback–Leibler divergence D(p ‖ q) = Σ p·ln(p/q).
///
/// `p` is the reference (empirical) distribution, `q` the candidate model;
/// the two slices are evaluated pairwise over a shared support. Terms
/// follow [`special::rel_entr`]: zero empirical mass contributes nothing,
/// and empirical mass where `q` is zero makes the divergence `+∞`.
///
/// # Returns
/// - `None` if the slices differ in length.
///
/// # Examples
/// ```
/// use u_montecarlo::stats::kl_divergence;
/// let p = [0.5, 0.5];
/// assert_eq!(kl_divergence(&p, &p), Some(0.0));
/// assert_eq!(kl_divergence(&p, &[1.0, 0.0]), Some(f64::INFINITY));
/// ```
pub fn kl_divergence(p: &[f64], q: &[f64]) -> Option<f64> {
    if p.len() != q.len() {
        return None;
    }
    Some(
        p.iter()
            .zip(q)
            .map(|(&pi, &qi)| special::rel_entr(pi, qi))
            .sum(),
    )
}

// ---------------------------------------------------------------------------
// Welford online accumulator
// ---------------------------------------------------------------------------

/// Streaming accumulator for mean and variance.
///
/// Computes running descriptive statistics in a single pass with O(1)
/// memory, so sample means can be summarised while they are generated.
///
/// Reference: Welford (1962), *Technometrics* 4(3), pp. 419–420.
///
/// # Examples
/// ```
/// use u_montecarlo::stats::WelfordAccumulator;
/// let mut acc = WelfordAccumulator::new();
/// for &x in &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     acc.update(x);
/// }
/// assert!((acc.mean().unwrap() - 5.0).abs() < 1e-15);
/// assert!((acc.sample_variance().unwrap() - 4.571428571428571).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct WelfordAccumulator {
    count: u64,
    mean_acc: f64,
    m2: f64,
}

impl WelfordAccumulator {
    /// Creates a new empty accumulator.
    pub fn new() -> Self {
        Self {
            count: 0,
            mean_acc: 0.0,
            m2: 0.0,
        }
    }

    /// Feeds a new sample into the accumulator.
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean_acc;
        self.mean_acc += delta / self.count as f64;
        self.m2 += delta * (value - self.mean_acc);
    }

    /// Feeds `weight` copies of `value`; used to summarise count histograms
    /// without expanding them.
    pub fn update_weighted(&mut self, value: f64, weight: u64) {
        if weight == 0 {
            return;
        }
        let total = self.count + weight;
        let delta = value - self.mean_acc;
        let share = weight as f64 / total as f64;
        self.m2 += delta * delta * self.count as f64 * share;
        self.mean_acc += delta * share;
        self.count = total;
    }

    /// Returns the number of samples seen so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the running mean, or `None` if no samples have been added.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.mean_acc)
        }
    }

    /// Returns the sample variance (n − 1 denominator), or `None` if fewer
    /// than 2 samples have been added.
    pub fn sample_variance(&self) -> Option<f64> {
        if self.count < 2 {
            None
        } else {
            Some(self.m2 / (self.count - 1) as f64)
        }
    }

    /// Returns the population variance (n denominator), or `None` if no
    /// samples have been added.
    pub fn population_variance(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.m2 / self.count as f64)
        }
    }

    /// Returns the sample standard deviation, or `None` if fewer than 2
    /// samples have been added.
    pub fn sample_std_dev(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }

    /// Returns the population standard deviation, or `None` if no samples
    /// have been added.
    pub fn population_std_dev(&self) -> Option<f64> {
        self.population_variance().map(f64::sqrt)
    }
}

impl Default for WelfordAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- mean ---

    #[test]
    fn test_mean_basic() {
        assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
    }

    #[test]
    fn test_mean_empty_or_non_finite() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, f64::NAN]), None);
        assert_eq!(mean(&[1.0, f64::INFINITY]), None);
    }

    #[test]
    fn test_kahan_sum_cancellation() {
        // Naive summation loses the small terms entirely.
        let data = [1e16, 1.0, -1e16, 1.0];
        assert_eq!(kahan_sum(&data), 2.0);
    }

    // --- population_std_dev ---

    #[test]
    fn test_population_std_dev_single() {
        assert_eq!(population_std_dev(&[3.5]), Some(0.0));
        assert_eq!(population_std_dev(&[]), None);
    }

    // --- kl_divergence ---

    #[test]
    fn test_kl_divergence_known_value() {
        let p = [0.5, 0.5];
        let q = [0.25, 0.75];
        let expected = 0.5 * (2.0_f64).ln() + 0.5 * (0.5_f64 / 0.75).ln();
        assert!((kl_divergence(&p, &q).unwrap() - expected).abs() < 1e-15);
    }

    #[test]
    fn test_kl_divergence_is_asymmetric() {
        let p = [0.9, 0.1];
        let q = [0.5, 0.5];
        let forward = kl_divergence(&p, &q).unwrap();
        let backward = kl_divergence(&q, &p).unwrap();
        assert!((forward - backward).abs() > 1e-3);
    }

    #[test]
    fn test_kl_divergence_support_mismatch() {
        assert_eq!(kl_divergence(&[0.0, 1.0], &[0.5, 0.5]), Some(2.0_f64.ln()));
        assert_eq!(kl_divergence(&[0.5, 0.5], &[0.0, 1.0]), Some(f64::INFINITY));
        assert_eq!(kl_divergence(&[1.0], &[0.5, 0.5]), None);
    }

    // --- WelfordAccumulator ---

    #[test]
    fn test_welford_empty() {
        let acc = WelfordAccumulator::new();
        assert_eq!(acc.count(), 0);
        assert_eq!(acc.mean(), None);
        assert_eq!(acc.sample_variance(), None);
        assert_eq!(acc.population_variance(), None);
    }

    #[test]
    fn test_welford_population_variance() {
        let mut acc = WelfordAccumulator::default();
        for &x in &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            acc.update(x);
        }
        assert!((acc.population_variance().unwrap() - 4.0).abs() < 1e-12);
        assert!((acc.population_std_dev().unwrap() - 2.0).abs() < 1e-12);
        assert!((acc.sample_std_dev().unwrap() - 4.571428571428571_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_welford_weighted_matches_expanded() {
        let mut weighted = WelfordAccumulator::new();
        weighted.update_weighted(0.0, 1);
        weighted.update_weighted(1.0, 2);
        weighted.update_weighted(2.0, 1);
        weighted.update_weighted(7.0, 0);

        let mut expanded = WelfordAccumulator::new();
        for &x in &[0.0, 1.0, 1.0, 2.0] {
            expanded.update(x);
        }
        assert_eq!(weighted.count(), 4);
        assert!((weighted.mean().unwrap() - 1.0).abs() < 1e-12);
        assert!(
            (weighted.population_variance().unwrap() - expanded.population_variance().unwrap())
                .abs()
                < 1e-12
        );
        assert!((weighted.population_variance().unwrap() - 0.5).abs() < 1e-12);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn probability_vector(len: usize) -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec(0.01_f64..1.0, len).prop_map(|w| {
            let total: f64 = w.iter().sum();
            w.into_iter().map(|x| x / total).collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn kl_divergence_non_negative(
            (p, q) in (1_usize..20).prop_flat_map(|n| (probability_vector(n), probability_vector(n)))
        ) {
            let d = kl_divergence(&p, &q).unwrap();
            prop_assert!(d >= -1e-12, "Gibbs' inequality violated: {d}");
        }

        #[test]
        fn kl_divergence_of_self_is_zero(p in (1_usize..20).prop_flat_map(probability_vector)) {
            let d = kl_divergence(&p, &p).unwrap();
            prop_assert!(d.abs() < 1e-15);
        }

        #[test]
        fn weighted_update_matches_repeated_update(
            items in proptest::collection::vec((-100.0_f64..100.0, 0_u64..20), 1..30)
        ) {
            let mut weighted = WelfordAccumulator::new();
            let mut repeated = WelfordAccumulator::new();
            for &(value, weight) in &items {
                weighted.update_weighted(value, weight);
                for _ in 0..weight {
                    repeated.update(value);
                }
            }
            prop_assert_eq!(weighted.count(), repeated.count());
            if let (Some(a), Some(b)) = (weighted.population_variance(), repeated.population_variance()) {
                prop_assert!((a - b).abs() < 1e-7 * b.max(1.0), "{a} vs {b}");
            }
        }
    }
}

//! Probability distributions.
//!
//! Theoretical counterparts of the simulated experiments, with analytical
//! moments and PMF/PDF evaluation. Every empirical histogram produced by
//! [`crate::simulation`] is compared against one of these.
//!
//! # Supported Distributions
//!
//! | Distribution | Parameters | Mean | Variance |
//! |---|---|---|---|
//! | [`Uniform`] | min, max | (a+b)/2 | (b−a)²/12 |
//! | [`Normal`] | μ, σ | μ | σ² |
//! | [`Exponential`] | scale θ | θ | θ² |
//! | [`Geometric`] | p | (1−p)/p | (1−p)/p² |
//! | [`Binomial`] | n, p | np | np(1−p) |
//! | [`Zipf`] | a | ζ(a−1)/ζ(a) | see docs |
//!
//! # Design Notes
//!
//! Parameters are plain `f64`/`u64` values validated at construction time;
//! evaluation methods never fail.

use serde::Serialize;
use thiserror::Error;

use crate::special;

/// Error type for invalid distribution parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    /// Parameters violate distribution constraints.
    #[error("invalid distribution parameters: {0}")]
    InvalidParameters(String),
}

// ============================================================================
// Uniform Distribution
// ============================================================================

/// Continuous uniform distribution on `[min, max]`.
///
/// # Mathematical Definition
/// - PDF: f(x) = 1/(max−min) for x ∈ [min, max]
/// - Mean: (min+max)/2
/// - Variance: (max−min)²/12
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Uniform {
    min: f64,
    max: f64,
}

impl Uniform {
    /// Creates a new uniform distribution on `[min, max]`.
    ///
    /// # Errors
    /// Returns `Err` if `min >= max` or either parameter is not finite.
    pub fn new(min: f64, max: f64) -> Result<Self, DistributionError> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(DistributionError::InvalidParameters(format!(
                "Uniform requires min < max, got min={min}, max={max}"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn mean(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn variance(&self) -> f64 {
        let range = self.max - self.min;
        range * range / 12.0
    }

    /// PDF: f(x) = 1/(max−min) for x ∈ [min, max], 0 otherwise.
    pub fn pdf(&self, x: f64) -> f64 {
        if x >= self.min && x <= self.max {
            1.0 / (self.max - self.min)
        } else {
            0.0
        }
    }
}

// ============================================================================
// Normal Distribution
// ============================================================================

/// Normal (Gaussian) distribution N(μ, σ²).
///
/// Used as the Central Limit Theorem approximation of a sample-mean
/// distribution: for a population with mean μ and variance σ², the mean of
/// `m` draws is approximately N(μ, σ²/m).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Normal {
    mu: f64,
    sigma: f64,
}

impl Normal {
    /// Creates a new normal distribution.
    ///
    /// # Errors
    /// Returns `Err` if `sigma <= 0` or parameters are not finite.
    pub fn new(mu: f64, sigma: f64) -> Result<Self, DistributionError> {
        if !mu.is_finite() || !sigma.is_finite() || sigma <= 0.0 {
            return Err(DistributionError::InvalidParameters(format!(
                "Normal requires finite mu and sigma > 0, got mu={mu}, sigma={sigma}"
            )));
        }
        Ok(Self { mu, sigma })
    }

    /// The CLT approximation N(μ, σ²/m) of the mean of `m` draws from a
    /// population with the given mean and variance.
    ///
    /// # Errors
    /// Returns `Err` if `m == 0` or the resulting σ is not positive.
    pub fn sample_mean_approximation(
        population_mean: f64,
        population_variance: f64,
        m: usize,
    ) -> Result<Self, DistributionError> {
        if m == 0 {
            return Err(DistributionError::InvalidParameters(
                "sample size must be at least 1".into(),
            ));
        }
        Self::new(population_mean, (population_variance / m as f64).sqrt())
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn mean(&self) -> f64 {
        self.mu
    }

    pub fn variance(&self) -> f64 {
        self.sigma * self.sigma
    }

    /// PDF: f(x) = φ((x−μ)/σ) / σ
    pub fn pdf(&self, x: f64) -> f64 {
        special::standard_normal_pdf((x - self.mu) / self.sigma) / self.sigma
    }
}

// ============================================================================
// Exponential Distribution
// ============================================================================

/// Exponential distribution with scale θ (rate λ = 1/θ).
///
/// # Mathematical Definition
/// - PDF: f(x) = exp(−x/θ)/θ for x ≥ 0
/// - CDF: F(x) = 1 − exp(−x/θ)
/// - Mean: θ
/// - Variance: θ²
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exponential {
    scale: f64,
}

impl Exponential {
    /// Creates a new exponential distribution with scale `theta`.
    ///
    /// # Errors
    /// Returns `Err` if `theta <= 0` or not finite.
    pub fn new(theta: f64) -> Result<Self, DistributionError> {
        if !theta.is_finite() || theta <= 0.0 {
            return Err(DistributionError::InvalidParameters(format!(
                "Exponential requires a finite scale > 0, got theta={theta}"
            )));
        }
        Ok(Self { scale: theta })
    }

    /// Continuous approximation of the survival game with per-round failure
    /// probability `p`.
    ///
    /// The scale is `θ = round(1/p + 0.5)`, with halves rounded to even.
    ///
    /// # Errors
    /// Returns `Err` unless `0 < p <= 1`.
    ///
    /// # Examples
    /// ```
    /// use u_montecarlo::distributions::Exponential;
    /// assert_eq!(Exponential::from_failure_probability(0.001).unwrap().scale(), 1000.0);
    /// // 1/0.5 + 0.5 = 2.5 rounds down to the even neighbour
    /// assert_eq!(Exponential::from_failure_probability(0.5).unwrap().scale(), 2.0);
    /// ```
    pub fn from_failure_probability(p: f64) -> Result<Self, DistributionError> {
        if !(p > 0.0 && p <= 1.0) {
            return Err(DistributionError::InvalidParameters(format!(
                "failure probability must be in (0, 1], got p={p}"
            )));
        }
        Self::new((1.0 / p + 0.5).round_ties_even())
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn rate(&self) -> f64 {
        1.0 / self.scale
    }

    pub fn mean(&self) -> f64 {
        self.scale
    }

    pub fn variance(&self) -> f64 {
        self.scale * self.scale
    }

    pub fn pdf(&self, x: f64) -> f64 {
        if x < 0.0 {
            0.0
        } else {
            (-x / self.scale).exp() / self.scale
        }
    }

    pub fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else {
            -(-x / self.scale).exp_m1()
        }
    }
}

// ============================================================================
// Geometric Distribution
// ============================================================================

/// Number of survived rounds before the first failure, each round failing
/// independently with probability `p`.
///
/// - PMF: P(N = n) = (1−p)ⁿ·p, n = 0, 1, 2, …
/// - Survival: P(N ≥ n) = (1−p)ⁿ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geometric {
    p: f64,
}

impl Geometric {
    /// # Errors
    /// Returns `Err` unless `0 < p <= 1`.
    pub fn new(p: f64) -> Result<Self, DistributionError> {
        if !(p > 0.0 && p <= 1.0) {
            return Err(DistributionError::InvalidParameters(format!(
                "Geometric requires p in (0, 1], got p={p}"
            )));
        }
        Ok(Self { p })
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn mean(&self) -> f64 {
        (1.0 - self.p) / self.p
    }

    pub fn variance(&self) -> f64 {
        (1.0 - self.p) / (self.p * self.p)
    }

    /// Probability of failing in round `n` after surviving `n` rounds.
    pub fn pmf(&self, n: u64) -> f64 {
        self.survival(n) * self.p
    }

    /// Probability of surviving the first `n` rounds.
    pub fn survival(&self, n: u64) -> f64 {
        if n == 0 {
            return 1.0;
        }
        (1.0 - self.p).powf(n as f64)
    }
}

// ============================================================================
// Binomial Distribution
// ============================================================================

/// Binomial distribution B(n, p): number of successes in `n` trials.
///
/// A Galton board with `n` layers of pins and fair deflection is B(n, ½).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binomial {
    n: u64,
    p: f64,
}

impl Binomial {
    /// # Errors
    /// Returns `Err` if `p` is outside `[0, 1]`.
    pub fn new(n: u64, p: f64) -> Result<Self, DistributionError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(DistributionError::InvalidParameters(format!(
                "Binomial requires p in [0, 1], got p={p}"
            )));
        }
        Ok(Self { n, p })
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn mean(&self) -> f64 {
        self.n as f64 * self.p
    }

    pub fn variance(&self) -> f64 {
        self.n as f64 * self.p * (1.0 - self.p)
    }

    /// PMF: C(n, k)·pᵏ·(1−p)ⁿ⁻ᵏ, evaluated in log space.
    pub fn pmf(&self, k: u64) -> f64 {
        if k > self.n {
            return 0.0;
        }
        // Degenerate endpoints would produce 0·ln 0 in log space.
        if self.p == 0.0 {
            return if k == 0 { 1.0 } else { 0.0 };
        }
        if self.p == 1.0 {
            return if k == self.n { 1.0 } else { 0.0 };
        }
        let k_f = k as f64;
        let rest = (self.n - k) as f64;
        (special::ln_choose(self.n, k) + k_f * self.p.ln() + rest * (1.0 - self.p).ln()).exp()
    }
}

// ============================================================================
// Zipf Distribution
// ============================================================================

/// Zipf (zeta) distribution over the positive integers with shape `a > 1`.
///
/// # Mathematical Definition
/// - PMF: P(K = k) = k^(−a) / ζ(a), k = 1, 2, …
/// - Mean: ζ(a−1)/ζ(a) for a > 2, infinite otherwise
///
/// The normalising constant ζ(a) is computed once at construction.
///
/// # Examples
/// ```
/// use u_montecarlo::distributions::Zipf;
/// let z = Zipf::new(2.0).unwrap();
/// let pi = std::f64::consts::PI;
/// assert!((z.pmf(1) - 6.0 / (pi * pi)).abs() < 1e-12);
/// assert_eq!(z.pmf(0), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Zipf {
    a: f64,
    #[serde(skip)]
    normalizer: f64,
}

impl Zipf {
    /// # Errors
    /// Returns `Err` if `a <= 1` or not finite.
    pub fn new(a: f64) -> Result<Self, DistributionError> {
        if !a.is_finite() || a <= 1.0 {
            return Err(DistributionError::InvalidParameters(format!(
                "Zipf requires a finite shape a > 1, got a={a}"
            )));
        }
        Ok(Self {
            a,
            normalizer: special::zeta(a),
        })
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    /// Returns `None` when the mean is infinite (`a <= 2`).
    pub fn mean(&self) -> Option<f64> {
        if self.a <= 2.0 {
            None
        } else {
            Some(special::zeta(self.a - 1.0) / self.normalizer)
        }
    }

    /// PMF at rank `k`; zero outside the support `k >= 1`.
    pub fn pmf(&self, k: u64) -> f64 {
        if k == 0 {
            return 0.0;
        }
        (k as f64).powf(-self.a) / self.normalizer
    }
}

// ============================================================================
// Tests
// ============================================================================

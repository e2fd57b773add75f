//! Central limit theorem demonstration.
//!
//! For each sample size `m`, draw `m` values from a population, record
//! their mean, repeat `num_trials` times, and histogram the means. The
//! histogram narrows as `m` grows and its shape approaches
//! `N(μ, σ²/m)` whatever the population looks like.

use rand::distr::{Distribution, Uniform as UniformSampler};
use rand::Rng;
use rand_distr::Exp;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::CltConfig;
use crate::distributions::{Exponential, Normal, Uniform};
use crate::error::{Result, SimulationError};
use crate::histogram::BinnedHistogram;
use crate::render::{Figure, Series};
use crate::stats::{self, WelfordAccumulator};

/// Population the samples are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Population {
    /// Continuous uniform on `[min, max)`.
    Uniform { min: f64, max: f64 },
    /// Exponential with the given scale (mean).
    Exponential { scale: f64 },
}

impl Population {
    /// `Uniform(-1, 1)`.
    pub const STANDARD_UNIFORM: Population = Population::Uniform {
        min: -1.0,
        max: 1.0,
    };

    /// `Exponential(scale = 1)`.
    pub const STANDARD_EXPONENTIAL: Population = Population::Exponential { scale: 1.0 };

    /// Population mean and variance.
    ///
    /// # Errors
    /// Returns `Err` if the parameters do not describe a valid distribution.
    pub fn moments(&self) -> Result<(f64, f64)> {
        match *self {
            Population::Uniform { min, max } => {
                let d = Uniform::new(min, max)?;
                Ok((d.mean(), d.variance()))
            }
            Population::Exponential { scale } => {
                let d = Exponential::new(scale)?;
                Ok((d.mean(), d.variance()))
            }
        }
    }

    fn sampler(&self) -> Result<Sampler> {
        match *self {
            Population::Uniform { min, max } => {
                Uniform::new(min, max)?;
                UniformSampler::new(min, max)
                    .map(Sampler::Uniform)
                    .map_err(|e| SimulationError::invalid("population", e.to_string()))
            }
            Population::Exponential { scale } => {
                let rate = Exponential::new(scale)?.rate();
                Exp::new(rate)
                    .map(Sampler::Exponential)
                    .map_err(|e| SimulationError::invalid("population", e.to_string()))
            }
        }
    }

    /// Short human-readable name.
    pub fn label(&self) -> String {
        match *self {
            Population::Uniform { min, max } => format!("uniform({min}, {max})"),
            Population::Exponential { scale } => format!("exponential(scale = {scale})"),
        }
    }
}

enum Sampler {
    Uniform(UniformSampler<f64>),
    Exponential(Exp<f64>),
}

impl Distribution<f64> for Sampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Sampler::Uniform(d) => d.sample(rng),
            Sampler::Exponential(d) => d.sample(rng),
        }
    }
}

/// Histogram of `num_trials` sample means for one sample size.
#[derive(Debug, Clone, Serialize)]
pub struct SampleMeanHistogram {
    pub population: Population,
    pub sample_size: usize,
    pub num_trials: usize,
    /// Raw sample means, in trial order.
    #[serde(skip)]
    pub means: Vec<f64>,
    pub histogram: BinnedHistogram,
    pub observed_mean: f64,
    pub observed_std_dev: f64,
    /// `N(μ, σ²/m)` predicted for the sample mean.
    pub approximation: Normal,
}

/// Histograms the means of `num_trials` samples of size `sample_size`.
///
/// # Errors
/// Returns `Err` if `sample_size`, `num_trials` or `num_bins` is zero, or
/// the population parameters are invalid.
///
/// # Examples
/// ```
/// use u_montecarlo::random::create_rng;
/// use u_montecarlo::simulation::clt::{simulate_clt, Population};
///
/// let mut rng = create_rng(11);
/// let h = simulate_clt(Population::STANDARD_UNIFORM, 5, 2000, 40, &mut rng).unwrap();
/// assert_eq!(h.histogram.total(), 2000);
/// assert!(h.observed_mean.abs() < 0.05);
/// ```
pub fn simulate_clt<R: Rng + ?Sized>(
    population: Population,
    sample_size: usize,
    num_trials: usize,
    num_bins: usize,
    rng: &mut R,
) -> Result<SampleMeanHistogram> {
    if sample_size == 0 {
        return Err(SimulationError::invalid("sample_size", "must be at least 1"));
    }
    if num_trials == 0 {
        return Err(SimulationError::invalid("num_trials", "must be at least 1"));
    }
    if num_bins == 0 {
        return Err(SimulationError::invalid("num_bins", "must be at least 1"));
    }

    let sampler = population.sampler()?;
    let (mu, variance) = population.moments()?;
    let approximation = Normal::sample_mean_approximation(mu, variance, sample_size)?;

    let mut sample = vec![0.0; sample_size];
    let mut acc = WelfordAccumulator::new();
    let mut means = Vec::with_capacity(num_trials);
    for _ in 0..num_trials {
        for x in sample.iter_mut() {
            *x = sampler.sample(rng);
        }
        let mean = stats::kahan_sum(&sample) / sample_size as f64;
        acc.update(mean);
        means.push(mean);
    }

    let histogram = BinnedHistogram::from_values(&means, num_bins).ok_or_else(|| {
        SimulationError::invalid("population", "sample means are not finite")
    })?;
    let observed_mean = acc.mean().unwrap_or(f64::NAN);
    let observed_std_dev = acc.population_std_dev().unwrap_or(f64::NAN);

    debug!(
        population = %population.label(),
        sample_size,
        observed_mean,
        observed_std_dev,
        predicted_std_dev = approximation.sigma(),
        "sample means collected"
    );

    Ok(SampleMeanHistogram {
        population,
        sample_size,
        num_trials,
        means,
        histogram,
        observed_mean,
        observed_std_dev,
        approximation,
    })
}

/// Runs every configured sample size for the uniform and exponential
/// populations, uniform first, each in ascending configured order.
///
/// # Errors
/// Returns the first failure; nothing is returned for earlier sizes.
pub fn run_clt_suite<R: Rng + ?Sized>(
    config: &CltConfig,
    rng: &mut R,
) -> Result<Vec<SampleMeanHistogram>> {
    let runs = config
        .uniform_sample_sizes
        .iter()
        .map(|&m| (Population::STANDARD_UNIFORM, m))
        .chain(
            config
                .exponential_sample_sizes
                .iter()
                .map(|&m| (Population::STANDARD_EXPONENTIAL, m)),
        );

    let mut results = Vec::new();
    for (population, m) in runs {
        results.push(simulate_clt(
            population,
            m,
            config.num_trials,
            config.num_bins,
            rng,
        )?);
    }
    info!(
        histograms = results.len(),
        trials = config.num_trials,
        "clt suite finished"
    );
    Ok(results)
}

impl SampleMeanHistogram {
    /// Normal density scaled to expected counts per bin, at each bin center.
    pub fn expected_counts(&self) -> Vec<(f64, f64)> {
        let scale = self.num_trials as f64 * self.histogram.bin_width();
        self.histogram
            .iter()
            .map(|(center, _)| (center, scale * self.approximation.pdf(center)))
            .collect()
    }

    pub fn figures(&self) -> Vec<Figure> {
        let observed = self
            .histogram
            .iter()
            .map(|(center, count)| (center, count as f64))
            .collect();
        vec![Figure::new(
            format!(
                "Sample means, m = {}\n{}, trials={}, mean={:.4}, sd={:.4}",
                self.sample_size,
                self.population.label(),
                self.num_trials,
                self.observed_mean,
                self.observed_std_dev
            ),
            Series::new("sample means", observed),
        )
        .with_theoretical(Series::new(
            format!(
                "normal({:.4}, {:.4})",
                self.approximation.mu(),
                self.approximation.sigma()
            ),
            self.expected_counts(),
        ))]
    }
}

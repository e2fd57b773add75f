//! Paper-clip experiment and Zipf best-fit search.
//!
//! Start with `num_rounds × k` single paper clips. Each round, two distinct
//! chains are drawn uniformly at random and joined. After enough rounds
//! the chain lengths follow a Zipf-like power law.
//!
//! The fit is a grid search: for each power in [`CANDIDATE_POWERS`] the
//! shape `a = k^power` is scored by the KL divergence of the empirical
//! length distribution from `Zipf(a)` over the observed support, and the
//! first strictly smallest score wins.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::collections::ClipPool;
use crate::distributions::Zipf;
use crate::error::{Result, SimulationError};
use crate::histogram::CountHistogram;
use crate::render::{Figure, Series};
use crate::stats;

/// Largest initial population [`simulate_zipf`] accepts.
pub const MAX_CLIPS: usize = 1 << 28;

/// Exponents tried by [`fit_zipf`], in evaluation order.
pub const CANDIDATE_POWERS: [f64; 6] = [1.0 / 6.0, 1.0 / 3.0, 1.0 / 2.0, 2.0 / 3.0, 1.0, 3.0 / 2.0];

/// Divergence of one candidate shape from the empirical distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScore {
    pub power: f64,
    pub shape: f64,
    pub divergence: f64,
}

/// Outcome of the grid search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZipfFit {
    /// Winning exponent from [`CANDIDATE_POWERS`].
    pub best_power: f64,
    /// Zipf shape `a = k^best_power`.
    pub shape: f64,
    pub divergence: f64,
    /// Every evaluated candidate, in evaluation order.
    pub candidates: Vec<CandidateScore>,
    /// Set when no candidate scored below `+∞`; the first candidate is then
    /// reported.
    pub fallback: bool,
}

/// Result of one paper-clip experiment.
#[derive(Debug, Clone, Serialize)]
pub struct ZipfExperiment {
    pub num_rounds: usize,
    pub num_clips_k: f64,
    pub num_clips: usize,
    /// Final chain lengths.
    pub lengths: CountHistogram,
    pub fit: ZipfFit,
}

fn validate_k(num_clips_k: f64) -> Result<()> {
    if !num_clips_k.is_finite() || num_clips_k <= 1.0 {
        return Err(SimulationError::invalid(
            "num_clips_k",
            format!("must be a finite ratio > 1, got {num_clips_k}"),
        ));
    }
    Ok(())
}

/// Runs the paper-clip experiment and fits a Zipf shape to the result.
///
/// # Errors
/// - `num_clips_k <= 1` (or not finite): the population would run out of
///   chains to join. Nothing is simulated.
/// - `floor(num_rounds × num_clips_k) <= num_rounds` for `num_rounds > 0`:
///   the last round would have a single chain left.
/// - `floor(num_rounds × num_clips_k) > MAX_CLIPS`.
///
/// # Examples
/// ```
/// use u_montecarlo::random::create_rng;
/// use u_montecarlo::simulation::zipf::simulate_zipf;
///
/// let mut rng = create_rng(1);
/// let exp = simulate_zipf(1000, 1.6, &mut rng).unwrap();
/// assert_eq!(exp.num_clips, 1600);
/// assert_eq!(exp.lengths.total(), 600);
/// assert!(simulate_zipf(1000, 1.0, &mut rng).is_err());
/// ```
pub fn simulate_zipf<R: Rng + ?Sized>(
    num_rounds: usize,
    num_clips_k: f64,
    rng: &mut R,
) -> Result<ZipfExperiment> {
    validate_k(num_clips_k)?;
    let product = (num_rounds as f64 * num_clips_k).floor();
    if product > MAX_CLIPS as f64 {
        return Err(SimulationError::invalid(
            "num_clips_k",
            format!("num_rounds × {num_clips_k} = {product} clips exceeds the limit of {MAX_CLIPS}"),
        ));
    }
    let num_clips = product as usize;
    if num_rounds > 0 && num_clips <= num_rounds {
        return Err(SimulationError::invalid(
            "num_clips_k",
            format!(
                "{num_rounds} rounds need more than {num_rounds} clips, \
                 but num_rounds × {num_clips_k} gives {num_clips}"
            ),
        ));
    }

    let mut pool = ClipPool::new(num_clips);
    for _ in 0..num_rounds {
        if pool.merge_random_pair(rng).is_none() {
            break;
        }
    }
    let lengths = CountHistogram::from_values(pool.into_lengths());
    let fit = fit_zipf(&lengths, num_clips_k)?;

    info!(
        num_clips,
        num_rounds,
        chains = lengths.total(),
        longest = lengths.max().unwrap_or(0),
        best_power = fit.best_power,
        shape = fit.shape,
        divergence = fit.divergence,
        "paper-clip experiment finished"
    );

    Ok(ZipfExperiment {
        num_rounds,
        num_clips_k,
        num_clips,
        lengths,
        fit,
    })
}

/// Grid search for the Zipf shape closest to `histogram` in KL divergence.
///
/// Candidates are evaluated in [`CANDIDATE_POWERS`] order and a candidate
/// replaces the current best only with a strictly smaller divergence, so
/// ties go to the earlier power. The theoretical PMF is evaluated on the
/// observed support only; empirical mass where the model has none scores
/// `+∞`, as does a shape that is not a valid Zipf parameter (`k^power`
/// rounding to 1 or overflowing).
///
/// # Errors
/// Returns `Err` if `num_clips_k <= 1` or is not finite.
pub fn fit_zipf(histogram: &CountHistogram, num_clips_k: f64) -> Result<ZipfFit> {
    validate_k(num_clips_k)?;
    let support = histogram.support();
    let empirical = histogram.frequencies();

    let mut candidates = Vec::with_capacity(CANDIDATE_POWERS.len());
    let mut best: Option<usize> = None;
    let mut best_divergence = f64::INFINITY;

    for (index, &power) in CANDIDATE_POWERS.iter().enumerate() {
        let shape = num_clips_k.powf(power);
        // k^power can round to 1 or overflow; such a shape has no Zipf law.
        let divergence = match Zipf::new(shape) {
            Ok(zipf) => {
                let theoretical: Vec<f64> = support.iter().map(|&k| zipf.pmf(k)).collect();
                stats::kl_divergence(&empirical, &theoretical).unwrap_or(f64::INFINITY)
            }
            Err(_) => f64::INFINITY,
        };

        debug!(
            power,
            shape,
            previous = best_divergence,
            divergence,
            "zipf candidate scored"
        );
        if divergence < best_divergence {
            best_divergence = divergence;
            best = Some(index);
        }
        candidates.push(CandidateScore {
            power,
            shape,
            divergence,
        });
    }

    let fallback = best.is_none();
    if fallback {
        warn!("no zipf candidate has finite divergence; keeping the first candidate");
    }
    let chosen = candidates[best.unwrap_or(0)].clone();
    Ok(ZipfFit {
        best_power: chosen.power,
        shape: chosen.shape,
        divergence: chosen.divergence,
        candidates,
        fallback,
    })
}

impl ZipfExperiment {
    /// Theoretical PMF of the fitted shape over every length from the
    /// shortest to the longest observed chain.
    pub fn theoretical_pmf(&self) -> Vec<(u64, f64)> {
        let (Some(lo), Some(hi)) = (self.lengths.min(), self.lengths.max()) else {
            return Vec::new();
        };
        match Zipf::new(self.fit.shape) {
            Ok(zipf) => (lo..=hi).map(|k| (k, zipf.pmf(k))).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Frequency histogram with the fitted PMF overlaid, then the fitted
    /// PMF alone over the full observed range.
    pub fn figures(&self) -> Vec<Figure> {
        let support = self.lengths.support();
        let observed: Vec<(f64, f64)> = support
            .iter()
            .zip(self.lengths.frequencies())
            .map(|(&k, f)| (k as f64, f))
            .collect();
        let overlay: Vec<(f64, f64)> = match Zipf::new(self.fit.shape) {
            Ok(zipf) => support.iter().map(|&k| (k as f64, zipf.pmf(k))).collect(),
            Err(_) => Vec::new(),
        };

        let histogram = Figure::new(
            format!(
                "Frequency Histogram\nclips={}, rounds={}, k={}",
                self.num_clips, self.num_rounds, self.num_clips_k
            ),
            Series::new("chain length frequency", observed),
        )
        .with_theoretical(Series::new(format!("zipf(a = {:.2})", self.fit.shape), overlay));

        let theory: Vec<(f64, f64)> = self
            .theoretical_pmf()
            .into_iter()
            .map(|(k, p)| (k as f64, p))
            .collect();
        let theoretical = Figure::new(
            format!("Theoretical Distribution\nzipf(alpha = {:.2})", self.fit.shape),
            Series::new("zipf pmf", theory),
        );

        vec![histogram, theoretical]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_invalid_k_fails_fast() {
        let mut rng = create_rng(0);
        for k in [1.0, 0.5, -2.0, f64::NAN, f64::INFINITY] {
            let err = simulate_zipf(100, k, &mut rng).unwrap_err();
            assert!(matches!(
                err,
                SimulationError::InvalidParameter { name: "num_clips_k", .. }
            ));
        }
    }

    #[test]
    fn test_too_few_clips_rejected() {
        let mut rng = create_rng(0);
        // floor(1 × 1.5) = 1 clip for 1 round
        assert!(simulate_zipf(1, 1.5, &mut rng).is_err());
        assert!(simulate_zipf(1, 2.0, &mut rng).is_ok());
    }

    #[test]
    fn test_population_conservation() {
        let mut rng = create_rng(7);
        let exp = simulate_zipf(2_000, 1.8, &mut rng).unwrap();
        let clips = exp.num_clips as u64;
        assert_eq!(clips, 3_600);
        assert_eq!(exp.lengths.total(), clips - 2_000);
        let mass: u64 = exp.lengths.iter().map(|(len, count)| len * count).sum();
        assert_eq!(mass, clips);
    }

    #[test]
    fn test_zero_rounds_leaves_singletons() {
        let mut rng = create_rng(7);
        let exp = simulate_zipf(0, 3.0, &mut rng).unwrap();
        assert_eq!(exp.num_clips, 0);
        assert!(exp.lengths.is_empty());
        assert!(exp.figures()[1].empirical.points.is_empty());
    }

    #[test]
    fn test_same_seed_same_experiment() {
        let a = simulate_zipf(500, 2.0, &mut create_rng(99)).unwrap();
        let b = simulate_zipf(500, 2.0, &mut create_rng(99)).unwrap();
        assert_eq!(a.lengths, b.lengths);
        assert_eq!(a.fit, b.fit);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let histogram = CountHistogram::from_values([1, 1, 1, 1, 1, 2, 2, 3, 5]);
        let first = fit_zipf(&histogram, 1.6).unwrap();
        let second = fit_zipf(&histogram, 1.6).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.candidates.len(), CANDIDATE_POWERS.len());
        assert!(!first.fallback);
    }

    #[test]
    fn test_fit_picks_minimum_divergence() {
        let histogram = CountHistogram::from_values([1, 1, 1, 1, 1, 1, 2, 2, 3, 4]);
        let fit = fit_zipf(&histogram, 2.5).unwrap();
        let min = fit
            .candidates
            .iter()
            .map(|c| c.divergence)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(fit.divergence, min);
        let first_min = fit.candidates.iter().find(|c| c.divergence == min).unwrap();
        assert_eq!(fit.best_power, first_min.power);
        assert!((fit.shape - 2.5_f64.powf(fit.best_power)).abs() < 1e-15);
    }

    #[test]
    fn test_fit_recovers_exact_zipf() {
        // Empirical frequencies proportional to k^(-a) with a = 4^(1/2) = 2
        // on a long support: the a = 2 candidate must win.
        let mut histogram = CountHistogram::new();
        for k in 1..=200_u64 {
            histogram.record_n(k, (1e9 / (k * k) as f64).round() as u64);
        }
        let fit = fit_zipf(&histogram, 4.0).unwrap();
        assert_eq!(fit.best_power, 0.5);
        assert!((fit.shape - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_fit_all_infinite_falls_back_to_first() {
        // A single chain so long that every candidate PMF underflows to 0.
        let histogram = CountHistogram::from_values([u64::MAX]);
        let fit = fit_zipf(&histogram, 1e12).unwrap();
        assert!(fit.fallback);
        assert_eq!(fit.best_power, CANDIDATE_POWERS[0]);
        assert_eq!(fit.divergence, f64::INFINITY);
    }

    #[test]
    fn test_degenerate_shapes_score_infinite() {
        let histogram = CountHistogram::from_values([1, 1, 2]);

        // (1 + ε)^power rounds to exactly 1 for the small powers.
        let fit = fit_zipf(&histogram, 1.0 + f64::EPSILON).unwrap();
        assert_eq!(fit.candidates.len(), CANDIDATE_POWERS.len());
        assert_eq!(fit.candidates[0].shape, 1.0);
        assert_eq!(fit.candidates[0].divergence, f64::INFINITY);
        if fit.fallback {
            assert_eq!(fit.best_power, CANDIDATE_POWERS[0]);
        } else {
            assert!(fit.divergence.is_finite());
            assert!(fit.shape > 1.0);
        }

        // (1e250)^(3/2) overflows to +∞.
        let fit = fit_zipf(&histogram, 1e250).unwrap();
        let last = fit.candidates.last().unwrap();
        assert_eq!(last.shape, f64::INFINITY);
        assert_eq!(last.divergence, f64::INFINITY);
        assert!(fit.candidates.iter().all(|c| c.divergence == f64::INFINITY));
        assert!(fit.fallback);
        assert_eq!(fit.best_power, CANDIDATE_POWERS[0]);
        assert_eq!(fit.divergence, f64::INFINITY);
    }

    #[test]
    fn test_degenerate_shape_with_zero_rounds() {
        let mut rng = create_rng(1);
        let exp = simulate_zipf(0, 1.0 + f64::EPSILON, &mut rng).unwrap();
        assert!(exp.lengths.is_empty());
        assert!(exp.figures().iter().all(|f| f.empirical.points.is_empty()));
    }

    #[test]
    fn test_oversized_population_rejected() {
        let mut rng = create_rng(1);
        let err = simulate_zipf(1, 1e20, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InvalidParameter { name: "num_clips_k", .. }
        ));
        assert!(simulate_zipf(2, (MAX_CLIPS as f64 + 10.0) / 2.0, &mut rng).is_err());
    }

    #[test]
    fn test_figures_cover_contiguous_range() {
        let mut rng = create_rng(5);
        let exp = simulate_zipf(300, 2.0, &mut rng).unwrap();
        let figures = exp.figures();
        assert_eq!(figures.len(), 2);
        let lo = exp.lengths.min().unwrap();
        let hi = exp.lengths.max().unwrap();
        assert_eq!(figures[1].empirical.points.len() as u64, hi - lo + 1);
        assert_eq!(
            figures[0].empirical.points.len(),
            exp.lengths.support().len()
        );
        assert!(figures[0].title.contains("clips=600, rounds=300, k=2"));
    }
}

//! Galton board.
//!
//! A ball falls through `L` layers of pegs, bouncing left or right with
//! equal probability at each one; its slot is the number of right bounces.
//! Slot counts over many balls approach `N · Binomial(L, ½)`.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::distributions::Binomial;
use crate::error::Result;
use crate::histogram::CountHistogram;
use crate::random::coin_flip;
use crate::render::{Figure, Series};

/// How slot counts are accumulated.
///
/// Both variants consume the random source identically and produce the
/// same counts for the same draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GaltonVariant {
    /// Increment a dense slot array per ball.
    #[default]
    Direct,
    /// Record every ball's bounce path, then tabulate final positions.
    Tabulated,
}

impl fmt::Display for GaltonVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GaltonVariant::Direct => write!(f, "direct"),
            GaltonVariant::Tabulated => write!(f, "tabulated"),
        }
    }
}

impl FromStr for GaltonVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" => Ok(GaltonVariant::Direct),
            "tabulated" => Ok(GaltonVariant::Tabulated),
            other => Err(format!(
                "unknown galton variant '{other}' (expected 'direct' or 'tabulated')"
            )),
        }
    }
}

/// Result of dropping `num_balls` balls through `num_layers` layers.
#[derive(Debug, Clone, Serialize)]
pub struct GaltonExperiment {
    pub num_layers: usize,
    pub num_balls: u64,
    pub variant: GaltonVariant,
    /// Balls per slot; index `i` is the slot reached with `i` right bounces.
    pub slot_counts: Vec<u64>,
    /// `N · Binomial(L, ½).pmf(i)` per slot.
    pub expected_counts: Vec<f64>,
    /// Empirical mean and population variance of the slot index, absent
    /// when no ball was dropped.
    pub mean: Option<f64>,
    pub variance: Option<f64>,
}

/// Drops one ball and returns its slot.
pub fn drop_ball<R: Rng + ?Sized>(num_layers: usize, rng: &mut R) -> usize {
    (0..num_layers).filter(|_| coin_flip(rng)).count()
}

/// Drops one ball and returns its slot together with the bounce path
/// (`true` = right).
pub fn drop_ball_with_path<R: Rng + ?Sized>(num_layers: usize, rng: &mut R) -> (usize, Vec<bool>) {
    let path: Vec<bool> = (0..num_layers).map(|_| coin_flip(rng)).collect();
    let slot = path.iter().filter(|&&right| right).count();
    (slot, path)
}

fn run_direct<R: Rng + ?Sized>(num_layers: usize, num_balls: u64, rng: &mut R) -> Vec<u64> {
    let mut slots = vec![0_u64; num_layers + 1];
    for _ in 0..num_balls {
        slots[drop_ball(num_layers, rng)] += 1;
    }
    slots
}

fn run_tabulated<R: Rng + ?Sized>(num_layers: usize, num_balls: u64, rng: &mut R) -> Vec<u64> {
    let paths: Vec<Vec<bool>> = (0..num_balls)
        .map(|_| drop_ball_with_path(num_layers, rng).1)
        .collect();
    let positions: CountHistogram = paths
        .iter()
        .map(|path| path.iter().filter(|&&right| right).count() as u64)
        .collect();
    debug!(
        balls = paths.len(),
        distinct_slots = positions.support().len(),
        "tabulated galton paths"
    );
    positions.to_dense(num_layers + 1)
}

/// Runs the Galton board.
///
/// `slot_counts` always has `num_layers + 1` entries summing to
/// `num_balls`.
///
/// # Examples
/// ```
/// use u_montecarlo::random::create_rng;
/// use u_montecarlo::simulation::galton::{simulate_galton, GaltonVariant};
///
/// let mut rng = create_rng(3);
/// let exp = simulate_galton(10, 1000, GaltonVariant::Direct, &mut rng).unwrap();
/// assert_eq!(exp.slot_counts.len(), 11);
/// assert_eq!(exp.slot_counts.iter().sum::<u64>(), 1000);
/// ```
pub fn simulate_galton<R: Rng + ?Sized>(
    num_layers: usize,
    num_balls: u64,
    variant: GaltonVariant,
    rng: &mut R,
) -> Result<GaltonExperiment> {
    let slot_counts = match variant {
        GaltonVariant::Direct => run_direct(num_layers, num_balls, rng),
        GaltonVariant::Tabulated => run_tabulated(num_layers, num_balls, rng),
    };

    let binomial = Binomial::new(num_layers as u64, 0.5)?;
    let expected_counts: Vec<f64> = (0..=num_layers as u64)
        .map(|k| num_balls as f64 * binomial.pmf(k))
        .collect();

    let summary = slot_counts
        .iter()
        .enumerate()
        .fold(CountHistogram::new(), |mut h, (slot, &count)| {
            h.record_n(slot as u64, count);
            h
        })
        .mean_variance();

    info!(
        num_layers,
        num_balls,
        %variant,
        mean = summary.map(|(m, _)| m),
        expected_mean = binomial.mean(),
        "galton board finished"
    );

    Ok(GaltonExperiment {
        num_layers,
        num_balls,
        variant,
        slot_counts,
        expected_counts,
        mean: summary.map(|(m, _)| m),
        variance: summary.map(|(_, v)| v),
    })
}

impl GaltonExperiment {
    /// Slot counts with the binomial expectation overlaid.
    pub fn figures(&self) -> Vec<Figure> {
        let observed = self
            .slot_counts
            .iter()
            .enumerate()
            .map(|(slot, &count)| (slot as f64, count as f64))
            .collect();
        let expected = self
            .expected_counts
            .iter()
            .enumerate()
            .map(|(slot, &count)| (slot as f64, count))
            .collect();
        vec![Figure::new(
            format!(
                "Galton board\nlayers={}, balls={}, variant={}",
                self.num_layers, self.num_balls, self.variant
            ),
            Series::new("balls per slot", observed),
        )
        .with_theoretical(Series::new(
            format!("{} × binomial({}, 0.5)", self.num_balls, self.num_layers),
            expected,
        ))]
    }
}

//! Survival game.
//!
//! Each player plays up to `num_rounds` rounds and fails in any round with
//! probability `p`. The round of first failure is geometric; for small `p`
//! it is close to an exponential with scale `θ = round(1/p + 0.5)`.

use rand::distr::{Bernoulli, Distribution};
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use crate::distributions::{Exponential, Geometric};
use crate::error::{Result, SimulationError};
use crate::histogram::CountHistogram;
use crate::render::{Figure, Series};

/// Result of playing the survival game with every player.
#[derive(Debug, Clone, Serialize)]
pub struct SurvivalExperiment {
    pub num_rounds: u64,
    pub p: f64,
    pub num_players: u64,
    /// Round index (0-based) at which each failing player first failed.
    pub first_failures: CountHistogram,
    /// Players that never failed within `num_rounds`.
    pub survived_beyond_horizon: u64,
    /// Continuous approximation with scale `θ`.
    pub exponential: Exponential,
    /// Exact law of the first-failure round.
    pub geometric: Geometric,
}

/// Plays one player's game; `None` if the player survives every round.
pub fn first_failure<R: Rng + ?Sized>(num_rounds: u64, trial: &Bernoulli, rng: &mut R) -> Option<u64> {
    (0..num_rounds).find(|_| trial.sample(rng))
}

/// Plays the survival game for `num_players` players.
///
/// Every player ends up either in `first_failures` or in
/// `survived_beyond_horizon`, never both.
///
/// # Errors
/// Returns `Err` unless `0 < p <= 1`.
///
/// # Examples
/// ```
/// use u_montecarlo::random::create_rng;
/// use u_montecarlo::simulation::survival::simulate_survival;
///
/// let mut rng = create_rng(9);
/// let exp = simulate_survival(100, 0.05, 500, &mut rng).unwrap();
/// assert_eq!(exp.first_failures.total() + exp.survived_beyond_horizon, 500);
/// assert_eq!(exp.theta(), 20.0);
/// ```
pub fn simulate_survival<R: Rng + ?Sized>(
    num_rounds: u64,
    p: f64,
    num_players: u64,
    rng: &mut R,
) -> Result<SurvivalExperiment> {
    if !(p > 0.0 && p <= 1.0) {
        return Err(SimulationError::invalid(
            "p",
            format!("failure probability must be in (0, 1], got {p}"),
        ));
    }
    let exponential = Exponential::from_failure_probability(p)?;
    let geometric = Geometric::new(p)?;
    let trial = Bernoulli::new(p).map_err(|e| SimulationError::invalid("p", e.to_string()))?;

    let mut first_failures = CountHistogram::new();
    let mut survived_beyond_horizon = 0;
    for _ in 0..num_players {
        match first_failure(num_rounds, &trial, rng) {
            Some(round) => first_failures.record(round),
            None => survived_beyond_horizon += 1,
        }
    }

    if num_players > 0 && survived_beyond_horizon == num_players {
        warn!(num_rounds, p, "no player failed within the horizon");
    }
    info!(
        num_players,
        num_rounds,
        p,
        theta = exponential.scale(),
        failed = first_failures.total(),
        survived_beyond_horizon,
        "survival game finished"
    );

    Ok(SurvivalExperiment {
        num_rounds,
        p,
        num_players,
        first_failures,
        survived_beyond_horizon,
        exponential,
        geometric,
    })
}

impl SurvivalExperiment {
    /// Scale of the exponential approximation.
    pub fn theta(&self) -> f64 {
        self.exponential.scale()
    }

    /// Survivors expected after `num_rounds`: `N·(1 − p)^rounds`.
    pub fn expected_survivors(&self) -> f64 {
        self.num_players as f64 * self.geometric.survival(self.num_rounds)
    }

    /// Failure-round frequencies against the exponential density, then
    /// per-player rates against the geometric PMF.
    pub fn figures(&self) -> Vec<Figure> {
        let failed = self.first_failures.total();
        let support = self.first_failures.support();

        let among_failed: Vec<(f64, f64)> = self
            .first_failures
            .iter()
            .map(|(round, count)| (round as f64, count as f64 / failed as f64))
            .collect();
        let density: Vec<(f64, f64)> = support
            .iter()
            .map(|&round| (round as f64, self.exponential.pdf(round as f64)))
            .collect();
        let continuous = Figure::new(
            format!(
                "Survival game\np={}, players={}, theta={}, survived beyond {} rounds: {}",
                self.p,
                self.num_players,
                self.theta(),
                self.num_rounds,
                self.survived_beyond_horizon
            ),
            Series::new("first-failure frequency", among_failed),
        )
        .with_theoretical(Series::new(
            format!("exponential(theta = {})", self.theta()),
            density,
        ));

        let per_player: Vec<(f64, f64)> = self
            .first_failures
            .iter()
            .map(|(round, count)| (round as f64, count as f64 / self.num_players as f64))
            .collect();
        let pmf: Vec<(f64, f64)> = support
            .iter()
            .map(|&round| (round as f64, self.geometric.pmf(round)))
            .collect();
        let exact = Figure::new(
            format!(
                "Geometric law\nexpected survivors {:.1}, observed {}",
                self.expected_survivors(),
                self.survived_beyond_horizon
            ),
            Series::new("first-failure rate per player", per_player),
        )
        .with_theoretical(Series::new(format!("geometric(p = {})", self.p), pmf));

        vec![continuous, exact]
    }
}

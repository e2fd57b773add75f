//! # u-montecarlo
//!
//! Monte Carlo demonstrations of four classical probability laws.
//!
//! Each experiment simulates a random process, tabulates the outcome and
//! compares it with the distribution the process is known to approach:
//!
//! - **Zipf**: joining random pairs of paper-clip chains, with a grid
//!   search for the best-fitting Zipf shape by KL divergence.
//! - **Binomial**: balls falling through a Galton board.
//! - **Normal**: histograms of sample means (central limit theorem).
//! - **Exponential**: the round at which a player first fails a repeated
//!   Bernoulli trial.
//!
//! ## Modules
//!
//! - [`simulation`]: the four experiments
//! - [`distributions`]: theoretical laws used as overlays
//! - [`special`]: Riemann zeta, log-gamma, relative entropy
//! - [`stats`]: descriptive statistics with numerical stability guarantees
//! - [`random`]: seeded RNG construction and sampling helpers
//! - [`histogram`]: count and equal-width histograms
//! - [`collections`]: the clip pool behind the Zipf process
//! - [`render`]: figures and chart surfaces
//! - [`config`]: TOML experiment configuration
//! - [`error`]: error types
//!
//! ## Design Philosophy
//!
//! - **Injected randomness**: every simulator borrows its RNG, so a fixed
//!   seed reproduces a run exactly
//! - **Computation apart from presentation**: simulators return data;
//!   charts are drawn from it afterwards
//! - **Property-based testing**: invariants verified via proptest

pub mod collections;
pub mod config;
pub mod distributions;
pub mod error;
pub mod histogram;
pub mod random;
pub mod render;
pub mod simulation;
pub mod special;
pub mod stats;

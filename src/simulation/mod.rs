//! Monte Carlo experiments.
//!
//! Every simulator takes its random source as `&mut R` and returns a plain
//! result value; presentation goes through each result's `figures()`.

pub mod clt;
pub mod galton;
pub mod survival;
pub mod zipf;

pub use clt::{run_clt_suite, simulate_clt, Population, SampleMeanHistogram};
pub use galton::{simulate_galton, GaltonExperiment, GaltonVariant};
pub use survival::{simulate_survival, SurvivalExperiment};
pub use zipf::{fit_zipf, simulate_zipf, ZipfExperiment, ZipfFit};

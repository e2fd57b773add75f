use std::path::PathBuf;

use clap::{Parser, Subcommand};
use u_montecarlo::config::{CltConfig, ExperimentConfig, GaltonConfig, SurvivalConfig, ZipfConfig};
use u_montecarlo::simulation::GaltonVariant;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Monte Carlo demonstrations of Zipf, binomial, CLT and exponential laws")]
pub struct Args {
    /// RNG seed (overrides config; random when absent everywhere)
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Path to config TOML
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit figures as JSON lines instead of text bars
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Longest text bar in characters (overrides config)
    #[arg(long, global = true)]
    pub width: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Paper-clip joining process with a Zipf best fit
    Zipf(ZipfArgs),
    /// Galton board against the binomial law
    Galton(GaltonArgs),
    /// Sample-mean histograms for growing sample sizes
    Clt(CltArgs),
    /// Survival game against the exponential law
    Survival(SurvivalArgs),
    /// Every experiment in turn
    All,
}

#[derive(clap::Args, Debug, Clone, Default, PartialEq)]
pub struct ZipfArgs {
    #[arg(long)]
    pub rounds: Option<usize>,
    /// Initial clips per round
    #[arg(long)]
    pub k: Option<f64>,
}

#[derive(clap::Args, Debug, Clone, Default, PartialEq)]
pub struct GaltonArgs {
    #[arg(long)]
    pub layers: Option<usize>,
    #[arg(long)]
    pub balls: Option<u64>,
    /// direct | tabulated
    #[arg(long)]
    pub variant: Option<GaltonVariant>,
}

#[derive(clap::Args, Debug, Clone, Default, PartialEq)]
pub struct CltArgs {
    #[arg(long)]
    pub trials: Option<usize>,
    #[arg(long)]
    pub bins: Option<usize>,
    /// Comma-separated sample sizes for the uniform population
    #[arg(long, value_delimiter = ',')]
    pub uniform_sizes: Option<Vec<usize>>,
    /// Comma-separated sample sizes for the exponential population
    #[arg(long, value_delimiter = ',')]
    pub exponential_sizes: Option<Vec<usize>>,
}

#[derive(clap::Args, Debug, Clone, Default, PartialEq)]
pub struct SurvivalArgs {
    #[arg(long)]
    pub rounds: Option<u64>,
    /// Per-round failure probability
    #[arg(long)]
    pub p: Option<f64>,
    #[arg(long)]
    pub players: Option<u64>,
}

impl ZipfArgs {
    fn apply(&self, cfg: &mut ZipfConfig) {
        if let Some(v) = self.rounds {
            cfg.num_rounds = v;
        }
        if let Some(v) = self.k {
            cfg.num_clips_k = v;
        }
    }
}

impl GaltonArgs {
    fn apply(&self, cfg: &mut GaltonConfig) {
        if let Some(v) = self.layers {
            cfg.num_layers = v;
        }
        if let Some(v) = self.balls {
            cfg.num_balls = v;
        }
        if let Some(v) = self.variant {
            cfg.variant = v;
        }
    }
}

impl CltArgs {
    fn apply(&self, cfg: &mut CltConfig) {
        if let Some(v) = self.trials {
            cfg.num_trials = v;
        }
        if let Some(v) = self.bins {
            cfg.num_bins = v;
        }
        if let Some(v) = &self.uniform_sizes {
            cfg.uniform_sample_sizes = v.clone();
        }
        if let Some(v) = &self.exponential_sizes {
            cfg.exponential_sample_sizes = v.clone();
        }
    }
}

impl SurvivalArgs {
    fn apply(&self, cfg: &mut SurvivalConfig) {
        if let Some(v) = self.rounds {
            cfg.num_rounds = v;
        }
        if let Some(v) = self.p {
            cfg.p = v;
        }
        if let Some(v) = self.players {
            cfg.num_players = v;
        }
    }
}

impl Args {
    /// Applies command-line overrides on top of `cfg`.
    pub fn apply(&self, cfg: &mut ExperimentConfig) {
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        if let Some(width) = self.width {
            cfg.render.width = width;
        }
        match &self.command {
            Command::Zipf(a) => a.apply(&mut cfg.zipf),
            Command::Galton(a) => a.apply(&mut cfg.galton),
            Command::Clt(a) => a.apply(&mut cfg.clt),
            Command::Survival(a) => a.apply(&mut cfg.survival),
            Command::All => {}
        }
    }
}

//! Entry point: loads configuration, runs the requested experiments and draws
//! their figures on stdout.
mod cli;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use rand::rngs::SmallRng;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{Args, Command};
use u_montecarlo::config::ExperimentConfig;
use u_montecarlo::error::{RenderError, SimulationError};
use u_montecarlo::random::{create_rng, entropy_seed};
use u_montecarlo::render::{ChartSurface, JsonChart, TextChart};
use u_montecarlo::simulation::{
    run_clt_suite, simulate_galton, simulate_survival, simulate_zipf,
};

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), RunError> {
    let mut config = match &args.config {
        Some(path) => ExperimentConfig::load_or_default(path),
        None => ExperimentConfig::default(),
    };
    args.apply(&mut config);

    let seed = config.seed.unwrap_or_else(entropy_seed);
    info!(seed, "seeding random source");
    let mut rng = create_rng(seed);

    let stdout = io::stdout().lock();
    let mut surface: Box<dyn ChartSurface> = if args.json {
        Box::new(JsonChart::new(stdout))
    } else {
        Box::new(TextChart::new(stdout, config.render.width))
    };
    run_experiments(&args.command, &config, &mut rng, surface.as_mut())
}

fn run_experiments(
    command: &Command,
    config: &ExperimentConfig,
    rng: &mut SmallRng,
    surface: &mut dyn ChartSurface,
) -> Result<(), RunError> {
    let all = matches!(command, Command::All);

    if all || matches!(command, Command::Zipf(_)) {
        let zipf = &config.zipf;
        let experiment = simulate_zipf(zipf.num_rounds, zipf.num_clips_k, rng)?;
        surface.draw_all(&experiment.figures())?;
    }
    if all || matches!(command, Command::Galton(_)) {
        let galton = &config.galton;
        let experiment = simulate_galton(galton.num_layers, galton.num_balls, galton.variant, rng)?;
        surface.draw_all(&experiment.figures())?;
    }
    if all || matches!(command, Command::Clt(_)) {
        for histogram in run_clt_suite(&config.clt, rng)? {
            surface.draw_all(&histogram.figures())?;
        }
    }
    if all || matches!(command, Command::Survival(_)) {
        let survival = &config.survival;
        let experiment =
            simulate_survival(survival.num_rounds, survival.p, survival.num_players, rng)?;
        surface.draw_all(&experiment.figures())?;
    }
    Ok(())
}

//! Walk through the Malmquist bias of a magnitude-limited survey
//!
//! Usage:
//! ```
//! cargo run --bin malmquist_bias -- [OPTIONS]
//! ```
//!
//! See --help for detailed options.

use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use log::info;
use malmquist::shared_args::SimulationArgs;
use malmquist::{run_simulation, write_report, NoPause, StdinPrompt};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Command line arguments for the Malmquist bias walkthrough
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Simulates Malmquist bias in a magnitude-limited stellar survey"
)]
struct Args {
    #[command(flatten)]
    simulation: SimulationArgs,

    /// Run straight through without waiting for Enter between parts
    #[arg(long, default_value_t = false)]
    no_pause: bool,

    /// Print the results as JSON instead of the narrative report
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long, default_value_t = false)]
    dump_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = args
        .simulation
        .resolve_config()
        .context("Invalid simulation configuration")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.dump_config {
        writeln!(out, "{}", config.to_json()?)?;
        return Ok(());
    }

    let seed = args.simulation.seed.unwrap_or_else(rand::random);
    info!("Using random seed {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    let outcome =
        run_simulation(&config, &mut rng, Some(seed)).context("Simulation failed")?;

    if args.json {
        serde_json::to_writer_pretty(&mut out, &outcome.summary)?;
        writeln!(out)?;
        return Ok(());
    }

    let style = args.simulation.table_style(&config);
    if args.no_pause {
        write_report(&outcome, &style, &mut out, &mut NoPause)?;
    } else {
        write_report(&outcome, &style, &mut out, &mut StdinPrompt)?;
    }
    Ok(())
}

#![allow(clippy::print_stdout)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use parking_capacity::{ParkingCapacityConfig, ParkingCapacityModule};

mod estimate;
mod logging;
mod train;

/// Parking capacity planning: gateway estimation and model training
#[derive(Parser)]
#[command(name = "parking-capacity")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace); `RUST_LOG` takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the gateways a parking requires
    Estimate(estimate::EstimateArgs),
    /// Train, persist and activate a new regression model
    Train(train::TrainArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.config.as_deref()
        && !path.is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    logging::init(cli.verbose, cli.log_json);

    let config = ParkingCapacityConfig::load(cli.config.as_deref())?;
    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let Some(command) = cli.command else {
        println!("Configuration is valid");
        return Ok(());
    };

    let module = ParkingCapacityModule::new();
    module.init(&config)?;
    let api = module.api()?;

    match command {
        Commands::Estimate(args) => args.run(api.as_ref()).await,
        Commands::Train(args) => args.run(api.as_ref(), &config).await,
    }
}

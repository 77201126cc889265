//! Command-line front end: generate a customer table, run the checkout over it, and summarize the results.

use checkout_sim::checkout::{simulate, Termination};
use checkout_sim::config::{load_config, Config};
use checkout_sim::report::Summary;
use checkout_sim::table;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Supermarket checkout queue simulator
#[derive(Parser, Debug)]
#[command(name = "checkout-sim", version, about = "Discrete-event simulation of a multi-lane FCFS checkout.")]
struct Cli {
    /// Path to a TOML config file; flags given on the command line take precedence
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Draw a synthetic customer table
    Generate {
        /// Where to write the table
        #[arg(short, long, default_value = "customers.csv")]
        output: PathBuf,
        /// Number of customers
        #[arg(long)]
        customers: Option<usize>,
        /// Random seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Simulate the checkout over a customer table and write the results table
    Run {
        /// Customer table; a workload is generated from the config when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Where to write the results table
        #[arg(short, long, default_value = "simulation_results.csv")]
        output: PathBuf,
        /// Number of checkout lanes
        #[arg(short, long)]
        lanes: Option<u32>,
        /// Stop at the last arrival plus this margin instead of when every customer has been served
        #[arg(long)]
        horizon: Option<f64>,
    },
    /// Summarize a results table
    Report {
        /// Results table written by `run`
        #[arg(short, long, default_value = "simulation_results.csv")]
        input: PathBuf,
    },
}

fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("loading configuration from {}", path.display());
            load_config(path).map_err(|e| {
                tracing::error!("failed to load config from '{}': {}", path.display(), e);
                e
            })?
        },
        None => Config::default(),
    };

    match cli.command {
        Commands::Generate {
            output,
            customers,
            seed,
        } => {
            if let Some(customers) = customers {
                config.workload.customers = customers;
            }
            if let Some(seed) = seed {
                config.workload.seed = seed;
            }
            let customers = config.workload.generate()?;
            table::save_customers(&output, &customers)?;
            tracing::info!("wrote {} customers to {}", customers.len(), output.display());
        },
        Commands::Run {
            input,
            output,
            lanes,
            horizon,
        } => {
            if let Some(lanes) = lanes {
                config.simulation.lanes = lanes;
            }
            if let Some(margin) = horizon {
                config.simulation.termination = Termination::Horizon { margin };
            }

            let customers = match &input {
                Some(path) => table::load_customers(path)?,
                None => {
                    tracing::info!("no customer table given, generating one from the workload settings");
                    config.workload.generate()?
                },
            };
            let outcome = simulate(customers, &config.simulation)?;
            table::save_ledger(&output, &outcome.ledger)?;
            tracing::info!("wrote {} service records to {}", outcome.ledger.len(), output.display());

            if let Some(summary) = Summary::from_ledger(&outcome.ledger) {
                println!("{}", summary);
            }
        },
        Commands::Report { input } => {
            let ledger = table::load_ledger(&input)?;
            match Summary::from_ledger(&ledger) {
                Some(summary) => println!("{}", summary),
                None => tracing::warn!("{} holds no service records", input.display()),
            }
        },
    }

    Ok(())
}

mod generate;
mod run;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use sim_core::scenario::ScenarioParams;
use tracing::level_filters::LevelFilter;

use crate::run::{render_text, run_file, RunOptions};

#[derive(Parser)]
#[command(
    name = "ride-sim",
    about = "Discrete-event ride-sharing dispatch simulation",
    version
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file and print the report
    Run {
        /// Scenario file, one request per line
        scenario: PathBuf,
        /// Stop before events later than this time
        #[arg(long, env = "RIDE_SIM_END_TIME")]
        end_time: Option<u64>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Print every executed event with the notifications it produced
        #[arg(long)]
        trace: bool,
        /// Upper bound on executed events
        #[arg(long, default_value_t = 10_000_000)]
        max_steps: usize,
    },
    /// Generate a random scenario file
    Generate {
        #[arg(long, default_value_t = 50)]
        riders: usize,
        #[arg(long, default_value_t = 10)]
        drivers: usize,
        /// Side length of the square grid
        #[arg(long, default_value_t = 20)]
        grid: u32,
        #[arg(long)]
        seed: Option<u64>,
        /// Riders request within [0, window]
        #[arg(long, default_value_t = 100)]
        request_window: u64,
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            scenario,
            end_time,
            format,
            trace,
            max_steps,
        } => {
            let options = RunOptions {
                end_time,
                max_steps,
                trace,
            };
            let summary = run_file(&scenario, &options)?;
            match format {
                OutputFormat::Text => print!("{}", render_text(&summary)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            }
        }
        Commands::Generate {
            riders,
            drivers,
            grid,
            seed,
            request_window,
            output,
        } => {
            let mut params = ScenarioParams::default()
                .with_counts(riders, drivers)
                .with_grid_size(grid)
                .with_request_window(request_window)
                .with_driver_spread(request_window / 4);
            params.seed = seed;
            generate::generate_to(&params, output.as_deref())?;
        }
    }
    Ok(())
}

use clap::{Parser, Subcommand};
use siren::app::{aggregate_app, predict_app, train_app, SirenConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "siren", about = "Spatiotemporal Inference of Regional Emergency Need")]
struct CliArgs {
    /// toml configuration file; built-in defaults when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// aggregate raw dispatch events into the hourly per-cell demand table
    Aggregate {
        /// event csv (latitude, longitude, timestamp[, service_on_duty])
        events: PathBuf,
        /// demand table output csv
        #[arg(long, default_value = "demand.csv")]
        output: PathBuf,
        /// optional hexagon reference table output csv
        #[arg(long)]
        summary: Option<PathBuf>,
    },
    /// fit the demand model and persist the artifact
    Train {
        /// demand table csv (h3_index, timestamp, demand_count)
        demand: PathBuf,
        /// model artifact output path
        #[arg(long, default_value = "model.json")]
        output: PathBuf,
    },
    /// load a model artifact and answer prediction queries
    Predict {
        /// model artifact path
        model: PathBuf,
        /// json file holding one query object or an array of them
        queries: PathBuf,
        /// demand table csv to seed the recent-history store
        #[arg(long)]
        history: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();
    log::info!("starting siren at {}", chrono::Local::now().to_rfc3339());
    let args = CliArgs::parse();
    if let Err(e) = run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<(), siren::model::error::ForecastError> {
    let config = SirenConfig::load(args.config.as_deref())?;
    match args.command {
        Command::Aggregate {
            events,
            output,
            summary,
        } => aggregate_app::run(&config, &events, &output, summary.as_deref()),
        Command::Train { demand, output } => train_app::run(&config, &demand, &output),
        Command::Predict {
            model,
            queries,
            history,
        } => predict_app::run(&config, &model, history.as_deref(), &queries),
    }
}

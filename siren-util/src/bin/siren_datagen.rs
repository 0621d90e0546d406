/*
    writes a synthetic ambulance dispatch event table for pipeline testing,
    biased toward known demand hotspots with a realistic hourly curve.
*/

use clap::Parser;
use kdam::tqdm;
use siren_util::generate::{generate_events, GeneratorConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "siren_datagen", about = "generate synthetic dispatch events")]
struct CliArgs {
    /// output csv path
    #[arg(long, default_value = "events.csv")]
    output: PathBuf,
    /// number of days to simulate
    #[arg(long, default_value_t = 30)]
    days: u32,
    /// events generated per day
    #[arg(long, default_value_t = 500)]
    events_per_day: u32,
    /// rng seed, for reproducible tables
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() {
    env_logger::init();
    let args = CliArgs::parse();

    let config = GeneratorConfig {
        days: args.days,
        events_per_day: args.events_per_day,
        seed: args.seed,
        ..GeneratorConfig::default()
    };
    let events = generate_events(&config);

    let mut writer = csv::WriterBuilder::new()
        .from_path(&args.output)
        .unwrap_or_else(|e| panic!("cannot write {}: {e}", args.output.display()));
    for event in tqdm!(events.iter(), desc = "writing events") {
        writer.serialize(event).expect("failure serializing event row");
    }
    writer.flush().expect("failure flushing event csv");
    log::info!("wrote {} events to {}", events.len(), args.output.display());
}

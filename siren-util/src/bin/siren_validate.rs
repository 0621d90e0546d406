/*
    checks an event csv before it enters the aggregation pipeline and prints
    a json report of row, timestamp, and coordinate problems.
*/

use clap::Parser;
use siren_util::validate::validate_events;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "siren_validate", about = "validate a dispatch event table")]
struct CliArgs {
    /// event csv to check
    events: PathBuf,
    /// coverage bounds as min_lat,max_lat,min_lon,max_lon
    #[arg(long, default_value = "12.8,13.2,77.4,77.8", value_parser = parse_bounds)]
    bounds: (f64, f64, f64, f64),
}

fn parse_bounds(value: &str) -> Result<(f64, f64, f64, f64), String> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| e.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    match parts[..] {
        [a, b, c, d] => Ok((a, b, c, d)),
        _ => Err(String::from("expected four comma-separated numbers")),
    }
}

fn main() {
    env_logger::init();
    let args = CliArgs::parse();

    match validate_events(&args.events, args.bounds) {
        Ok(report) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).expect("failure serializing report")
            );
            if !report.is_clean() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            log::error!("{e}");
            std::process::exit(2);
        }
    }
}

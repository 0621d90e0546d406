/*
    end-to-end pipeline: raw event csv -> aggregate -> train -> load ->
    predict, all through the same entry points the cli uses.
*/

use siren::app::{aggregate_app, train_app, SirenConfig};
use siren::model::demand;
use siren::model::predict::{DemandLevel, PredictQuery};
use std::io::Write;
use std::path::PathBuf;

const LAT: f64 = 12.9352;
const LON: f64 = 77.6245;

/// daytime hours produce three events, nighttime one, for 45 days straight.
fn write_event_csv(dir: &std::path::Path) -> PathBuf {
    let path = dir.join("events.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "latitude,longitude,timestamp").unwrap();
    let start = 1_704_067_200i64; // 2024-01-01T00:00:00Z
    for hour_index in 0..(45 * 24) {
        let hour_start = start + hour_index * 3600;
        let hour_of_day = (hour_index % 24) as u32;
        let n_events = if (8..20).contains(&hour_of_day) { 3 } else { 1 };
        for event in 0..n_events {
            let ts = chrono::DateTime::from_timestamp(hour_start + event * 60, 0).unwrap();
            writeln!(file, "{LAT},{LON},{}", ts.to_rfc3339()).unwrap();
        }
    }
    path
}

fn write_config(dir: &std::path::Path) -> PathBuf {
    let path = dir.join("siren.toml");
    std::fs::write(
        &path,
        r#"
[grid]
resolution = 8

[trainer]
validation_fraction = 0.2
min_slots_per_cell = 24

[trainer.params]
n_estimators = 25
max_depth = 3
learning_rate = 0.3

[thresholds]
medium = 1.5
high = 2.5
"#,
    )
    .unwrap();
    path
}

#[test]
fn test_aggregate_train_predict_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let events_path = write_event_csv(dir.path());
    let config = SirenConfig::from_file(&write_config(dir.path())).unwrap();

    // aggregate events into the demand and summary tables
    let demand_path = dir.path().join("demand.csv");
    let summary_path = dir.path().join("hexagons.csv");
    aggregate_app::run(&config, &events_path, &demand_path, Some(&summary_path)).unwrap();

    let records = demand::read_demand_csv(&demand_path).unwrap();
    assert_eq!(records.len(), 45 * 24);
    assert!(records.iter().all(|r| r.count == 1.0 || r.count == 3.0));
    assert!(summary_path.exists());

    // train and persist the artifact
    let model_path = dir.path().join("model.json");
    train_app::run(&config, &demand_path, &model_path).unwrap();

    // serve: load artifact, seed history, predict daytime vs nighttime
    let service = config.forecast_service().unwrap();
    service.load(&model_path).unwrap();
    service.ingest(&records);

    let expected_cell = service.grid.index(LAT, LON).unwrap().to_string();

    // timestamps deep inside the recorded history, so lag and rolling
    // features resolve from real slots: day 40 at 14:00 and 03:00 utc
    let day_40 = 1_704_067_200i64 + 39 * 24 * 3600;
    let daytime_ts = chrono::DateTime::from_timestamp(day_40 + 14 * 3600, 0).unwrap();
    let nighttime_ts = chrono::DateTime::from_timestamp(day_40 + 3 * 3600, 0).unwrap();

    let daytime = service
        .predict(&PredictQuery::at_timestamp(LAT, LON, daytime_ts))
        .unwrap();
    assert_eq!(daytime.cell_id, expected_cell);
    assert_eq!(daytime.hour, 14);
    assert!(daytime.predicted_demand >= 0.0);
    assert_eq!(daytime.demand_level, DemandLevel::High);

    let nighttime = service
        .predict(&PredictQuery::at_timestamp(LAT, LON, nighttime_ts))
        .unwrap();
    assert!(nighttime.predicted_demand < daytime.predicted_demand);
    assert_eq!(nighttime.demand_level, DemandLevel::Low);

    // calendar-part queries serve through the same path
    let by_parts = service
        .predict(&PredictQuery::at_parts(LAT, LON, 14, 2, 6))
        .unwrap();
    assert_eq!(by_parts.cell_id, expected_cell);
    assert_eq!(
        by_parts.demand_level,
        config.thresholds.classify(by_parts.predicted_demand)
    );
}

use chrono::{DateTime, TimeDelta, Timelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use siren::model::demand::Event;

/// demand centers used to bias synthetic event locations, with relative
/// weights. defaults model Bangalore neighborhoods.
#[derive(Debug, Clone)]
pub struct Hotspot {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub weight: f64,
}

pub const HOTSPOTS: [Hotspot; 6] = [
    Hotspot { name: "Koramangala", lat: 12.9352, lon: 77.6245, weight: 0.25 },
    Hotspot { name: "Whitefield", lat: 12.9698, lon: 77.7500, weight: 0.20 },
    Hotspot { name: "Electronic City", lat: 12.8399, lon: 77.6770, weight: 0.15 },
    Hotspot { name: "Marathahalli", lat: 12.9591, lon: 77.6974, weight: 0.15 },
    Hotspot { name: "Jayanagar", lat: 12.9299, lon: 77.5826, weight: 0.13 },
    Hotspot { name: "Indiranagar", lat: 12.9784, lon: 77.6408, weight: 0.12 },
];

/// relative intensity of events per hour of day: low overnight, rising
/// through the morning, evening peak.
const HOUR_WEIGHTS: [f64; 24] = [
    0.02, 0.01, 0.01, 0.01, 0.02, 0.03, // 0-5
    0.04, 0.05, 0.06, 0.07, 0.07, 0.06, // 6-11
    0.05, 0.05, 0.05, 0.05, 0.06, 0.07, // 12-17
    0.08, 0.07, 0.06, 0.05, 0.04, 0.03, // 18-23
];

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub start: DateTime<Utc>,
    pub days: u32,
    pub events_per_day: u32,
    pub bounds: (f64, f64, f64, f64), // min_lat, max_lat, min_lon, max_lon
    pub off_duty_fraction: f64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            start: DateTime::from_timestamp(1_717_200_000, 0).unwrap_or_default(),
            days: 30,
            events_per_day: 500,
            bounds: (12.8, 13.2, 77.4, 77.8),
            off_duty_fraction: 0.15,
            seed: 42,
        }
    }
}

/// generates a deterministic synthetic event table: locations biased toward
/// hotspots, timestamps following the hourly intensity curve, a fraction of
/// rows flagged off duty. output is sorted by timestamp.
pub fn generate_events(config: &GeneratorConfig) -> Vec<Event> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let total_weight: f64 = HOTSPOTS.iter().map(|h| h.weight).sum();
    let (min_lat, max_lat, min_lon, max_lon) = config.bounds;

    let mut events = Vec::with_capacity((config.days * config.events_per_day) as usize);
    for day in 0..config.days {
        let day_start = config.start + TimeDelta::days(day as i64);
        for _ in 0..config.events_per_day {
            let hour = pick_hour(&mut rng);
            let timestamp = day_start
                .with_hour(hour)
                .unwrap_or(day_start)
                + TimeDelta::seconds(rng.random_range(0..3600));

            let (lat, lon) = if rng.random_bool(0.7) {
                let hotspot = pick_hotspot(&mut rng, total_weight);
                (
                    (hotspot.lat + rng.random_range(-0.015..0.015)).clamp(min_lat, max_lat),
                    (hotspot.lon + rng.random_range(-0.015..0.015)).clamp(min_lon, max_lon),
                )
            } else {
                (
                    rng.random_range(min_lat..max_lat),
                    rng.random_range(min_lon..max_lon),
                )
            };

            let on_duty = !rng.random_bool(config.off_duty_fraction);
            events.push(Event {
                latitude: lat,
                longitude: lon,
                timestamp: timestamp.to_rfc3339(),
                service_on_duty: Some(if on_duty { "YES" } else { "NO" }.to_string()),
            });
        }
    }
    events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    events
}

fn pick_hour(rng: &mut StdRng) -> u32 {
    let total: f64 = HOUR_WEIGHTS.iter().sum();
    let mut draw = rng.random_range(0.0..total);
    for (hour, weight) in HOUR_WEIGHTS.iter().enumerate() {
        if draw < *weight {
            return hour as u32;
        }
        draw -= weight;
    }
    23
}

fn pick_hotspot(rng: &mut StdRng, total_weight: f64) -> &'static Hotspot {
    let mut draw = rng.random_range(0.0..total_weight);
    for hotspot in HOTSPOTS.iter() {
        if draw < hotspot.weight {
            return hotspot;
        }
        draw -= hotspot.weight;
    }
    &HOTSPOTS[HOTSPOTS.len() - 1]
}

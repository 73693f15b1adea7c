//! Statistics Panel
//!
//! Per-kind parameter summaries over the cached measurements.

mod summary;

pub use summary::{summarize, RankedValue, Sample, Statistics, ValueRange, RANGE_BUCKETS, TOP_N};

use serde::Serialize;

use crate::models::{Snapshot, Station, StationKind};

/// Summary of one parameter for one station kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterStatistics {
    pub kind: StationKind,
    pub parameter: String,
    pub unit: String,
    #[serde(flatten)]
    pub statistics: Statistics,
}

/// Pair every present value with the record it came from.
fn collect<S: Station>(records: &[S], value: impl Fn(&S) -> Option<f64>) -> Vec<Sample> {
    records
        .iter()
        .filter_map(|record| {
            let (lat, lon) = (record.latitude().unwrap_or(0.0), record.longitude().unwrap_or(0.0));
            value(record).map(|v| Sample {
                value: v,
                station_name: record.display_name().to_string(),
                lat,
                lon,
            })
        })
        .collect()
}

fn push(out: &mut Vec<ParameterStatistics>, kind: StationKind, parameter: &str, unit: &str, samples: Vec<Sample>) {
    if samples.is_empty() {
        return;
    }
    out.push(ParameterStatistics {
        kind,
        parameter: parameter.to_string(),
        unit: unit.to_string(),
        statistics: summarize(&samples),
    });
}

/// Statistics for every parameter of `kind` that has at least one value.
pub fn statistics_for(kind: StationKind, snapshot: &Snapshot) -> Vec<ParameterStatistics> {
    let mut out = Vec::new();

    match kind {
        StationKind::Hydro => {
            let data = &snapshot.hydro;
            push(&mut out, kind, "Stan wody", "cm", collect(data, |m| m.water_level));
            push(&mut out, kind, "Temperatura wody", "°C", collect(data, |m| m.water_temperature));
        }
        StationKind::Hydro2 => {
            let data = &snapshot.hydro2;
            push(&mut out, kind, "Stan", "cm", collect(data, |m| m.level));
            push(&mut out, kind, "Przepływ", "m3/s", collect(data, |m| m.flow));
        }
        StationKind::Synop => {
            let data = &snapshot.synop;
            push(&mut out, kind, "Temperatura", "°C", collect(data, |m| m.temperature));
            push(&mut out, kind, "Prędkość wiatru", "m/s", collect(data, |m| m.wind_speed));
            push(&mut out, kind, "Wilgotność wzgl.", "%", collect(data, |m| m.relative_humidity));
            push(&mut out, kind, "Ciśnienie", "hPa", collect(data, |m| m.pressure));
            push(&mut out, kind, "Suma opadów", "mm", collect(data, |m| m.precipitation));
        }
        StationKind::Meteo => {
            let data = &snapshot.meteo;
            push(&mut out, kind, "Temperatura gruntu", "°C", collect(data, |m| m.ground_temperature));
            push(&mut out, kind, "Śr. prędkość wiatru", "m/s", collect(data, |m| m.wind_avg_speed));
            push(&mut out, kind, "Wilgotność", "%", collect(data, |m| m.relative_humidity));
        }
        StationKind::Aq => {
            // parameter name -> (unit of first reading, samples), in first-seen order
            let mut groups: Vec<(String, String, Vec<Sample>)> = Vec::new();
            for station in &snapshot.aq {
                for param in &station.parameters {
                    let Some(value) = param.measurement_value else {
                        continue;
                    };
                    let sample = Sample {
                        value,
                        station_name: station.display_name().to_string(),
                        lat: station.lat.unwrap_or(0.0),
                        lon: station.lon.unwrap_or(0.0),
                    };
                    match groups.iter_mut().find(|(name, _, _)| *name == param.parameter) {
                        Some((_, _, samples)) => samples.push(sample),
                        None => groups.push((
                            param.parameter.clone(),
                            param.measurement_unit.clone().unwrap_or_default(),
                            vec![sample],
                        )),
                    }
                }
            }
            for (parameter, unit, samples) in groups {
                push(&mut out, kind, &parameter, &unit, samples);
            }
        }
    }

    out
}

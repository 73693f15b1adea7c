//! Lookup file parsers
//!
//! Hydro: `LP;ID;Nazwa;Rzeka;Szerokość;Długość;Wysokość` (latitude first).
//! Synop: `Kod;Nazwa;Długość;Szerokość;...` (longitude first).
//! The first line of each file is a header.

use std::collections::HashMap;
use tracing::debug;

use super::{dms_to_decimal, StationCoordinate};

fn non_empty(column: Option<&&str>) -> Option<String> {
    column
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

pub fn parse_hydro_lookup(text: &str) -> HashMap<String, StationCoordinate> {
    let mut stations = HashMap::new();

    for (line_no, raw) in text.lines().enumerate().skip(1) {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let columns: Vec<&str> = line.split(';').collect();
        if columns.len() < 6 {
            debug!("Hydro lookup line {}: too few columns", line_no + 1);
            continue;
        }

        let (Some(id), Some(lat_dms), Some(lon_dms)) = (
            non_empty(columns.get(1)),
            non_empty(columns.get(4)),
            non_empty(columns.get(5)),
        ) else {
            continue;
        };

        let lat = dms_to_decimal(&lat_dms);
        let lon = dms_to_decimal(&lon_dms);
        if lat > 0.0 && lon > 0.0 {
            stations.insert(
                id.clone(),
                StationCoordinate {
                    id,
                    name: non_empty(columns.get(2)).unwrap_or_default(),
                    river: non_empty(columns.get(3)),
                    lat,
                    lon,
                    altitude: non_empty(columns.get(6)),
                },
            );
        } else {
            debug!("Hydro lookup line {}: unusable coordinates for {}", line_no + 1, id);
        }
    }

    stations
}

pub fn parse_synop_lookup(text: &str) -> HashMap<String, StationCoordinate> {
    let mut stations = HashMap::new();

    for raw in text.lines().skip(1) {
        let columns: Vec<&str> = raw.trim().split(';').collect();
        if columns.len() < 5 {
            continue;
        }

        let (Some(code), Some(lon_dms), Some(lat_dms)) = (
            non_empty(columns.first()),
            non_empty(columns.get(2)),
            non_empty(columns.get(3)),
        ) else {
            continue;
        };

        let lat = dms_to_decimal(&lat_dms);
        let lon = dms_to_decimal(&lon_dms);
        if lat != 0.0 && lon != 0.0 {
            stations.insert(
                code.clone(),
                StationCoordinate {
                    id: code,
                    name: non_empty(columns.get(1)).unwrap_or_default(),
                    river: None,
                    lat,
                    lon,
                    altitude: None,
                },
            );
        }
    }

    stations
}

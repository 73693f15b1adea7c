#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};

use polish_env_map::coordinates::{parse_hydro_lookup, parse_synop_lookup, CoordinateBook};
use polish_env_map::models::{
    AqMeasurement, AqParameter, Hydro2Measurement, HydroMeasurement, MeteoMeasurement,
    SynopMeasurement,
};
use polish_env_map::sources::MeasurementFeed;

pub const HYDRO_LOOKUP: &str = "LP;ID;NAZWA;RZEKA;SZEROKOSC;DLUGOSC;WYSOKOSC\n\
1;150160180;Krzyżanowice;Odra;50 0 36;18 17 12;183\n\
2;152210170;Warszawa-Bulwary;Wisła;52 14 48;21 1 41;78\n";

pub const SYNOP_LOOKUP: &str = "KOD;NAZWA;DLUGOSC;SZEROKOSC;WYSOKOSC\n\
295;BIAŁYSTOK;23 9 43;53 6 26;148\n";

pub fn coordinate_book() -> CoordinateBook {
    CoordinateBook::new(parse_hydro_lookup(HYDRO_LOOKUP), parse_synop_lookup(SYNOP_LOOKUP))
}

pub fn hydro() -> Vec<HydroMeasurement> {
    vec![
        HydroMeasurement {
            station_id: "150160180".into(),
            station_name: Some("Krzyżanowice".into()),
            river: Some("Odra".into()),
            voivodeship: Some("śląskie".into()),
            water_level: Some(231.0),
            water_level_at: NaiveDate::from_ymd_opt(2024, 3, 1).and_then(|d| d.and_hms_opt(12, 0, 0)),
            water_temperature: Some(4.5),
            ice_phenomenon: Some(0),
            overgrowth: Some(112),
            ..Default::default()
        },
        HydroMeasurement {
            station_id: "152210170".into(),
            station_name: Some("Warszawa-Bulwary".into()),
            river: Some("Wisła".into()),
            voivodeship: Some("mazowieckie".into()),
            water_level: Some(95.0),
            water_temperature: Some(3.1),
            ice_phenomenon: Some(4),
            overgrowth: Some(0),
            ..Default::default()
        },
        // not in the lookup file
        HydroMeasurement {
            station_id: "999999999".into(),
            station_name: Some("Nieznana".into()),
            water_level: Some(10.0),
            ..Default::default()
        },
    ]
}

pub fn synop() -> Vec<SynopMeasurement> {
    vec![
        SynopMeasurement {
            station_id: "12295".into(),
            station_name: Some("Białystok".into()),
            measured_on: NaiveDate::from_ymd_opt(2024, 3, 1),
            hour: Some(12),
            temperature: Some(6.4),
            wind_speed: Some(3.0),
            relative_humidity: Some(71.2),
            precipitation: Some(0.0),
            pressure: Some(1012.5),
            ..Default::default()
        },
        SynopMeasurement {
            station_id: "12375".into(),
            station_name: Some("Warszawa".into()),
            temperature: Some(8.0),
            ..Default::default()
        },
    ]
}

pub fn hydro2() -> Vec<Hydro2Measurement> {
    vec![Hydro2Measurement {
        station_code: "154190050".into(),
        station_name: Some("Gdańsk Sobieszewo".into()),
        lat: Some(54.34),
        lon: Some(18.82),
        level: Some(512.0),
        flow: Some(980.5),
        ..Default::default()
    }]
}

pub fn aq() -> Vec<AqMeasurement> {
    let param = |code: &str, index: i32, value: Option<f64>| AqParameter {
        parameter: code.to_string(),
        index_value: index,
        index_text: if index < 0 { "Brak".to_string() } else { "Dobry".to_string() },
        measurement_value: value,
        measurement_unit: value.map(|_| "µg/m³".to_string()),
        last_updated: Some("2024-03-01 13:00:00".to_string()),
    };
    vec![
        AqMeasurement {
            location_id: "114".into(),
            location: "Wrocław, ul. Bartnicza".into(),
            lat: Some(51.115933),
            lon: Some(17.141125),
            parameters: vec![
                param("stIndexLevel", 1, None),
                param("PM10", 1, Some(23.1)),
                param("NO2", 0, Some(14.0)),
            ],
        },
        AqMeasurement {
            location_id: "400".into(),
            location: "Kraków, al. Krasińskiego".into(),
            lat: Some(50.057678),
            lon: Some(19.926189),
            parameters: vec![param("stIndexLevel", 4, None), param("PM10", 3, Some(88.0))],
        },
    ]
}

/// Feed serving fixed records; the meteo endpoint always fails.
#[derive(Default)]
pub struct FixtureFeed {
    pub calls: AtomicUsize,
}

#[async_trait]
impl MeasurementFeed for FixtureFeed {
    async fn hydro(&self) -> Result<Vec<HydroMeasurement>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(hydro())
    }

    async fn hydro2(&self) -> Result<Vec<Hydro2Measurement>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(hydro2())
    }

    async fn synop(&self) -> Result<Vec<SynopMeasurement>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(synop())
    }

    async fn meteo(&self) -> Result<Vec<MeteoMeasurement>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        bail!("IMGW responded with HTTP 503 for meteo/")
    }

    async fn air_quality(&self) -> Result<Vec<AqMeasurement>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(aq())
    }
}

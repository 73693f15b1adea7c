//! Table layout and row mapping for the five measurement tables

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Row, Statement};

use crate::models::{
    AqMeasurement, AqParameter, Hydro2Measurement, HydroMeasurement, MeteoMeasurement, Station,
    SynopMeasurement,
};
use crate::utils::lenient::{parse_timestamp_str, TIMESTAMP_FORMAT};

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS hydro_measurements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    station_id TEXT NOT NULL,
    station_name TEXT,
    river TEXT,
    voivodeship TEXT,
    water_level REAL,
    water_level_at TEXT,
    water_temperature REAL,
    water_temperature_at TEXT,
    ice_phenomenon INTEGER,
    ice_phenomenon_at TEXT,
    overgrowth INTEGER,
    overgrowth_at TEXT,
    lat REAL,
    lon REAL
);
CREATE INDEX IF NOT EXISTS idx_hydro_station ON hydro_measurements(station_id);

CREATE TABLE IF NOT EXISTS hydro2_measurements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    station_code TEXT NOT NULL,
    station_name TEXT,
    lat REAL,
    lon REAL,
    level REAL,
    level_at TEXT,
    flow REAL,
    flow_at TEXT
);
CREATE INDEX IF NOT EXISTS idx_hydro2_station ON hydro2_measurements(station_code);

CREATE TABLE IF NOT EXISTS synop_measurements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    station_id TEXT NOT NULL,
    station_name TEXT,
    measured_on TEXT,
    hour INTEGER,
    temperature REAL,
    wind_speed REAL,
    wind_direction REAL,
    relative_humidity REAL,
    precipitation REAL,
    pressure REAL,
    lat REAL,
    lon REAL
);
CREATE INDEX IF NOT EXISTS idx_synop_station ON synop_measurements(station_id);

CREATE TABLE IF NOT EXISTS meteo_measurements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    station_code TEXT NOT NULL,
    station_name TEXT,
    lat REAL,
    lon REAL,
    ground_temperature REAL,
    ground_temperature_at TEXT,
    wind_direction REAL,
    wind_direction_at TEXT,
    wind_avg_speed REAL,
    wind_avg_speed_at TEXT,
    wind_max_speed REAL,
    wind_max_speed_at TEXT,
    relative_humidity REAL,
    relative_humidity_at TEXT,
    wind_gust_10min REAL,
    wind_gust_10min_at TEXT,
    precipitation_10min REAL,
    precipitation_10min_at TEXT
);
CREATE INDEX IF NOT EXISTS idx_meteo_station ON meteo_measurements(station_code);

CREATE TABLE IF NOT EXISTS aq_measurements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    location_id TEXT NOT NULL,
    location TEXT NOT NULL,
    lat REAL,
    lon REAL,
    parameters TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_aq_location ON aq_measurements(location_id);
"#;

/// A record type that owns one of the measurement tables
pub trait Record: Station + Sized + Send + 'static {
    /// Column order shared by `insert` and `from_row`; excludes `id`
    const COLUMNS: &'static [&'static str];

    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize>;
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    fn insert_sql() -> String {
        let placeholders: Vec<String> = (1..=Self::COLUMNS.len()).map(|i| format!("?{}", i)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            Self::KIND.table(),
            Self::COLUMNS.join(", "),
            placeholders.join(", ")
        )
    }

    fn select_sql() -> String {
        format!(
            "SELECT {} FROM {} ORDER BY id ASC",
            Self::COLUMNS.join(", "),
            Self::KIND.table()
        )
    }
}

fn ts(value: &Option<NaiveDateTime>) -> Option<String> {
    value.map(|t| t.format(TIMESTAMP_FORMAT).to_string())
}

fn ts_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDateTime>> {
    let raw: Option<String> = row.get(idx)?;
    Ok(raw.as_deref().and_then(parse_timestamp_str))
}

impl Record for HydroMeasurement {
    const COLUMNS: &'static [&'static str] = &[
        "station_id",
        "station_name",
        "river",
        "voivodeship",
        "water_level",
        "water_level_at",
        "water_temperature",
        "water_temperature_at",
        "ice_phenomenon",
        "ice_phenomenon_at",
        "overgrowth",
        "overgrowth_at",
        "lat",
        "lon",
    ];

    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.station_id,
            self.station_name,
            self.river,
            self.voivodeship,
            self.water_level,
            ts(&self.water_level_at),
            self.water_temperature,
            ts(&self.water_temperature_at),
            self.ice_phenomenon,
            ts(&self.ice_phenomenon_at),
            self.overgrowth,
            ts(&self.overgrowth_at),
            self.lat,
            self.lon,
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            station_id: row.get(0)?,
            station_name: row.get(1)?,
            river: row.get(2)?,
            voivodeship: row.get(3)?,
            water_level: row.get(4)?,
            water_level_at: ts_at(row, 5)?,
            water_temperature: row.get(6)?,
            water_temperature_at: ts_at(row, 7)?,
            ice_phenomenon: row.get(8)?,
            ice_phenomenon_at: ts_at(row, 9)?,
            overgrowth: row.get(10)?,
            overgrowth_at: ts_at(row, 11)?,
            lat: row.get(12)?,
            lon: row.get(13)?,
        })
    }
}

impl Record for Hydro2Measurement {
    const COLUMNS: &'static [&'static str] = &[
        "station_code",
        "station_name",
        "lat",
        "lon",
        "level",
        "level_at",
        "flow",
        "flow_at",
    ];

    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.station_code,
            self.station_name,
            self.lat,
            self.lon,
            self.level,
            ts(&self.level_at),
            self.flow,
            ts(&self.flow_at),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            station_code: row.get(0)?,
            station_name: row.get(1)?,
            lat: row.get(2)?,
            lon: row.get(3)?,
            level: row.get(4)?,
            level_at: ts_at(row, 5)?,
            flow: row.get(6)?,
            flow_at: ts_at(row, 7)?,
        })
    }
}

impl Record for SynopMeasurement {
    const COLUMNS: &'static [&'static str] = &[
        "station_id",
        "station_name",
        "measured_on",
        "hour",
        "temperature",
        "wind_speed",
        "wind_direction",
        "relative_humidity",
        "precipitation",
        "pressure",
        "lat",
        "lon",
    ];

    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.station_id,
            self.station_name,
            self.measured_on.map(|d| d.format("%Y-%m-%d").to_string()),
            self.hour,
            self.temperature,
            self.wind_speed,
            self.wind_direction,
            self.relative_humidity,
            self.precipitation,
            self.pressure,
            self.lat,
            self.lon,
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let measured_on: Option<String> = row.get(2)?;
        Ok(Self {
            station_id: row.get(0)?,
            station_name: row.get(1)?,
            measured_on: measured_on.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
            hour: row.get(3)?,
            temperature: row.get(4)?,
            wind_speed: row.get(5)?,
            wind_direction: row.get(6)?,
            relative_humidity: row.get(7)?,
            precipitation: row.get(8)?,
            pressure: row.get(9)?,
            lat: row.get(10)?,
            lon: row.get(11)?,
        })
    }
}

impl Record for MeteoMeasurement {
    const COLUMNS: &'static [&'static str] = &[
        "station_code",
        "station_name",
        "lat",
        "lon",
        "ground_temperature",
        "ground_temperature_at",
        "wind_direction",
        "wind_direction_at",
        "wind_avg_speed",
        "wind_avg_speed_at",
        "wind_max_speed",
        "wind_max_speed_at",
        "relative_humidity",
        "relative_humidity_at",
        "wind_gust_10min",
        "wind_gust_10min_at",
        "precipitation_10min",
        "precipitation_10min_at",
    ];

    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.station_code,
            self.station_name,
            self.lat,
            self.lon,
            self.ground_temperature,
            ts(&self.ground_temperature_at),
            self.wind_direction,
            ts(&self.wind_direction_at),
            self.wind_avg_speed,
            ts(&self.wind_avg_speed_at),
            self.wind_max_speed,
            ts(&self.wind_max_speed_at),
            self.relative_humidity,
            ts(&self.relative_humidity_at),
            self.wind_gust_10min,
            ts(&self.wind_gust_10min_at),
            self.precipitation_10min,
            ts(&self.precipitation_10min_at),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            station_code: row.get(0)?,
            station_name: row.get(1)?,
            lat: row.get(2)?,
            lon: row.get(3)?,
            ground_temperature: row.get(4)?,
            ground_temperature_at: ts_at(row, 5)?,
            wind_direction: row.get(6)?,
            wind_direction_at: ts_at(row, 7)?,
            wind_avg_speed: row.get(8)?,
            wind_avg_speed_at: ts_at(row, 9)?,
            wind_max_speed: row.get(10)?,
            wind_max_speed_at: ts_at(row, 11)?,
            relative_humidity: row.get(12)?,
            relative_humidity_at: ts_at(row, 13)?,
            wind_gust_10min: row.get(14)?,
            wind_gust_10min_at: ts_at(row, 15)?,
            precipitation_10min: row.get(16)?,
            precipitation_10min_at: ts_at(row, 17)?,
        })
    }
}

impl Record for AqMeasurement {
    const COLUMNS: &'static [&'static str] = &["location_id", "location", "lat", "lon", "parameters"];

    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        let parameters = serde_json::to_string(&self.parameters)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        stmt.execute(params![self.location_id, self.location, self.lat, self.lon, parameters])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let raw: String = row.get(4)?;
        let parameters: Vec<AqParameter> = serde_json::from_str(&raw)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
        Ok(Self {
            location_id: row.get(0)?,
            location: row.get(1)?,
            lat: row.get(2)?,
            lon: row.get(3)?,
            parameters,
        })
    }
}

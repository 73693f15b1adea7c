//! GIOŚ air-quality API (`api.gios.gov.pl/pjp-api/rest`)
//!
//! One station list request, then per station the index and the sensor
//! list, then one data request per sensor. Requests are throttled with a
//! `governor` rate limiter because a full refresh issues several hundred.

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::num::NonZeroU32;
use tracing::{info, warn};

use super::{decode_rows, get_json};
use crate::error::EnvMapResult;
use crate::models::{normalize_code, AqMeasurement, AqParameter, Pollutant, OVERALL_INDEX_PARAMETER};
use crate::utils::lenient;

const SOURCE: &str = "GIOŚ";

/// Index text used when the index service has no entry for a sensor
pub const MISSING_INDEX_TEXT: &str = "Brak";

#[derive(Debug, Deserialize)]
struct GiosStation {
    #[serde(deserialize_with = "lenient::id")]
    id: String,
    #[serde(rename = "stationName", default, deserialize_with = "lenient::text")]
    station_name: Option<String>,
    #[serde(rename = "gegrLat", default, deserialize_with = "lenient::number")]
    lat: Option<f64>,
    #[serde(rename = "gegrLon", default, deserialize_with = "lenient::number")]
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct GiosSensor {
    #[serde(deserialize_with = "lenient::id")]
    id: String,
    param: GiosParam,
}

#[derive(Debug, Deserialize)]
struct GiosParam {
    #[serde(rename = "paramCode")]
    param_code: String,
}

#[derive(Debug, Deserialize)]
struct GiosData {
    #[serde(default)]
    values: Vec<GiosReading>,
}

/// One timestamped value from the sensor data endpoint, newest first
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GiosReading {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub value: Option<f64>,
}

pub struct GiosClient {
    client: Client,
    base_url: String,
    limiter: DefaultDirectRateLimiter,
}

impl GiosClient {
    pub fn new(client: Client, base_url: &str, requests_per_second: u32) -> Self {
        let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter: RateLimiter::direct(Quota::per_second(rate)),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> EnvMapResult<T> {
        self.limiter.until_ready().await;
        let url = format!("{}/{}", self.base_url, path);
        get_json(&self.client, &url, SOURCE).await
    }

    /// Rows of a list endpoint, decoded one at a time.
    async fn get_rows<T: DeserializeOwned>(&self, path: &str, feed: &str) -> EnvMapResult<Vec<T>> {
        let rows: Vec<Value> = self.get(path).await?;
        Ok(decode_rows(rows, feed))
    }

    /// Current readings for every station. Stations, sensors and rows that
    /// fail are logged and skipped; only a failing station list is an error.
    pub async fn current_measurements(&self) -> EnvMapResult<Vec<AqMeasurement>> {
        let stations: Vec<GiosStation> = self.get_rows("station/findAll", "GIOŚ station").await?;
        let mut results = Vec::with_capacity(stations.len());

        for station in &stations {
            match self.station_measurement(station).await {
                Ok(measurement) => results.push(measurement),
                Err(e) => warn!("Air quality station {} skipped: {}", station.id, e),
            }
        }

        info!(
            "Fetched air quality for {} of {} stations",
            results.len(),
            stations.len()
        );
        Ok(results)
    }

    async fn station_measurement(&self, station: &GiosStation) -> EnvMapResult<AqMeasurement> {
        let index_path = format!("aqindex/getIndex/{}", station.id);
        let sensors_path = format!("station/sensors/{}", station.id);
        let (index, sensors) = tokio::try_join!(
            self.get::<Value>(&index_path),
            self.get_rows::<GiosSensor>(&sensors_path, "GIOŚ sensor"),
        )?;

        let mut parameters = Vec::with_capacity(sensors.len() + 1);
        if let Some(overall) = build_overall_index(&index) {
            parameters.push(overall);
        }

        for sensor in &sensors {
            let data_path = format!("data/getData/{}", sensor.id);
            match self.get::<GiosData>(&data_path).await {
                Ok(data) => parameters.push(build_sensor_parameter(
                    &sensor.param.param_code,
                    &data.values,
                    &index,
                )),
                Err(e) => warn!("No data for sensor {}: {}", sensor.id, e),
            }
        }

        Ok(AqMeasurement {
            location_id: station.id.clone(),
            location: station.station_name.clone().unwrap_or_default(),
            lat: station.lat,
            lon: station.lon,
            parameters,
        })
    }
}

fn index_level(index: &Value, key: &str) -> Option<(i32, String)> {
    let level = index.get(key)?;
    let id = level.get("id")?.as_i64()?;
    let name = level
        .get("indexLevelName")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some((id as i32, name))
}

fn calc_date(index: &Value) -> Option<String> {
    index
        .get("stCalcDate")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// The station-wide index as a parameter without a measured value
pub fn build_overall_index(index: &Value) -> Option<AqParameter> {
    let (id, name) = index_level(index, "stIndexLevel")?;
    Some(AqParameter {
        parameter: OVERALL_INDEX_PARAMETER.to_string(),
        index_value: id,
        index_text: name,
        measurement_value: None,
        measurement_unit: None,
        last_updated: calc_date(index),
    })
}

/// Combine a sensor's readings with the station index. The latest reading
/// is the first non-null value, falling back to the first entry.
pub fn build_sensor_parameter(param_code: &str, values: &[GiosReading], index: &Value) -> AqParameter {
    let latest = values
        .iter()
        .find(|v| v.value.is_some())
        .or_else(|| values.first());

    let key = normalize_code(param_code);
    let level = index_level(index, &format!("{}IndexLevel", key));
    let (index_value, index_text) = level.unwrap_or((-1, MISSING_INDEX_TEXT.to_string()));

    AqParameter {
        parameter: param_code.to_string(),
        index_value,
        index_text,
        measurement_value: latest.and_then(|r| r.value),
        measurement_unit: Pollutant::from_code(param_code).map(|p| p.unit().to_string()),
        last_updated: latest
            .and_then(|r| r.date.clone())
            .or_else(|| calc_date(index)),
    }
}

//! Data Sources
//!
//! Read-only clients for the public IMGW and GIOŚ APIs. Fetching returns raw
//! records; attaching coordinates and persisting is left to `refresh`.

mod gios;
mod imgw;

pub use gios::{build_overall_index, build_sensor_parameter, GiosClient, GiosReading};
pub use imgw::ImgwClient;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::EnvMapConfig;
use crate::error::{EnvMapError, EnvMapResult};
use crate::models::{
    AqMeasurement, Hydro2Measurement, HydroMeasurement, MeteoMeasurement, SynopMeasurement,
};

/// Everything the refresh cycle needs from the outside world
#[async_trait]
pub trait MeasurementFeed: Send + Sync {
    async fn hydro(&self) -> Result<Vec<HydroMeasurement>>;
    async fn hydro2(&self) -> Result<Vec<Hydro2Measurement>>;
    async fn synop(&self) -> Result<Vec<SynopMeasurement>>;
    async fn meteo(&self) -> Result<Vec<MeteoMeasurement>>;
    async fn air_quality(&self) -> Result<Vec<AqMeasurement>>;
}

/// The production feed: IMGW for hydro/synop/meteo, GIOŚ for air quality
pub struct PublicApis {
    imgw: ImgwClient,
    gios: GiosClient,
}

impl PublicApis {
    pub fn new(config: &EnvMapConfig) -> Result<Self> {
        let client = http_client(config)?;
        Ok(Self {
            imgw: ImgwClient::new(client.clone(), &config.imgw_base_url),
            gios: GiosClient::new(client, &config.gios_base_url, config.gios_requests_per_second),
        })
    }
}

#[async_trait]
impl MeasurementFeed for PublicApis {
    async fn hydro(&self) -> Result<Vec<HydroMeasurement>> {
        Ok(self.imgw.hydro().await?)
    }

    async fn hydro2(&self) -> Result<Vec<Hydro2Measurement>> {
        Ok(self.imgw.hydro2().await?)
    }

    async fn synop(&self) -> Result<Vec<SynopMeasurement>> {
        Ok(self.imgw.synop().await?)
    }

    async fn meteo(&self) -> Result<Vec<MeteoMeasurement>> {
        Ok(self.imgw.meteo().await?)
    }

    async fn air_quality(&self) -> Result<Vec<AqMeasurement>> {
        Ok(self.gios.current_measurements().await?)
    }
}

pub fn http_client(config: &EnvMapConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(concat!("polish-env-map/", env!("CARGO_PKG_VERSION")))
        .timeout(config.request_timeout)
        .build()?;
    Ok(client)
}

/// GET a JSON document, mapping transport and status failures to
/// `EnvMapError`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    source_name: &'static str,
) -> EnvMapResult<T> {
    debug!("GET {}", url);

    let response = client
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| EnvMapError::request(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(EnvMapError::UpstreamStatus {
            source_name,
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| EnvMapError::request(url, e))
}

/// Decode rows one at a time so a single malformed row is skipped instead
/// of failing the whole feed.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>, feed: &str) -> Vec<T> {
    let total = rows.len();
    let decoded: Vec<T> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(i, row)| match serde_json::from_value::<T>(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping malformed {} row #{}: {}", feed, i, e);
                None
            }
        })
        .collect();

    if decoded.len() < total {
        warn!("Decoded {} of {} {} rows", decoded.len(), total, feed);
    }
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_rows_skips_malformed() {
        let rows = vec![
            json!({ "kod_stacji": "1", "nazwa_stacji": "A", "stan": "10" }),
            json!({ "nazwa_stacji": "no code" }),
            json!("not an object"),
            json!({ "kod_stacji": 2, "stan": null }),
        ];

        let records: Vec<Hydro2Measurement> = decode_rows(rows, "hydro2");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].level, Some(10.0));
        assert_eq!(records[1].station_code, "2");
    }
}

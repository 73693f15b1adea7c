//! IMGW public data API (`danepubliczne.imgw.pl`)

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use super::{decode_rows, get_json};
use crate::error::EnvMapResult;
use crate::models::{Hydro2Measurement, HydroMeasurement, MeteoMeasurement, SynopMeasurement};

const SOURCE: &str = "IMGW";

pub struct ImgwClient {
    client: Client,
    base_url: String,
}

impl ImgwClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn feed<T: DeserializeOwned>(&self, endpoint: &str, feed: &str) -> EnvMapResult<Vec<T>> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let rows: Vec<Value> = get_json(&self.client, &url, SOURCE).await?;
        let records = decode_rows(rows, feed);
        info!("Fetched {} {} records", records.len(), feed);
        Ok(records)
    }

    pub async fn hydro(&self) -> EnvMapResult<Vec<HydroMeasurement>> {
        self.feed("hydro", "hydro").await
    }

    pub async fn hydro2(&self) -> EnvMapResult<Vec<Hydro2Measurement>> {
        self.feed("hydro2", "hydro2").await
    }

    pub async fn synop(&self) -> EnvMapResult<Vec<SynopMeasurement>> {
        self.feed("synop", "synop").await
    }

    /// The meteo endpoint only answers with the trailing slash.
    pub async fn meteo(&self) -> EnvMapResult<Vec<MeteoMeasurement>> {
        self.feed("meteo/", "meteo").await
    }
}

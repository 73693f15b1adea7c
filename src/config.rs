//! Configuration
//!
//! Defaults, overridden by `ENVMAP_*` environment variables (a `.env` file is
//! loaded first by the binary), then by command-line flags.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const IMGW_BASE_URL: &str = "https://danepubliczne.imgw.pl/api/data";
pub const GIOS_BASE_URL: &str = "https://api.gios.gov.pl/pjp-api/rest";

/// Runtime configuration for fetching, caching and serving
#[derive(Debug, Clone, PartialEq)]
pub struct EnvMapConfig {
    /// SQLite file holding the five measurement tables
    pub database_path: PathBuf,
    /// Hydro station lookup file (`kody_stacji_hydro.csv`)
    pub hydro_coordinates_path: PathBuf,
    /// Synop station lookup file (`kody_stacji_synop.csv`)
    pub synop_coordinates_path: PathBuf,
    pub imgw_base_url: String,
    pub gios_base_url: String,
    pub request_timeout: Duration,
    /// Upper bound on requests per second sent to the air-quality API
    pub gios_requests_per_second: u32,
    pub bind_address: String,
    pub map_center: (f64, f64),
    pub map_zoom: u8,
}

impl Default for EnvMapConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("envmap.sqlite"),
            hydro_coordinates_path: PathBuf::from("data/kody_stacji_hydro.csv"),
            synop_coordinates_path: PathBuf::from("data/kody_stacji_synop.csv"),
            imgw_base_url: IMGW_BASE_URL.to_string(),
            gios_base_url: GIOS_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            gios_requests_per_second: 5,
            bind_address: "127.0.0.1:8080".to_string(),
            map_center: (52.2297, 21.0122),
            map_zoom: 12,
        }
    }
}

impl EnvMapConfig {
    /// Defaults with any `ENVMAP_*` variables applied
    pub fn from_env() -> Self {
        Self::default().apply_env(|key| env::var(key).ok())
    }

    /// Apply overrides from a variable source. Unparseable values are logged
    /// and ignored.
    pub fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("ENVMAP_DATABASE_PATH") {
            self.database_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("ENVMAP_HYDRO_COORDINATES") {
            self.hydro_coordinates_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("ENVMAP_SYNOP_COORDINATES") {
            self.synop_coordinates_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("ENVMAP_IMGW_BASE_URL") {
            self.imgw_base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("ENVMAP_GIOS_BASE_URL") {
            self.gios_base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(secs) = parsed::<u64>(&lookup, "ENVMAP_REQUEST_TIMEOUT_SECS") {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(rps) = parsed::<u32>(&lookup, "ENVMAP_GIOS_REQUESTS_PER_SECOND") {
            self.gios_requests_per_second = rps;
        }
        if let Some(v) = lookup("ENVMAP_BIND_ADDRESS") {
            self.bind_address = v;
        }
        if let Some(lat) = parsed::<f64>(&lookup, "ENVMAP_MAP_CENTER_LAT") {
            self.map_center.0 = lat;
        }
        if let Some(lon) = parsed::<f64>(&lookup, "ENVMAP_MAP_CENTER_LON") {
            self.map_center.1 = lon;
        }
        if let Some(zoom) = parsed::<u8>(&lookup, "ENVMAP_MAP_ZOOM") {
            self.map_zoom = zoom;
        }
        self
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}: cannot parse '{}'", key, raw);
            None
        }
    }
}

//! Measurement Models
//!
//! Flat records for the five station categories. Records are fetched,
//! overwritten wholesale on each refresh, and read back for rendering.

mod air_quality;
mod hydro;
mod meteo;
mod synop;

pub use air_quality::{normalize_code, AqMeasurement, AqParameter, Pollutant, OVERALL_INDEX_PARAMETER};
pub use hydro::{Hydro2Measurement, HydroMeasurement};
pub use meteo::MeteoMeasurement;
pub use synop::SynopMeasurement;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EnvMapError;

/// Label used when a record carries no station name
pub const UNKNOWN_STATION: &str = "Niezn. stacja";

/// The five measurement categories shown on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationKind {
    Hydro,
    Hydro2,
    Synop,
    Meteo,
    Aq,
}

impl StationKind {
    pub const ALL: [StationKind; 5] = [
        StationKind::Hydro,
        StationKind::Hydro2,
        StationKind::Synop,
        StationKind::Meteo,
        StationKind::Aq,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            StationKind::Hydro => "hydro",
            StationKind::Hydro2 => "hydro2",
            StationKind::Synop => "synop",
            StationKind::Meteo => "meteo",
            StationKind::Aq => "aq",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StationKind::Hydro => "Hydrologiczna",
            StationKind::Hydro2 => "Hydrologiczna 2",
            StationKind::Synop => "Synoptyczna",
            StationKind::Meteo => "Meteorologiczna",
            StationKind::Aq => "Jakość powietrza",
        }
    }

    /// Marker colour on the map
    pub fn color(&self) -> &'static str {
        match self {
            StationKind::Hydro => "#0066cc",
            StationKind::Hydro2 => "#0099ff",
            StationKind::Synop => "#ff6600",
            StationKind::Meteo => "#00cc66",
            StationKind::Aq => "#95A5A6",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            StationKind::Hydro => "💧",
            StationKind::Hydro2 => "🌊",
            StationKind::Synop => "🌤️",
            StationKind::Meteo => "🌡️",
            StationKind::Aq => "🌫️",
        }
    }

    /// Name of the local cache table holding this kind
    pub fn table(&self) -> &'static str {
        match self {
            StationKind::Hydro => "hydro_measurements",
            StationKind::Hydro2 => "hydro2_measurements",
            StationKind::Synop => "synop_measurements",
            StationKind::Meteo => "meteo_measurements",
            StationKind::Aq => "aq_measurements",
        }
    }
}

impl fmt::Display for StationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for StationKind {
    type Err = EnvMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        StationKind::ALL
            .into_iter()
            .find(|kind| kind.key() == lowered)
            .ok_or_else(|| EnvMapError::UnknownKind(s.to_string()))
    }
}

/// Common view over the per-kind records
pub trait Station {
    const KIND: StationKind;

    fn station_id(&self) -> &str;
    fn station_name(&self) -> Option<&str>;
    fn latitude(&self) -> Option<f64>;
    fn longitude(&self) -> Option<f64>;

    /// Name for display, falling back to a placeholder
    fn display_name(&self) -> &str {
        self.station_name().unwrap_or(UNKNOWN_STATION)
    }

    /// A record is placeable only with both coordinates present and non-zero.
    fn position(&self) -> Option<(f64, f64)> {
        match (self.latitude(), self.longitude()) {
            (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Everything currently held in the local cache
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub hydro: Vec<HydroMeasurement>,
    pub hydro2: Vec<Hydro2Measurement>,
    pub synop: Vec<SynopMeasurement>,
    pub meteo: Vec<MeteoMeasurement>,
    pub aq: Vec<AqMeasurement>,
}

impl Snapshot {
    pub fn count(&self, kind: StationKind) -> usize {
        match kind {
            StationKind::Hydro => self.hydro.len(),
            StationKind::Hydro2 => self.hydro2.len(),
            StationKind::Synop => self.synop.len(),
            StationKind::Meteo => self.meteo.len(),
            StationKind::Aq => self.aq.len(),
        }
    }

    pub fn total(&self) -> usize {
        StationKind::ALL.iter().map(|k| self.count(*k)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

//! Map Filters
//!
//! Multi-criteria filtering of the cached measurements: a visibility toggle
//! per station kind, inclusive numeric ranges, hydro phenomenon selections
//! and required pollutants for air-quality stations.

mod phenomena;

pub use phenomena::{ice_description, GrowthCode, ICE_PHENOMENA};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{
    AqMeasurement, Hydro2Measurement, HydroMeasurement, MeteoMeasurement, Pollutant, Snapshot,
    StationKind, SynopMeasurement,
};

/// Records left after filtering; per-kind counts come from `Snapshot::count`
pub type FilteredSnapshot = Snapshot;

/// Inclusive numeric range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeFilter {
    pub min: f64,
    pub max: f64,
}

impl RangeFilter {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// A missing reading never hides a station.
    pub fn admits(&self, value: Option<f64>) -> bool {
        value.map_or(true, |v| self.contains(v))
    }
}

/// Every range the filter panel exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeKey {
    HydroTemperature,
    HydroWaterLevel,
    SynopTemperature,
    Pressure,
    SynopWindSpeed,
    SynopHumidity,
    SynopPrecipitation,
    MeteoTemperature,
    MeteoWindSpeed,
    MeteoHumidity,
    MeteoPrecipitation,
    Hydro2WaterLevel,
    Flow,
    AqIndex,
}

impl RangeKey {
    pub const ALL: [RangeKey; 14] = [
        RangeKey::HydroTemperature,
        RangeKey::HydroWaterLevel,
        RangeKey::SynopTemperature,
        RangeKey::Pressure,
        RangeKey::SynopWindSpeed,
        RangeKey::SynopHumidity,
        RangeKey::SynopPrecipitation,
        RangeKey::MeteoTemperature,
        RangeKey::MeteoWindSpeed,
        RangeKey::MeteoHumidity,
        RangeKey::MeteoPrecipitation,
        RangeKey::Hydro2WaterLevel,
        RangeKey::Flow,
        RangeKey::AqIndex,
    ];

    /// Full allowed span, which is also the reset value
    pub fn bounds(&self) -> RangeFilter {
        match self {
            RangeKey::HydroTemperature
            | RangeKey::SynopTemperature
            | RangeKey::MeteoTemperature => RangeFilter::new(-50.0, 50.0),
            RangeKey::HydroWaterLevel | RangeKey::Hydro2WaterLevel => RangeFilter::new(-500.0, 1000.0),
            RangeKey::Pressure => RangeFilter::new(900.0, 1100.0),
            RangeKey::SynopWindSpeed | RangeKey::MeteoWindSpeed => RangeFilter::new(0.0, 50.0),
            RangeKey::SynopHumidity | RangeKey::MeteoHumidity => RangeFilter::new(0.0, 100.0),
            RangeKey::SynopPrecipitation | RangeKey::MeteoPrecipitation => RangeFilter::new(0.0, 200.0),
            RangeKey::Flow => RangeFilter::new(0.0, 10000.0),
            RangeKey::AqIndex => RangeFilter::new(0.0, 5.0),
        }
    }

    pub fn kind(&self) -> StationKind {
        match self {
            RangeKey::HydroTemperature | RangeKey::HydroWaterLevel => StationKind::Hydro,
            RangeKey::Hydro2WaterLevel | RangeKey::Flow => StationKind::Hydro2,
            RangeKey::SynopTemperature
            | RangeKey::Pressure
            | RangeKey::SynopWindSpeed
            | RangeKey::SynopHumidity
            | RangeKey::SynopPrecipitation => StationKind::Synop,
            RangeKey::MeteoTemperature
            | RangeKey::MeteoWindSpeed
            | RangeKey::MeteoHumidity
            | RangeKey::MeteoPrecipitation => StationKind::Meteo,
            RangeKey::AqIndex => StationKind::Aq,
        }
    }
}

/// Complete filter panel state. The default shows everything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub show_hydro: bool,
    pub show_hydro2: bool,
    pub show_synop: bool,
    pub show_meteo: bool,
    pub show_aq: bool,

    pub hydro_temperature: RangeFilter,
    pub hydro_water_level: RangeFilter,
    pub synop_temperature: RangeFilter,
    pub pressure: RangeFilter,
    pub synop_wind_speed: RangeFilter,
    pub synop_humidity: RangeFilter,
    pub synop_precipitation: RangeFilter,
    pub meteo_temperature: RangeFilter,
    pub meteo_wind_speed: RangeFilter,
    pub meteo_humidity: RangeFilter,
    pub meteo_precipitation: RangeFilter,
    pub hydro2_water_level: RangeFilter,
    pub flow: RangeFilter,
    pub aq_index: RangeFilter,

    /// Empty means any river
    pub selected_river: String,
    /// Ice phenomenon code such as `"04"`; empty means any
    pub selected_ice_phenomenon: String,
    /// Overgrowth code such as `"112"`; empty means any
    pub selected_growth_phenomenon: String,
    pub only_with_ice: bool,
    pub only_with_growth: bool,

    /// Pollutants an air-quality station must have a measured value for
    pub required_pollutants: BTreeSet<Pollutant>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            show_hydro: true,
            show_hydro2: true,
            show_synop: true,
            show_meteo: true,
            show_aq: true,
            hydro_temperature: RangeKey::HydroTemperature.bounds(),
            hydro_water_level: RangeKey::HydroWaterLevel.bounds(),
            synop_temperature: RangeKey::SynopTemperature.bounds(),
            pressure: RangeKey::Pressure.bounds(),
            synop_wind_speed: RangeKey::SynopWindSpeed.bounds(),
            synop_humidity: RangeKey::SynopHumidity.bounds(),
            synop_precipitation: RangeKey::SynopPrecipitation.bounds(),
            meteo_temperature: RangeKey::MeteoTemperature.bounds(),
            meteo_wind_speed: RangeKey::MeteoWindSpeed.bounds(),
            meteo_humidity: RangeKey::MeteoHumidity.bounds(),
            meteo_precipitation: RangeKey::MeteoPrecipitation.bounds(),
            hydro2_water_level: RangeKey::Hydro2WaterLevel.bounds(),
            flow: RangeKey::Flow.bounds(),
            aq_index: RangeKey::AqIndex.bounds(),
            selected_river: String::new(),
            selected_ice_phenomenon: String::new(),
            selected_growth_phenomenon: String::new(),
            only_with_ice: false,
            only_with_growth: false,
            required_pollutants: BTreeSet::new(),
        }
    }
}

impl FilterState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_visible(&self, kind: StationKind) -> bool {
        match kind {
            StationKind::Hydro => self.show_hydro,
            StationKind::Hydro2 => self.show_hydro2,
            StationKind::Synop => self.show_synop,
            StationKind::Meteo => self.show_meteo,
            StationKind::Aq => self.show_aq,
        }
    }

    pub fn set_visible(&mut self, kind: StationKind, visible: bool) {
        match kind {
            StationKind::Hydro => self.show_hydro = visible,
            StationKind::Hydro2 => self.show_hydro2 = visible,
            StationKind::Synop => self.show_synop = visible,
            StationKind::Meteo => self.show_meteo = visible,
            StationKind::Aq => self.show_aq = visible,
        }
    }

    pub fn range(&self, key: RangeKey) -> &RangeFilter {
        match key {
            RangeKey::HydroTemperature => &self.hydro_temperature,
            RangeKey::HydroWaterLevel => &self.hydro_water_level,
            RangeKey::SynopTemperature => &self.synop_temperature,
            RangeKey::Pressure => &self.pressure,
            RangeKey::SynopWindSpeed => &self.synop_wind_speed,
            RangeKey::SynopHumidity => &self.synop_humidity,
            RangeKey::SynopPrecipitation => &self.synop_precipitation,
            RangeKey::MeteoTemperature => &self.meteo_temperature,
            RangeKey::MeteoWindSpeed => &self.meteo_wind_speed,
            RangeKey::MeteoHumidity => &self.meteo_humidity,
            RangeKey::MeteoPrecipitation => &self.meteo_precipitation,
            RangeKey::Hydro2WaterLevel => &self.hydro2_water_level,
            RangeKey::Flow => &self.flow,
            RangeKey::AqIndex => &self.aq_index,
        }
    }

    fn range_mut(&mut self, key: RangeKey) -> &mut RangeFilter {
        match key {
            RangeKey::HydroTemperature => &mut self.hydro_temperature,
            RangeKey::HydroWaterLevel => &mut self.hydro_water_level,
            RangeKey::SynopTemperature => &mut self.synop_temperature,
            RangeKey::Pressure => &mut self.pressure,
            RangeKey::SynopWindSpeed => &mut self.synop_wind_speed,
            RangeKey::SynopHumidity => &mut self.synop_humidity,
            RangeKey::SynopPrecipitation => &mut self.synop_precipitation,
            RangeKey::MeteoTemperature => &mut self.meteo_temperature,
            RangeKey::MeteoWindSpeed => &mut self.meteo_wind_speed,
            RangeKey::MeteoHumidity => &mut self.meteo_humidity,
            RangeKey::MeteoPrecipitation => &mut self.meteo_precipitation,
            RangeKey::Hydro2WaterLevel => &mut self.hydro2_water_level,
            RangeKey::Flow => &mut self.flow,
            RangeKey::AqIndex => &mut self.aq_index,
        }
    }

    /// Move the lower bound, kept inside the allowed span and at least one
    /// unit below the upper bound.
    pub fn set_range_min(&mut self, key: RangeKey, value: f64) {
        let bounds = key.bounds();
        let range = self.range_mut(key);
        range.min = value.max(bounds.min).min(range.max - 1.0);
    }

    /// Move the upper bound, kept inside the allowed span and at least one
    /// unit above the lower bound.
    pub fn set_range_max(&mut self, key: RangeKey, value: f64) {
        let bounds = key.bounds();
        let range = self.range_mut(key);
        range.max = value.min(bounds.max).max(range.min + 1.0);
    }

    pub fn require(&mut self, pollutant: Pollutant, required: bool) {
        if required {
            self.required_pollutants.insert(pollutant);
        } else {
            self.required_pollutants.remove(&pollutant);
        }
    }

    pub fn matches_hydro(&self, m: &HydroMeasurement) -> bool {
        if !self.show_hydro {
            return false;
        }
        if !self.selected_river.trim().is_empty() {
            let wanted = self.selected_river.trim().to_lowercase();
            if m.river.as_deref().map(str::to_lowercase) != Some(wanted) {
                return false;
            }
        }
        if self.only_with_ice && !m.has_ice() {
            return false;
        }
        if self.only_with_growth && !m.has_overgrowth() {
            return false;
        }
        if !code_matches(&self.selected_ice_phenomenon, m.ice_phenomenon) {
            return false;
        }
        if !code_matches(&self.selected_growth_phenomenon, m.overgrowth) {
            return false;
        }
        self.hydro_temperature.admits(m.water_temperature)
            && self.hydro_water_level.admits(m.water_level)
    }

    pub fn matches_hydro2(&self, m: &Hydro2Measurement) -> bool {
        self.show_hydro2 && self.hydro2_water_level.admits(m.level) && self.flow.admits(m.flow)
    }

    pub fn matches_synop(&self, m: &SynopMeasurement) -> bool {
        self.show_synop
            && self.synop_temperature.admits(m.temperature)
            && self.pressure.admits(m.pressure)
            && self.synop_wind_speed.admits(m.wind_speed)
            && self.synop_humidity.admits(m.relative_humidity)
            && self.synop_precipitation.admits(m.precipitation)
    }

    pub fn matches_meteo(&self, m: &MeteoMeasurement) -> bool {
        self.show_meteo
            && self.meteo_temperature.admits(m.ground_temperature)
            && self.meteo_wind_speed.admits(m.wind_avg_speed)
            && self.meteo_humidity.admits(m.relative_humidity)
            && self.meteo_precipitation.admits(m.precipitation_10min)
    }

    pub fn matches_aq(&self, m: &AqMeasurement) -> bool {
        if !self.show_aq {
            return false;
        }
        if !self.aq_index.admits(m.overall_index().map(f64::from)) {
            return false;
        }
        self.required_pollutants
            .iter()
            .all(|p| m.measured(*p).is_some())
    }

    /// Records that pass the filter, per kind
    pub fn apply(&self, snapshot: &Snapshot) -> FilteredSnapshot {
        FilteredSnapshot {
            hydro: keep(&snapshot.hydro, |m| self.matches_hydro(m)),
            hydro2: keep(&snapshot.hydro2, |m| self.matches_hydro2(m)),
            synop: keep(&snapshot.synop, |m| self.matches_synop(m)),
            meteo: keep(&snapshot.meteo, |m| self.matches_meteo(m)),
            aq: keep(&snapshot.aq, |m| self.matches_aq(m)),
        }
    }
}

fn keep<T: Clone>(records: &[T], predicate: impl Fn(&T) -> bool) -> Vec<T> {
    records.iter().filter(|r| predicate(r)).cloned().collect()
}

/// An empty selection matches anything; otherwise the numeric code must
/// equal the record's code (`"04"` matches 4).
fn code_matches(selected: &str, actual: Option<u32>) -> bool {
    let selected = selected.trim();
    if selected.is_empty() {
        return true;
    }
    match selected.parse::<u32>() {
        Ok(code) => actual == Some(code),
        Err(_) => false,
    }
}

/// Values offered by the filter panel's drop-downs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub rivers: Vec<String>,
    pub growth_phenomena: Vec<CodeOption>,
    pub ice_phenomena: Vec<CodeOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeOption {
    pub code: String,
    pub description: String,
}

impl FilterOptions {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let rivers: BTreeSet<String> = snapshot
            .hydro
            .iter()
            .filter_map(|m| m.river.clone())
            .filter(|r| !r.trim().is_empty())
            .collect();

        let growth: BTreeSet<u32> = snapshot
            .hydro
            .iter()
            .filter_map(|m| m.overgrowth)
            .filter(|c| *c != 0)
            .collect();

        Self {
            rivers: rivers.into_iter().collect(),
            growth_phenomena: growth
                .into_iter()
                .map(|code| CodeOption {
                    code: code.to_string(),
                    description: GrowthCode::decode(code)
                        .map(|g| g.describe())
                        .unwrap_or_default(),
                })
                .collect(),
            ice_phenomena: ICE_PHENOMENA
                .iter()
                .map(|(code, desc)| CodeOption {
                    code: code.to_string(),
                    description: desc.to_string(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_boundaries_are_inclusive() {
        let range = RangeFilter::new(-50.0, 50.0);
        assert!(range.contains(-50.0));
        assert!(range.contains(50.0));
        assert!(!range.contains(50.01));
        assert!(!range.contains(-50.01));
        assert!(range.admits(None));
    }

    #[test]
    fn test_range_editing_keeps_bounds_apart() {
        let mut filters = FilterState::default();

        filters.set_range_max(RangeKey::Pressure, 1000.0);
        filters.set_range_min(RangeKey::Pressure, 1005.0);
        assert_eq!(*filters.range(RangeKey::Pressure), RangeFilter::new(999.0, 1000.0));

        filters.set_range_max(RangeKey::Pressure, 500.0);
        assert_eq!(filters.pressure.max, 1000.0);

        filters.set_range_min(RangeKey::Flow, -20.0);
        assert_eq!(filters.flow.min, 0.0);
    }

    #[test]
    fn test_code_selection() {
        assert!(code_matches("", None));
        assert!(code_matches("04", Some(4)));
        assert!(!code_matches("04", Some(5)));
        assert!(!code_matches("04", None));
        assert!(!code_matches("xx", Some(4)));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let filters: FilterState =
            serde_json::from_str(r#"{ "show_aq": false, "pressure": { "min": 950, "max": 1050 } }"#)
                .unwrap();
        assert!(!filters.show_aq);
        assert!(filters.show_hydro);
        assert_eq!(filters.pressure, RangeFilter::new(950.0, 1050.0));
        assert_eq!(filters.flow, RangeKey::Flow.bounds());
    }

    #[test]
    fn test_required_pollutant_needs_a_measured_value() {
        use crate::models::AqParameter;

        let param = |code: &str, value: Option<f64>| AqParameter {
            parameter: code.to_string(),
            index_value: 1,
            index_text: "Dobry".to_string(),
            measurement_value: value,
            measurement_unit: None,
            last_updated: None,
        };
        let station = AqMeasurement {
            location_id: "1".into(),
            location: "Kraków".into(),
            lat: Some(50.0),
            lon: Some(19.9),
            parameters: vec![param("PM10", Some(31.0)), param("NO2", None)],
        };

        let mut filters = FilterState::default();
        filters.require(Pollutant::Pm10, true);
        assert!(filters.matches_aq(&station));

        filters.require(Pollutant::No2, true);
        assert!(!filters.matches_aq(&station));

        filters.require(Pollutant::No2, false);
        filters.show_aq = false;
        assert!(!filters.matches_aq(&station));
    }

    #[test]
    fn test_every_range_key_has_its_kind_visible_by_default() {
        let filters = FilterState::default();
        for key in RangeKey::ALL {
            assert!(filters.is_visible(key.kind()));
            assert_eq!(*filters.range(key), key.bounds());
        }
    }
}

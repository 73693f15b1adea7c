//! Hydrological station records (IMGW `hydro` and `hydro2` feeds)

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Station, StationKind};
use crate::utils::lenient;

/// River gauge reading from the `hydro` feed. Coordinates are not part of the
/// payload; they are attached from the hydro lookup file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HydroMeasurement {
    #[serde(rename(deserialize = "id_stacji"), deserialize_with = "lenient::id")]
    pub station_id: String,
    #[serde(rename(deserialize = "stacja"), default, deserialize_with = "lenient::text")]
    pub station_name: Option<String>,
    #[serde(rename(deserialize = "rzeka"), default, deserialize_with = "lenient::text")]
    pub river: Option<String>,
    #[serde(rename(deserialize = "województwo"), default, deserialize_with = "lenient::text")]
    pub voivodeship: Option<String>,
    /// Water level in cm
    #[serde(rename(deserialize = "stan_wody"), default, deserialize_with = "lenient::number")]
    pub water_level: Option<f64>,
    #[serde(rename(deserialize = "stan_wody_data_pomiaru"), default, deserialize_with = "lenient::timestamp")]
    pub water_level_at: Option<NaiveDateTime>,
    /// Water temperature in °C
    #[serde(rename(deserialize = "temperatura_wody"), default, deserialize_with = "lenient::number")]
    pub water_temperature: Option<f64>,
    #[serde(rename(deserialize = "temperatura_wody_data_pomiaru"), default, deserialize_with = "lenient::timestamp")]
    pub water_temperature_at: Option<NaiveDateTime>,
    /// Ice phenomenon code, 0 when no ice is reported
    #[serde(rename(deserialize = "zjawisko_lodowe"), default, deserialize_with = "lenient::code")]
    pub ice_phenomenon: Option<u32>,
    #[serde(rename(deserialize = "zjawisko_lodowe_data_pomiaru"), default, deserialize_with = "lenient::timestamp")]
    pub ice_phenomenon_at: Option<NaiveDateTime>,
    /// Overgrowth code in `dpw` notation, 0 when none
    #[serde(rename(deserialize = "zjawisko_zarastania"), default, deserialize_with = "lenient::code")]
    pub overgrowth: Option<u32>,
    #[serde(rename(deserialize = "zjawisko_zarastania_data_pomiaru"), default, deserialize_with = "lenient::timestamp")]
    pub overgrowth_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lon: Option<f64>,
}

impl HydroMeasurement {
    pub fn has_ice(&self) -> bool {
        self.ice_phenomenon.is_some_and(|code| code != 0)
    }

    pub fn has_overgrowth(&self) -> bool {
        self.overgrowth.is_some_and(|code| code != 0)
    }
}

impl Station for HydroMeasurement {
    const KIND: StationKind = StationKind::Hydro;

    fn station_id(&self) -> &str {
        &self.station_id
    }

    fn station_name(&self) -> Option<&str> {
        self.station_name.as_deref()
    }

    fn latitude(&self) -> Option<f64> {
        self.lat
    }

    fn longitude(&self) -> Option<f64> {
        self.lon
    }
}

/// Gauge reading from the `hydro2` feed, which carries its own coordinates
/// and adds discharge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hydro2Measurement {
    #[serde(rename(deserialize = "kod_stacji"), deserialize_with = "lenient::id")]
    pub station_code: String,
    #[serde(rename(deserialize = "nazwa_stacji"), default, deserialize_with = "lenient::text")]
    pub station_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lon: Option<f64>,
    /// Water level in cm
    #[serde(rename(deserialize = "stan"), default, deserialize_with = "lenient::number")]
    pub level: Option<f64>,
    #[serde(rename(deserialize = "stan_data"), default, deserialize_with = "lenient::timestamp")]
    pub level_at: Option<NaiveDateTime>,
    /// Discharge in m³/s. The upstream key really is spelled `przelyw`.
    #[serde(rename(deserialize = "przelyw"), alias = "przeplyw", default, deserialize_with = "lenient::number")]
    pub flow: Option<f64>,
    #[serde(rename(deserialize = "przeplyw_data"), default, deserialize_with = "lenient::timestamp")]
    pub flow_at: Option<NaiveDateTime>,
}

impl Station for Hydro2Measurement {
    const KIND: StationKind = StationKind::Hydro2;

    fn station_id(&self) -> &str {
        &self.station_code
    }

    fn station_name(&self) -> Option<&str> {
        self.station_name.as_deref()
    }

    fn latitude(&self) -> Option<f64> {
        self.lat
    }

    fn longitude(&self) -> Option<f64> {
        self.lon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hydro_payload_with_string_numbers() {
        let payload = json!({
            "id_stacji": "150160180",
            "stacja": "Krzyżanowice",
            "rzeka": "Odra",
            "województwo": "śląskie",
            "stan_wody": "190",
            "stan_wody_data_pomiaru": "2024-03-01 12:00:00",
            "temperatura_wody": null,
            "temperatura_wody_data_pomiaru": null,
            "zjawisko_lodowe": "0",
            "zjawisko_lodowe_data_pomiaru": null,
            "zjawisko_zarastania": "112",
            "zjawisko_zarastania_data_pomiaru": "2024-02-28 07:00:00"
        });

        let record: HydroMeasurement = serde_json::from_value(payload).unwrap();
        assert_eq!(record.station_id, "150160180");
        assert_eq!(record.river.as_deref(), Some("Odra"));
        assert_eq!(record.water_level, Some(190.0));
        assert_eq!(record.water_temperature, None);
        assert!(!record.has_ice());
        assert!(record.has_overgrowth());
        assert!(record.position().is_none());
    }

    #[test]
    fn test_hydro2_payload_carries_coordinates() {
        let payload = json!({
            "kod_stacji": 149180020,
            "nazwa_stacji": "Chałupki",
            "lon": "18.327778",
            "lat": "49.920556",
            "stan": "201",
            "stan_data": "2024-03-01 12:10:00",
            "przelyw": "33.5",
            "przeplyw_data": "2024-03-01 12:10:00"
        });

        let record: Hydro2Measurement = serde_json::from_value(payload).unwrap();
        assert_eq!(record.station_code, "149180020");
        assert_eq!(record.flow, Some(33.5));
        assert_eq!(record.position(), Some((49.920556, 18.327778)));
    }

    #[test]
    fn test_missing_station_id_is_rejected() {
        let payload = json!({ "stacja": "Bez numeru" });
        assert!(serde_json::from_value::<HydroMeasurement>(payload).is_err());
    }
}

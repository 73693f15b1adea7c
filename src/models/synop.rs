//! Synoptic station records (IMGW `synop` feed)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Station, StationKind};
use crate::utils::lenient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynopMeasurement {
    /// WMO-style id, e.g. `12295`. The lookup file keys stations by the
    /// id without its two-digit block prefix.
    #[serde(rename(deserialize = "id_stacji"), deserialize_with = "lenient::id")]
    pub station_id: String,
    #[serde(rename(deserialize = "stacja"), default, deserialize_with = "lenient::text")]
    pub station_name: Option<String>,
    #[serde(rename(deserialize = "data_pomiaru"), default, deserialize_with = "lenient::date")]
    pub measured_on: Option<NaiveDate>,
    #[serde(rename(deserialize = "godzina_pomiaru"), default, deserialize_with = "lenient::hour")]
    pub hour: Option<u32>,
    /// Air temperature in °C
    #[serde(rename(deserialize = "temperatura"), default, deserialize_with = "lenient::number")]
    pub temperature: Option<f64>,
    /// m/s
    #[serde(rename(deserialize = "predkosc_wiatru"), default, deserialize_with = "lenient::number")]
    pub wind_speed: Option<f64>,
    /// degrees
    #[serde(rename(deserialize = "kierunek_wiatru"), default, deserialize_with = "lenient::number")]
    pub wind_direction: Option<f64>,
    /// %
    #[serde(rename(deserialize = "wilgotnosc_wzgledna"), default, deserialize_with = "lenient::number")]
    pub relative_humidity: Option<f64>,
    /// mm
    #[serde(rename(deserialize = "suma_opadu"), default, deserialize_with = "lenient::number")]
    pub precipitation: Option<f64>,
    /// hPa
    #[serde(rename(deserialize = "cisnienie"), default, deserialize_with = "lenient::number")]
    pub pressure: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lon: Option<f64>,
}

impl SynopMeasurement {
    /// Key used in the synop coordinate lookup file
    pub fn lookup_code(&self) -> &str {
        self.station_id.get(2..).unwrap_or("")
    }
}

impl Station for SynopMeasurement {
    const KIND: StationKind = StationKind::Synop;

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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_synop_payload() {
        let payload = json!({
            "id_stacji": "12295",
            "stacja": "Białystok",
            "data_pomiaru": "2024-03-01",
            "godzina_pomiaru": "12",
            "temperatura": "4.6",
            "predkosc_wiatru": "3",
            "kierunek_wiatru": "250",
            "wilgotnosc_wzgledna": "81.2",
            "suma_opadu": "0",
            "cisnienie": null
        });

        let record: SynopMeasurement = serde_json::from_value(payload).unwrap();
        assert_eq!(record.lookup_code(), "295");
        assert_eq!(record.hour, Some(12));
        assert_eq!(record.measured_on, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(record.temperature, Some(4.6));
        assert_eq!(record.pressure, None);
    }

    #[test]
    fn test_short_id_has_empty_lookup_code() {
        let record = SynopMeasurement {
            station_id: "1".to_string(),
            ..Default::default()
        };
        assert_eq!(record.lookup_code(), "");
    }
}

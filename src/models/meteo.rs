//! Automatic meteorological station records (IMGW `meteo` feed)

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Station, StationKind};
use crate::utils::lenient;

/// Every reading carries its own timestamp because the sensors report
/// independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeteoMeasurement {
    #[serde(rename(deserialize = "kod_stacji"), deserialize_with = "lenient::id")]
    pub station_code: String,
    #[serde(rename(deserialize = "nazwa_stacji"), default, deserialize_with = "lenient::text")]
    pub station_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub lon: Option<f64>,
    #[serde(rename(deserialize = "temperatura_gruntu"), default, deserialize_with = "lenient::number")]
    pub ground_temperature: Option<f64>,
    #[serde(rename(deserialize = "temperatura_gruntu_data"), default, deserialize_with = "lenient::timestamp")]
    pub ground_temperature_at: Option<NaiveDateTime>,
    #[serde(rename(deserialize = "wiatr_kierunek"), default, deserialize_with = "lenient::number")]
    pub wind_direction: Option<f64>,
    #[serde(rename(deserialize = "wiatr_kierunek_data"), default, deserialize_with = "lenient::timestamp")]
    pub wind_direction_at: Option<NaiveDateTime>,
    #[serde(rename(deserialize = "wiatr_srednia_predkosc"), default, deserialize_with = "lenient::number")]
    pub wind_avg_speed: Option<f64>,
    #[serde(rename(deserialize = "wiatr_srednia_predkosc_data"), default, deserialize_with = "lenient::timestamp")]
    pub wind_avg_speed_at: Option<NaiveDateTime>,
    #[serde(rename(deserialize = "wiatr_predkosc_maksymalna"), default, deserialize_with = "lenient::number")]
    pub wind_max_speed: Option<f64>,
    #[serde(rename(deserialize = "wiatr_predkosc_maksymalna_data"), default, deserialize_with = "lenient::timestamp")]
    pub wind_max_speed_at: Option<NaiveDateTime>,
    #[serde(rename(deserialize = "wilgotnosc_wzgledna"), default, deserialize_with = "lenient::number")]
    pub relative_humidity: Option<f64>,
    #[serde(rename(deserialize = "wilgotnosc_wzgledna_data"), default, deserialize_with = "lenient::timestamp")]
    pub relative_humidity_at: Option<NaiveDateTime>,
    #[serde(rename(deserialize = "wiatr_poryw_10min"), default, deserialize_with = "lenient::number")]
    pub wind_gust_10min: Option<f64>,
    #[serde(rename(deserialize = "wiatr_poryw_10min_data"), default, deserialize_with = "lenient::timestamp")]
    pub wind_gust_10min_at: Option<NaiveDateTime>,
    #[serde(rename(deserialize = "opad_10min"), default, deserialize_with = "lenient::number")]
    pub precipitation_10min: Option<f64>,
    #[serde(rename(deserialize = "opad_10min_data"), default, deserialize_with = "lenient::timestamp")]
    pub precipitation_10min_at: Option<NaiveDateTime>,
}

impl Station for MeteoMeasurement {
    const KIND: StationKind = StationKind::Meteo;

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
    use chrono::NaiveDate;
    use serde_json::json;

    fn at(h: u32, m: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2024, 3, 1).and_then(|d| d.and_hms_opt(h, m, 0))
    }

    #[test]
    fn test_meteo_payload() {
        let payload = json!({
            "kod_stacji": "249180010",
            "nazwa_stacji": "Zakopane",
            "lat": "49.2939",
            "lon": "19.9603",
            "temperatura_gruntu": "-1,4",
            "temperatura_gruntu_data": "2024-03-01 12:00:00",
            "wiatr_kierunek": "270",
            "wiatr_kierunek_data": "2024-03-01 12:10:00",
            "wiatr_srednia_predkosc": "3.2",
            "wiatr_srednia_predkosc_data": "2024-03-01 12:20:00",
            "wiatr_predkosc_maksymalna": "7.9",
            "wiatr_predkosc_maksymalna_data": "2024-03-01 12:30:00",
            "wilgotnosc_wzgledna": "88.5",
            "wilgotnosc_wzgledna_data": "2024-03-01 12:40:00",
            "wiatr_poryw_10min": "11.4",
            "wiatr_poryw_10min_data": "2024-03-01 12:50:00",
            "opad_10min": "0.2",
            "opad_10min_data": "2024-03-01 13:00:00"
        });

        let record: MeteoMeasurement = serde_json::from_value(payload).unwrap();
        assert_eq!(record.station_code, "249180010");
        assert_eq!(record.display_name(), "Zakopane");
        assert_eq!(record.position(), Some((49.2939, 19.9603)));
        assert_eq!(record.ground_temperature, Some(-1.4));
        assert_eq!(record.ground_temperature_at, at(12, 0));
        assert_eq!(record.wind_direction, Some(270.0));
        assert_eq!(record.wind_direction_at, at(12, 10));
        assert_eq!(record.wind_avg_speed, Some(3.2));
        assert_eq!(record.wind_avg_speed_at, at(12, 20));
        assert_eq!(record.wind_max_speed, Some(7.9));
        assert_eq!(record.wind_max_speed_at, at(12, 30));
        assert_eq!(record.relative_humidity, Some(88.5));
        assert_eq!(record.relative_humidity_at, at(12, 40));
        assert_eq!(record.wind_gust_10min, Some(11.4));
        assert_eq!(record.wind_gust_10min_at, at(12, 50));
        assert_eq!(record.precipitation_10min, Some(0.2));
        assert_eq!(record.precipitation_10min_at, at(13, 0));
    }

    #[test]
    fn test_meteo_payload_with_missing_readings() {
        let payload = json!({
            "kod_stacji": 350190566,
            "nazwa_stacji": "Kraków-Balice",
            "temperatura_gruntu": "",
            "opad_10min": null
        });

        let record: MeteoMeasurement = serde_json::from_value(payload).unwrap();
        assert_eq!(record.station_code, "350190566");
        assert_eq!(record.ground_temperature, None);
        assert_eq!(record.precipitation_10min, None);
        assert_eq!(record.wind_direction_at, None);
        assert!(record.position().is_none());
    }
}

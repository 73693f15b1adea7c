//! Air-quality station records (GIOŚ)

use serde::{Deserialize, Serialize};

use super::{Station, StationKind};

/// Parameter name under which the station's overall index is stored
pub const OVERALL_INDEX_PARAMETER: &str = "stIndexLevel";

/// One reading or index entry for an air-quality station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AqParameter {
    /// Upstream parameter code (`PM10`, `PM2.5`, ...) or `stIndexLevel`
    pub parameter: String,
    /// Index level id, -1 when the index has no entry for this parameter
    pub index_value: i32,
    pub index_text: String,
    pub measurement_value: Option<f64>,
    pub measurement_unit: Option<String>,
    pub last_updated: Option<String>,
}

impl AqParameter {
    pub fn is_overall_index(&self) -> bool {
        self.parameter == OVERALL_INDEX_PARAMETER
    }

    pub fn pollutant(&self) -> Option<Pollutant> {
        Pollutant::from_code(&self.parameter)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AqMeasurement {
    pub location_id: String,
    pub location: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub parameters: Vec<AqParameter>,
}

impl AqMeasurement {
    /// Overall station index level, when the index service reported one
    pub fn overall_index(&self) -> Option<i32> {
        self.parameters
            .iter()
            .find(|p| p.is_overall_index())
            .map(|p| p.index_value)
    }

    /// Reading for a pollutant that has an actual measured value
    pub fn measured(&self, pollutant: Pollutant) -> Option<&AqParameter> {
        self.parameters
            .iter()
            .find(|p| p.pollutant() == Some(pollutant) && p.measurement_value.is_some())
    }
}

impl Station for AqMeasurement {
    const KIND: StationKind = StationKind::Aq;

    fn station_id(&self) -> &str {
        &self.location_id
    }

    fn station_name(&self) -> Option<&str> {
        (!self.location.is_empty()).then_some(self.location.as_str())
    }

    fn latitude(&self) -> Option<f64> {
        self.lat
    }

    fn longitude(&self) -> Option<f64> {
        self.lon
    }
}

/// Pollutants tracked by the index service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    So2,
    No2,
    Pm10,
    Pm25,
    O3,
    Co,
    C6h6,
}

impl Pollutant {
    pub const ALL: [Pollutant; 7] = [
        Pollutant::So2,
        Pollutant::No2,
        Pollutant::Pm10,
        Pollutant::Pm25,
        Pollutant::O3,
        Pollutant::Co,
        Pollutant::C6h6,
    ];

    /// Normalized key: lowercase code without dots (`PM2.5` → `pm25`)
    pub fn key(&self) -> &'static str {
        match self {
            Pollutant::So2 => "so2",
            Pollutant::No2 => "no2",
            Pollutant::Pm10 => "pm10",
            Pollutant::Pm25 => "pm25",
            Pollutant::O3 => "o3",
            Pollutant::Co => "co",
            Pollutant::C6h6 => "c6h6",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Pollutant::Co => "mg/m³",
            _ => "µg/m³",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Pollutant::So2 => "SO₂",
            Pollutant::No2 => "NO₂",
            Pollutant::Pm10 => "PM10",
            Pollutant::Pm25 => "PM2.5",
            Pollutant::O3 => "O₃",
            Pollutant::Co => "CO",
            Pollutant::C6h6 => "C₆H₆",
        }
    }

    pub fn from_code(code: &str) -> Option<Pollutant> {
        let key = normalize_code(code);
        Pollutant::ALL.into_iter().find(|p| p.key() == key)
    }
}

/// Lowercase a parameter code and strip dots, matching the index service keys.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_lowercase().replace('.', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(code: &str, value: Option<f64>) -> AqParameter {
        AqParameter {
            parameter: code.to_string(),
            index_value: 1,
            index_text: "Dobry".to_string(),
            measurement_value: value,
            measurement_unit: Pollutant::from_code(code).map(|p| p.unit().to_string()),
            last_updated: None,
        }
    }

    #[test]
    fn test_pollutant_codes() {
        assert_eq!(Pollutant::from_code("PM2.5"), Some(Pollutant::Pm25));
        assert_eq!(Pollutant::from_code("C6H6"), Some(Pollutant::C6h6));
        assert_eq!(Pollutant::from_code("CO").map(|p| p.unit()), Some("mg/m³"));
        assert_eq!(Pollutant::from_code("stIndexLevel"), None);
    }

    #[test]
    fn test_measured_ignores_null_values() {
        let station = AqMeasurement {
            location_id: "114".to_string(),
            location: "Wrocław, ul. Bartnicza".to_string(),
            lat: Some(51.115933),
            lon: Some(17.141125),
            parameters: vec![reading("PM10", None), reading("NO2", Some(21.4))],
        };

        assert!(station.measured(Pollutant::Pm10).is_none());
        assert_eq!(
            station.measured(Pollutant::No2).and_then(|p| p.measurement_value),
            Some(21.4)
        );
        assert_eq!(station.overall_index(), None);
    }
}

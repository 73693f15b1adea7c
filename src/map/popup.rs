//! Popup HTML for map markers

use chrono::NaiveDateTime;
use html_escape::encode_text;

use crate::filter::{ice_description, GrowthCode};
use crate::models::{
    AqMeasurement, Hydro2Measurement, HydroMeasurement, MeteoMeasurement, Pollutant, Station,
    SynopMeasurement,
};
use crate::utils::lenient::TIMESTAMP_FORMAT;

/// Accumulates escaped `label: value` rows under a station heading.
pub struct PopupBuilder {
    html: String,
}

impl PopupBuilder {
    pub fn new<S: Station>(record: &S) -> Self {
        let mut html = String::from("<div class=\"station-popup\">");
        html.push_str(&format!(
            "<h4>{} {}</h4><p class=\"kind\">{}</p><table>",
            S::KIND.icon(),
            encode_text(record.display_name()),
            encode_text(S::KIND.label())
        ));
        Self { html }
    }

    pub fn row(mut self, label: &str, value: impl AsRef<str>) -> Self {
        self.html.push_str(&format!(
            "<tr><th>{}</th><td>{}</td></tr>",
            encode_text(label),
            encode_text(value.as_ref())
        ));
        self
    }

    /// Adds the row only when there is a value.
    pub fn reading(self, label: &str, value: Option<f64>, unit: &str) -> Self {
        match value {
            Some(v) => self.row(label, with_unit(v, unit)),
            None => self,
        }
    }

    pub fn timestamp(self, label: &str, at: Option<NaiveDateTime>) -> Self {
        match at {
            Some(at) => self.row(label, at.format(TIMESTAMP_FORMAT).to_string()),
            None => self,
        }
    }

    pub fn finish(mut self) -> String {
        self.html.push_str("</table></div>");
        self.html
    }
}

fn with_unit(value: f64, unit: &str) -> String {
    if unit.is_empty() {
        value.to_string()
    } else {
        format!("{} {}", value, unit)
    }
}

pub fn hydro(m: &HydroMeasurement) -> String {
    let mut popup = PopupBuilder::new(m).row("ID", &m.station_id);
    if let Some(river) = &m.river {
        popup = popup.row("Rzeka", river);
    }
    if let Some(voivodeship) = &m.voivodeship {
        popup = popup.row("Województwo", voivodeship);
    }
    popup = popup
        .reading("Stan wody", m.water_level, "cm")
        .timestamp("Pomiar stanu", m.water_level_at)
        .reading("Temperatura wody", m.water_temperature, "°C")
        .timestamp("Pomiar temperatury", m.water_temperature_at);
    if let Some(code) = m.ice_phenomenon.filter(|c| *c != 0) {
        let text = ice_description(code).map_or_else(|| code.to_string(), str::to_string);
        popup = popup.row("Zjawisko lodowe", text);
    }
    if let Some(code) = m.overgrowth.filter(|c| *c != 0) {
        let text = GrowthCode::decode(code).map_or_else(|| code.to_string(), |g| g.describe());
        popup = popup.row("Zarastanie", text);
    }
    popup.finish()
}

pub fn hydro2(m: &Hydro2Measurement) -> String {
    PopupBuilder::new(m)
        .row("Kod", &m.station_code)
        .reading("Stan", m.level, "cm")
        .timestamp("Pomiar stanu", m.level_at)
        .reading("Przepływ", m.flow, "m³/s")
        .timestamp("Pomiar przepływu", m.flow_at)
        .finish()
}

pub fn synop(m: &SynopMeasurement) -> String {
    let mut popup = PopupBuilder::new(m).row("ID", &m.station_id);
    if let Some(date) = m.measured_on {
        let when = match m.hour {
            Some(hour) => format!("{} {:02}:00", date.format("%Y-%m-%d"), hour),
            None => date.format("%Y-%m-%d").to_string(),
        };
        popup = popup.row("Pomiar", when);
    }
    popup
        .reading("Temperatura", m.temperature, "°C")
        .reading("Prędkość wiatru", m.wind_speed, "m/s")
        .reading("Kierunek wiatru", m.wind_direction, "°")
        .reading("Wilgotność wzgl.", m.relative_humidity, "%")
        .reading("Suma opadów", m.precipitation, "mm")
        .reading("Ciśnienie", m.pressure, "hPa")
        .finish()
}

pub fn meteo(m: &MeteoMeasurement) -> String {
    PopupBuilder::new(m)
        .row("Kod", &m.station_code)
        .reading("Temperatura gruntu", m.ground_temperature, "°C")
        .reading("Kierunek wiatru", m.wind_direction, "°")
        .reading("Śr. prędkość wiatru", m.wind_avg_speed, "m/s")
        .reading("Maks. prędkość wiatru", m.wind_max_speed, "m/s")
        .reading("Wilgotność", m.relative_humidity, "%")
        .reading("Poryw (10 min)", m.wind_gust_10min, "m/s")
        .reading("Opad (10 min)", m.precipitation_10min, "mm")
        .timestamp("Pomiar", m.ground_temperature_at.or(m.wind_avg_speed_at))
        .finish()
}

pub fn air_quality(m: &AqMeasurement) -> String {
    let mut popup = PopupBuilder::new(m).row("ID", &m.location_id);
    for param in &m.parameters {
        if param.is_overall_index() {
            popup = popup.row("Indeks ogólny", &param.index_text);
            continue;
        }
        let label = param
            .pollutant()
            .map(|p: Pollutant| p.label())
            .unwrap_or(param.parameter.as_str());
        let value = match param.measurement_value {
            Some(v) => with_unit(v, param.measurement_unit.as_deref().unwrap_or("")),
            None => "-".to_string(),
        };
        popup = popup.row(label, format!("{} ({})", value, param.index_text));
    }
    popup.finish()
}

//! Map Rendering
//!
//! Turns cached measurements into markers with tooltips and popups, exports
//! them as GeoJSON and serves the Leaflet page that draws them.

mod page;
pub mod popup;

pub use page::render_page;

use serde::Serialize;

use crate::models::{Snapshot, Station, StationKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub kind: StationKind,
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub color: &'static str,
    pub icon: &'static str,
    pub tooltip: String,
    pub popup_html: String,
}

impl Marker {
    /// `None` for records without a usable position.
    pub fn for_record<S: Station>(record: &S, popup: impl FnOnce(&S) -> String) -> Option<Self> {
        let (lat, lon) = record.position()?;
        Some(Self {
            kind: S::KIND,
            id: record.station_id().to_string(),
            name: record.display_name().to_string(),
            lat,
            lon,
            color: S::KIND.color(),
            icon: S::KIND.icon(),
            tooltip: format!("{} {}", S::KIND.icon(), record.display_name()),
            popup_html: popup(record),
        })
    }
}

/// Markers for every placeable record, in kind order.
pub fn markers(snapshot: &Snapshot) -> Vec<Marker> {
    let mut out = Vec::with_capacity(snapshot.total());
    out.extend(snapshot.hydro.iter().filter_map(|m| Marker::for_record(m, popup::hydro)));
    out.extend(snapshot.hydro2.iter().filter_map(|m| Marker::for_record(m, popup::hydro2)));
    out.extend(snapshot.synop.iter().filter_map(|m| Marker::for_record(m, popup::synop)));
    out.extend(snapshot.meteo.iter().filter_map(|m| Marker::for_record(m, popup::meteo)));
    out.extend(snapshot.aq.iter().filter_map(|m| Marker::for_record(m, popup::air_quality)));
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometry: Point,
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, Serialize)]
pub struct Point {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// `[lon, lat]`
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureProperties {
    pub kind: StationKind,
    pub id: String,
    pub name: String,
    pub color: &'static str,
    pub icon: &'static str,
    pub popup_html: String,
}

impl FeatureCollection {
    pub fn from_markers(markers: &[Marker]) -> Self {
        Self {
            kind: "FeatureCollection",
            features: markers
                .iter()
                .map(|m| Feature {
                    kind: "Feature",
                    geometry: Point {
                        kind: "Point",
                        coordinates: [m.lon, m.lat],
                    },
                    properties: FeatureProperties {
                        kind: m.kind,
                        id: m.id.clone(),
                        name: m.name.clone(),
                        color: m.color,
                        icon: m.icon,
                        popup_html: m.popup_html.clone(),
                    },
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MeteoMeasurement, SynopMeasurement};

    fn snapshot() -> Snapshot {
        Snapshot {
            synop: vec![
                SynopMeasurement {
                    station_id: "12295".into(),
                    station_name: Some("BIAŁYSTOK".into()),
                    temperature: Some(4.2),
                    lat: Some(53.107),
                    lon: Some(23.162),
                    ..Default::default()
                },
                SynopMeasurement {
                    station_id: "12000".into(),
                    ..Default::default()
                },
            ],
            meteo: vec![MeteoMeasurement {
                station_code: "249180010".into(),
                lat: Some(49.2),
                lon: Some(18.9),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_markers_skip_unplaced_records() {
        let markers = markers(&snapshot());
        assert_eq!(markers.len(), 2);

        let synop = &markers[0];
        assert_eq!(synop.kind, StationKind::Synop);
        assert_eq!(synop.color, "#ff6600");
        assert_eq!(synop.tooltip, "🌤️ BIAŁYSTOK");
        assert!(synop.popup_html.contains("4.2 °C"));

        assert_eq!(markers[1].name, "Niezn. stacja");
    }

    #[test]
    fn test_geojson_uses_lon_lat_order() {
        let collection = FeatureCollection::from_markers(&markers(&snapshot()));
        let json = serde_json::to_value(&collection).unwrap();

        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["geometry"]["type"], "Point");
        assert_eq!(json["features"][0]["geometry"]["coordinates"][0], 23.162);
        assert_eq!(json["features"][0]["properties"]["kind"], "synop");
    }
}

//! Station Search
//!
//! Free-text lookup over placeable stations of every kind.

use serde::Serialize;

use crate::models::{Snapshot, Station, StationKind};

/// Maximum number of hits a query returns
pub const MAX_RESULTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchEntry {
    pub kind: StationKind,
    pub id: String,
    pub display_name: String,
    pub detail: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(skip)]
    search_text: String,
}

impl SearchEntry {
    fn new<S: Station>(record: &S, parts: &[Option<&str>], detail: String) -> Option<Self> {
        let (lat, lon) = record.position()?;
        let search_text = parts
            .iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .copied()
            .chain(std::iter::once(S::KIND.key()))
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        Some(Self {
            kind: S::KIND,
            id: record.station_id().to_string(),
            display_name: format!("{} ({})", record.display_name(), S::KIND.label()),
            detail,
            lat,
            lon,
            search_text,
        })
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }
}

/// Search entries in kind order: hydro, hydro2, synop, meteo, aq
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
}

impl SearchIndex {
    pub fn build(snapshot: &Snapshot) -> Self {
        let mut entries = Vec::new();

        entries.extend(snapshot.hydro.iter().filter_map(|m| {
            let mut detail = format!("Rzeka: {}", m.river.as_deref().unwrap_or("-"));
            if let Some(voivodeship) = m.voivodeship.as_deref() {
                detail.push_str(" • ");
                detail.push_str(voivodeship);
            }
            SearchEntry::new(
                m,
                &[
                    m.station_name.as_deref(),
                    m.river.as_deref(),
                    m.voivodeship.as_deref(),
                    Some(m.station_id.as_str()),
                ],
                detail,
            )
        }));

        entries.extend(snapshot.hydro2.iter().filter_map(|m| {
            SearchEntry::new(
                m,
                &[m.station_name.as_deref(), Some(m.station_code.as_str())],
                format!("Kod: {}", m.station_code),
            )
        }));

        entries.extend(snapshot.synop.iter().filter_map(|m| {
            SearchEntry::new(
                m,
                &[m.station_name.as_deref(), Some(m.station_id.as_str())],
                format!("ID: {}", m.station_id),
            )
        }));

        entries.extend(snapshot.meteo.iter().filter_map(|m| {
            SearchEntry::new(
                m,
                &[m.station_name.as_deref(), Some(m.station_code.as_str())],
                format!("Kod: {}", m.station_code),
            )
        }));

        entries.extend(snapshot.aq.iter().filter_map(|m| {
            SearchEntry::new(m, &[Some(m.location.as_str())], format!("ID: {}", m.location_id))
        }));

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive substring match, first [`MAX_RESULTS`] hits in
    /// index order. A blank term matches nothing.
    pub fn query(&self, term: &str) -> Vec<&SearchEntry> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|entry| entry.search_text.contains(&term))
            .take(MAX_RESULTS)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AqMeasurement, HydroMeasurement, SynopMeasurement};

    fn snapshot() -> Snapshot {
        Snapshot {
            hydro: vec![HydroMeasurement {
                station_id: "150160180".into(),
                station_name: Some("Krzyżanowice".into()),
                river: Some("Odra".into()),
                voivodeship: Some("śląskie".into()),
                lat: Some(50.01),
                lon: Some(18.28),
                ..Default::default()
            }],
            synop: vec![
                SynopMeasurement {
                    station_id: "12295".into(),
                    station_name: Some("Białystok".into()),
                    lat: Some(53.1),
                    lon: Some(23.16),
                    ..Default::default()
                },
                SynopMeasurement {
                    station_id: "12375".into(),
                    station_name: Some("Warszawa".into()),
                    ..Default::default()
                },
            ],
            aq: vec![AqMeasurement {
                location_id: "114".into(),
                location: "Wrocław, ul. Bartnicza".into(),
                lat: Some(51.11),
                lon: Some(17.14),
                parameters: vec![],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_unplaced_records_are_not_indexed() {
        let index = SearchIndex::build(&snapshot());
        assert_eq!(index.len(), 3);
        assert!(index.query("warszawa").is_empty());
    }

    #[test]
    fn test_query_matches_river_and_kind_key() {
        let index = SearchIndex::build(&snapshot());

        let hits = index.query("  ODRA ");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].display_name, "Krzyżanowice (Hydrologiczna)");
        assert_eq!(hits[0].detail, "Rzeka: Odra • śląskie");

        let hits = index.query("synop");
        assert_eq!(hits[0].detail, "ID: 12295");
        assert_eq!(hits[0].search_text(), "białystok 12295 synop");
    }

    #[test]
    fn test_blank_query_returns_nothing() {
        let index = SearchIndex::build(&snapshot());
        assert!(index.query("   ").is_empty());
    }

    #[test]
    fn test_results_are_capped() {
        let hydro = (0..25)
            .map(|i| HydroMeasurement {
                station_id: format!("1500{}", i),
                station_name: Some(format!("Stacja {}", i)),
                lat: Some(50.0),
                lon: Some(19.0),
                ..Default::default()
            })
            .collect();
        let index = SearchIndex::build(&Snapshot { hydro, ..Default::default() });

        let hits = index.query("stacja");
        assert_eq!(hits.len(), MAX_RESULTS);
        assert_eq!(hits[0].id, "15000");
    }
}

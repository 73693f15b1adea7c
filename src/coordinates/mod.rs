//! Station Coordinates
//!
//! The hydro and synop feeds carry no positions. Two semicolon-delimited
//! lookup files map station ids to coordinates written in degrees, minutes
//! and seconds; this module parses them and resolves ids to decimal degrees.

mod lookup;

pub use lookup::{parse_hydro_lookup, parse_synop_lookup};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{EnvMapError, EnvMapResult};

/// A resolved lookup-file entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationCoordinate {
    pub id: String,
    pub name: String,
    /// Only present in the hydro lookup file
    pub river: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub altitude: Option<String>,
}

/// Convert `"52 13 47"` style DMS text to decimal degrees.
///
/// Exactly three whitespace-separated parts are required. Each part is read
/// as its leading integer (so `"47\""` reads as 47). Any other shape, or a
/// part without digits, yields `0.0`, which the lookup parsers treat as
/// "no coordinate".
pub fn dms_to_decimal(dms: &str) -> f64 {
    let parts: Vec<&str> = dms.split_whitespace().collect();
    if parts.len() != 3 {
        return 0.0;
    }

    let parsed: Option<Vec<i64>> = parts.iter().map(|p| leading_integer(p)).collect();
    match parsed.as_deref() {
        Some([degrees, minutes, seconds]) => {
            *degrees as f64 + *minutes as f64 / 60.0 + *seconds as f64 / 3600.0
        }
        _ => 0.0,
    }
}

fn leading_integer(token: &str) -> Option<i64> {
    let (sign, digits) = match token.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, token.strip_prefix('+').unwrap_or(token)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|v| sign * v)
}

/// Both lookup tables, loaded once per process
#[derive(Debug, Clone, Default)]
pub struct CoordinateBook {
    hydro: HashMap<String, StationCoordinate>,
    synop: HashMap<String, StationCoordinate>,
}

impl CoordinateBook {
    pub fn new(
        hydro: HashMap<String, StationCoordinate>,
        synop: HashMap<String, StationCoordinate>,
    ) -> Self {
        Self { hydro, synop }
    }

    /// Load both lookup files. A file that cannot be read is logged and
    /// treated as empty, so stations of that kind simply go unplaced.
    pub async fn load(hydro_path: &Path, synop_path: &Path) -> Self {
        let hydro = match read_lookup(hydro_path).await {
            Ok(text) => parse_hydro_lookup(&text),
            Err(e) => {
                warn!("{}", e);
                HashMap::new()
            }
        };
        let synop = match read_lookup(synop_path).await {
            Ok(text) => parse_synop_lookup(&text),
            Err(e) => {
                warn!("{}", e);
                HashMap::new()
            }
        };

        info!(
            "Loaded coordinates for {} hydro and {} synop stations",
            hydro.len(),
            synop.len()
        );
        Self { hydro, synop }
    }

    pub fn hydro(&self, station_id: &str) -> Option<&StationCoordinate> {
        self.hydro.get(station_id)
    }

    pub fn synop(&self, code: &str) -> Option<&StationCoordinate> {
        self.synop.get(code)
    }

    pub fn hydro_len(&self) -> usize {
        self.hydro.len()
    }

    pub fn synop_len(&self) -> usize {
        self.synop.len()
    }
}

/// The lookup files are not guaranteed to be UTF-8; invalid bytes are
/// replaced rather than failing the whole file.
async fn read_lookup(path: &Path) -> EnvMapResult<String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| EnvMapError::CoordinateFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
    }

    #[test]
    fn test_dms_known_values() {
        assert_close(dms_to_decimal("52 13 47"), 52.0 + 13.0 / 60.0 + 47.0 / 3600.0);
        assert_close(dms_to_decimal("21 0 0"), 21.0);
        assert_close(dms_to_decimal("50 30 0"), 50.5);
        assert_close(dms_to_decimal(" 18 19 40 "), 18.327777777777776);
    }

    #[test]
    fn test_dms_lenient_tokens() {
        assert_close(dms_to_decimal("52° 13' 47\""), 52.0 + 13.0 / 60.0 + 47.0 / 3600.0);
        assert_close(dms_to_decimal("N52 13 47"), 0.0);
    }

    #[test]
    fn test_dms_invalid_shapes() {
        assert_eq!(dms_to_decimal(""), 0.0);
        assert_eq!(dms_to_decimal("52 13"), 0.0);
        assert_eq!(dms_to_decimal("52 13 47 1"), 0.0);
        assert_eq!(dms_to_decimal("a b c"), 0.0);
    }

    #[tokio::test]
    async fn test_book_loads_files_and_tolerates_missing_ones() {
        let mut hydro = NamedTempFile::new().unwrap();
        writeln!(hydro, "LP;ID;Nazwa;Rzeka;Szerokosc;Dlugosc;Wysokosc").unwrap();
        writeln!(hydro, "1;150160180;Krzyżanowice;Odra;50 0 36;18 17 12;183").unwrap();

        let missing = Path::new("/definitely/not/here/kody_stacji_synop.csv");
        let book = CoordinateBook::load(hydro.path(), missing).await;

        assert_eq!(book.hydro_len(), 1);
        assert_eq!(book.synop_len(), 0);
        let coord = book.hydro("150160180").unwrap();
        assert_close(coord.lat, 50.01);
        assert_eq!(coord.river.as_deref(), Some("Odra"));
    }
}

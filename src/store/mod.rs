//! Local Measurement Cache
//!
//! SQLite-backed store with one table per station kind. A refresh clears a
//! table and bulk-inserts the new rows inside a single transaction, so
//! readers see either the old set or the new one.

mod schema;

pub use schema::{Record, SCHEMA};

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::info;

use crate::models::{
    AqMeasurement, Hydro2Measurement, HydroMeasurement, MeteoMeasurement, Snapshot, StationKind,
    SynopMeasurement,
};

#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open (or create) the database and make sure all tables exist.
    pub async fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();
        let path_clone = path.clone();

        task::spawn_blocking(move || {
            let conn = Connection::open(&path_clone)
                .with_context(|| format!("opening {}", path_clone.display()))?;
            conn.execute_batch(SCHEMA)?;
            Ok::<_, anyhow::Error>(())
        })
        .await??;

        Ok(Self { db_path: path })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Clear the table for `R` and insert `records`. Returns the row count.
    pub async fn replace_all<R: Record>(&self, records: Vec<R>) -> Result<usize> {
        let path = self.db_path.clone();

        let stored = task::spawn_blocking(move || {
            let mut conn = Connection::open(&path)?;
            let tx = conn.transaction()?;
            tx.execute(&format!("DELETE FROM {}", R::KIND.table()), [])?;
            {
                let mut stmt = tx.prepare(&R::insert_sql())?;
                for record in &records {
                    record.insert(&mut stmt)?;
                }
            }
            tx.commit()?;
            Ok::<_, anyhow::Error>(records.len())
        })
        .await??;

        info!("Stored {} {} measurements", stored, R::KIND);
        Ok(stored)
    }

    pub async fn load_all<R: Record>(&self) -> Result<Vec<R>> {
        let path = self.db_path.clone();

        task::spawn_blocking(move || {
            let conn = Connection::open(&path)?;
            let mut stmt = conn.prepare(&R::select_sql())?;
            let rows = stmt
                .query_map([], |row| R::from_row(row))?
                .collect::<rusqlite::Result<Vec<R>>>()?;
            Ok::<_, anyhow::Error>(rows)
        })
        .await?
    }

    pub async fn count(&self, kind: StationKind) -> Result<i64> {
        let path = self.db_path.clone();

        task::spawn_blocking(move || {
            let conn = Connection::open(&path)?;
            let count: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", kind.table()),
                [],
                |row| row.get(0),
            )?;
            Ok::<_, anyhow::Error>(count)
        })
        .await?
    }

    /// Read all five tables.
    pub async fn load_snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            hydro: self.load_all::<HydroMeasurement>().await?,
            hydro2: self.load_all::<Hydro2Measurement>().await?,
            synop: self.load_all::<SynopMeasurement>().await?,
            meteo: self.load_all::<MeteoMeasurement>().await?,
            aq: self.load_all::<AqMeasurement>().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AqParameter;
    use chrono::NaiveDate;
    use tempfile::NamedTempFile;

    fn hydro(id: &str, level: f64) -> HydroMeasurement {
        HydroMeasurement {
            station_id: id.to_string(),
            station_name: Some(format!("Stacja {}", id)),
            river: Some("Wisła".to_string()),
            water_level: Some(level),
            water_level_at: NaiveDate::from_ymd_opt(2024, 3, 1)
                .and_then(|d| d.and_hms_opt(12, 0, 0)),
            ice_phenomenon: Some(0),
            lat: Some(52.1),
            lon: Some(21.0),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_replace_clears_previous_rows() -> Result<()> {
        let temp_file = NamedTempFile::new()?;
        let store = SqliteStore::new(temp_file.path()).await?;

        store.replace_all(vec![hydro("1", 100.0), hydro("2", 200.0)]).await?;
        assert_eq!(store.count(StationKind::Hydro).await?, 2);

        store.replace_all(vec![hydro("3", 300.0)]).await?;
        let rows = store.load_all::<HydroMeasurement>().await?;
        assert_eq!(rows, vec![hydro("3", 300.0)]);

        Ok(())
    }

    #[tokio::test]
    async fn test_aq_parameters_round_trip_through_json_column() -> Result<()> {
        let temp_file = NamedTempFile::new()?;
        let store = SqliteStore::new(temp_file.path()).await?;

        let station = AqMeasurement {
            location_id: "114".to_string(),
            location: "Wrocław, ul. Bartnicza".to_string(),
            lat: Some(51.115933),
            lon: Some(17.141125),
            parameters: vec![AqParameter {
                parameter: "PM10".to_string(),
                index_value: 1,
                index_text: "Dobry".to_string(),
                measurement_value: Some(23.1),
                measurement_unit: Some("µg/m³".to_string()),
                last_updated: Some("2024-03-01 13:00:00".to_string()),
            }],
        };
        store.replace_all(vec![station.clone()]).await?;

        let snapshot = store.load_snapshot().await?;
        assert_eq!(snapshot.aq, vec![station]);
        assert_eq!(snapshot.total(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_replace_empties_table() -> Result<()> {
        let temp_file = NamedTempFile::new()?;
        let store = SqliteStore::new(temp_file.path()).await?;

        store.replace_all(vec![hydro("1", 100.0)]).await?;
        store.replace_all(Vec::<HydroMeasurement>::new()).await?;
        assert_eq!(store.count(StationKind::Hydro).await?, 0);

        Ok(())
    }
}

//! Refresh Cycle
//!
//! fetch → attach coordinates → clear and bulk-insert, one source at a time.
//! A failing source is logged and its table keeps the previous data; the
//! remaining sources still run.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use crate::config::EnvMapConfig;
use crate::coordinates::CoordinateBook;
use crate::models::{HydroMeasurement, StationKind, SynopMeasurement};
use crate::sources::MeasurementFeed;
use crate::store::SqliteStore;

/// Result of refreshing one source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceOutcome {
    pub kind: StationKind,
    pub stored: Option<usize>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<SourceOutcome>,
}

impl RefreshReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error.is_none()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &SourceOutcome> {
        self.outcomes.iter().filter(|o| o.error.is_some())
    }

    pub fn total_stored(&self) -> usize {
        self.outcomes.iter().filter_map(|o| o.stored).sum()
    }
}

pub struct Refresher {
    feed: Arc<dyn MeasurementFeed>,
    store: SqliteStore,
    hydro_coordinates: PathBuf,
    synop_coordinates: PathBuf,
    book: OnceCell<CoordinateBook>,
}

impl Refresher {
    pub fn new(feed: Arc<dyn MeasurementFeed>, store: SqliteStore, config: &EnvMapConfig) -> Self {
        Self {
            feed,
            store,
            hydro_coordinates: config.hydro_coordinates_path.clone(),
            synop_coordinates: config.synop_coordinates_path.clone(),
            book: OnceCell::new(),
        }
    }

    /// Use an already loaded coordinate book instead of reading the files.
    pub fn with_coordinates(self, book: CoordinateBook) -> Self {
        Self {
            book: OnceCell::new_with(Some(book)),
            ..self
        }
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    async fn coordinates(&self) -> &CoordinateBook {
        self.book
            .get_or_init(|| async {
                debug!("Loading station coordinate files");
                CoordinateBook::load(&self.hydro_coordinates, &self.synop_coordinates).await
            })
            .await
    }

    /// Refresh one source and return the number of stored records.
    pub async fn refresh_kind(&self, kind: StationKind) -> Result<usize> {
        match kind {
            StationKind::Hydro => {
                let raw = self.feed.hydro().await?;
                let placed = place_hydro(raw, self.coordinates().await);
                self.store.replace_all(placed).await
            }
            StationKind::Hydro2 => {
                let records = self.feed.hydro2().await?;
                self.store.replace_all(records).await
            }
            StationKind::Synop => {
                let raw = self.feed.synop().await?;
                let placed = place_synop(raw, self.coordinates().await);
                self.store.replace_all(placed).await
            }
            StationKind::Meteo => {
                let records = self.feed.meteo().await?;
                self.store.replace_all(records).await
            }
            StationKind::Aq => {
                let records = self.feed.air_quality().await?;
                self.store.replace_all(records).await
            }
        }
    }

    /// Refresh every source in order. Never fails as a whole.
    pub async fn refresh_all(&self) -> RefreshReport {
        let started_at = Utc::now();
        let mut outcomes = Vec::with_capacity(StationKind::ALL.len());

        for kind in StationKind::ALL {
            let outcome = match self.refresh_kind(kind).await {
                Ok(stored) => SourceOutcome { kind, stored: Some(stored), error: None },
                Err(e) => {
                    error!("Refreshing {} data failed: {:#}", kind, e);
                    SourceOutcome { kind, stored: None, error: Some(format!("{:#}", e)) }
                }
            };
            outcomes.push(outcome);
        }

        let report = RefreshReport {
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };
        info!(
            "Refresh finished: {} of {} sources, {} records stored",
            report.succeeded(),
            report.outcomes.len(),
            report.total_stored()
        );
        report
    }
}

/// Attach lookup coordinates to hydro records, dropping records whose
/// station is not in the lookup file.
pub fn place_hydro(records: Vec<HydroMeasurement>, book: &CoordinateBook) -> Vec<HydroMeasurement> {
    let total = records.len();
    let placed: Vec<HydroMeasurement> = records
        .into_iter()
        .filter_map(|mut record| match book.hydro(&record.station_id) {
            Some(coord) => {
                record.lat = Some(coord.lat);
                record.lon = Some(coord.lon);
                Some(record)
            }
            None => {
                debug!("No coordinates for hydro station {}", record.station_id);
                None
            }
        })
        .collect();

    info!("Found coordinates for {} of {} hydro stations", placed.len(), total);
    placed
}

/// Attach lookup coordinates to synop records. The lookup file keys
/// stations by the id without its first two characters.
pub fn place_synop(records: Vec<SynopMeasurement>, book: &CoordinateBook) -> Vec<SynopMeasurement> {
    let total = records.len();
    let placed: Vec<SynopMeasurement> = records
        .into_iter()
        .filter_map(|mut record| match book.synop(record.lookup_code()) {
            Some(coord) => {
                record.lat = Some(coord.lat);
                record.lon = Some(coord.lon);
                Some(record)
            }
            None => {
                debug!("No coordinates for synop station {}", record.lookup_code());
                None
            }
        })
        .collect();

    info!("Found coordinates for {} of {} synop stations", placed.len(), total);
    placed
}

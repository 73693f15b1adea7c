//! Polish Environment Map
//!
//! Aggregates public Polish environmental monitoring data into a local
//! cache and renders it as a filterable, searchable map:
//! - IMGW hydrological, synoptic and meteorological readings
//! - GIOŚ air-quality indices and sensor values
//! - Per-parameter statistics over the cached data

pub mod config;
pub mod coordinates;
pub mod error;
pub mod filter;
pub mod map;
pub mod models;
pub mod refresh;
pub mod search;
pub mod server;
pub mod sources;
pub mod stats;
pub mod store;
pub mod utils;

// Re-exports for convenience
pub use config::EnvMapConfig;
pub use error::{EnvMapError, EnvMapResult};
pub use models::{Snapshot, StationKind};
pub use refresh::{RefreshReport, Refresher};
pub use store::SqliteStore;

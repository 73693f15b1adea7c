mod common;

use anyhow::Result;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tempfile::NamedTempFile;

use polish_env_map::config::EnvMapConfig;
use polish_env_map::filter::{FilterOptions, FilterState, RangeKey};
use polish_env_map::models::{MeteoMeasurement, StationKind};
use polish_env_map::refresh::Refresher;
use polish_env_map::store::SqliteStore;

use common::{coordinate_book, FixtureFeed};

async fn refresher(db: &NamedTempFile) -> Result<(Arc<FixtureFeed>, Refresher)> {
    let store = SqliteStore::new(db.path()).await?;
    let feed = Arc::new(FixtureFeed::default());
    let refresher = Refresher::new(feed.clone(), store, &EnvMapConfig::default())
        .with_coordinates(coordinate_book());
    Ok((feed, refresher))
}

#[tokio::test]
async fn test_failing_source_keeps_previous_rows() -> Result<()> {
    let db = NamedTempFile::new()?;
    let (feed, refresher) = refresher(&db).await?;

    let cached = MeteoMeasurement {
        station_code: "249180010".into(),
        station_name: Some("Zakopane".into()),
        lat: Some(49.29),
        lon: Some(19.96),
        ground_temperature: Some(-2.0),
        ..Default::default()
    };
    refresher.store().replace_all(vec![cached.clone()]).await?;

    let report = refresher.refresh_all().await;

    assert_eq!(feed.calls.load(Ordering::SeqCst), 5);
    assert_eq!(report.outcomes.len(), 5);
    assert_eq!(report.succeeded(), 4);

    let failed: Vec<_> = report.failed().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].kind, StationKind::Meteo);
    assert!(failed[0].error.as_deref().unwrap_or_default().contains("503"));

    let snapshot = refresher.store().load_snapshot().await?;
    assert_eq!(snapshot.meteo, vec![cached]);
    Ok(())
}

#[tokio::test]
async fn test_unplaced_stations_are_dropped() -> Result<()> {
    let db = NamedTempFile::new()?;
    let (_, refresher) = refresher(&db).await?;

    let report = refresher.refresh_all().await;
    let stored = |kind| report.outcomes.iter().find(|o| o.kind == kind).and_then(|o| o.stored);

    assert_eq!(stored(StationKind::Hydro), Some(2));
    assert_eq!(stored(StationKind::Synop), Some(1));
    assert_eq!(stored(StationKind::Hydro2), Some(1));
    assert_eq!(stored(StationKind::Aq), Some(2));
    assert_eq!(report.total_stored(), 6);

    let snapshot = refresher.store().load_snapshot().await?;
    let warszawa = snapshot
        .hydro
        .iter()
        .find(|m| m.station_id == "152210170")
        .expect("placed hydro station");
    assert!((warszawa.lat.unwrap() - 52.2467).abs() < 1e-3);
    assert!((warszawa.lon.unwrap() - 21.0281).abs() < 1e-3);
    Ok(())
}

#[tokio::test]
async fn test_second_refresh_replaces_rows() -> Result<()> {
    let db = NamedTempFile::new()?;
    let (_, refresher) = refresher(&db).await?;

    refresher.refresh_all().await;
    refresher.refresh_kind(StationKind::Hydro).await?;

    assert_eq!(refresher.store().count(StationKind::Hydro).await?, 2);
    Ok(())
}

#[tokio::test]
async fn test_filters_over_refreshed_data() -> Result<()> {
    let db = NamedTempFile::new()?;
    let (_, refresher) = refresher(&db).await?;
    refresher.refresh_all().await;
    let snapshot = refresher.store().load_snapshot().await?;

    let mut filters = FilterState::default();
    assert_eq!(filters.apply(&snapshot).total(), 6);

    filters.only_with_ice = true;
    let filtered = filters.apply(&snapshot);
    assert_eq!(filtered.hydro.len(), 1);
    assert_eq!(filtered.hydro[0].river.as_deref(), Some("Wisła"));

    filters.reset();
    filters.selected_growth_phenomenon = "112".into();
    assert_eq!(filters.apply(&snapshot).hydro[0].station_id, "150160180");

    filters.reset();
    filters.set_range_max(RangeKey::AqIndex, 3.0);
    let filtered = filters.apply(&snapshot);
    assert_eq!(filtered.aq.len(), 1);
    assert_eq!(filtered.aq[0].location_id, "114");

    filters.reset();
    filters.set_range_min(RangeKey::HydroWaterLevel, 231.0);
    assert_eq!(filters.apply(&snapshot).count(StationKind::Hydro), 1);
    filters.set_range_min(RangeKey::HydroWaterLevel, 231.01);
    assert_eq!(filters.apply(&snapshot).count(StationKind::Hydro), 0);

    filters.reset();
    filters.show_synop = false;
    assert_eq!(filters.apply(&snapshot).count(StationKind::Synop), 0);

    let options = FilterOptions::from_snapshot(&snapshot);
    assert_eq!(options.rivers, vec!["Odra".to_string(), "Wisła".to_string()]);
    assert_eq!(options.growth_phenomena.len(), 1);
    assert_eq!(options.growth_phenomena[0].code, "112");
    assert_eq!(options.ice_phenomena.len(), 13);
    Ok(())
}

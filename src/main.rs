//! Polish Environment Map
//!
//! Command-line front end: refresh the local cache from the public APIs,
//! serve the interactive map, or query the cache from the terminal.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use polish_env_map::config::EnvMapConfig;
use polish_env_map::filter::FilterState;
use polish_env_map::map::{markers, FeatureCollection};
use polish_env_map::models::StationKind;
use polish_env_map::refresh::Refresher;
use polish_env_map::search::SearchIndex;
use polish_env_map::server::{run_server, AppState};
use polish_env_map::sources::PublicApis;
use polish_env_map::stats::statistics_for;
use polish_env_map::store::SqliteStore;
use polish_env_map::utils::init_logging;

#[derive(Parser)]
#[command(name = "polish-env-map")]
#[command(about = "Polish hydrological, meteorological and air-quality data on a map")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// SQLite cache file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Hydro station lookup file
    #[arg(long, global = true)]
    hydro_coordinates: Option<PathBuf>,

    /// Synop station lookup file
    #[arg(long, global = true)]
    synop_coordinates: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every source and rewrite the local cache
    Refresh,

    /// Serve the map and the JSON API
    Serve {
        /// Address to listen on
        #[arg(long)]
        bind: Option<String>,

        /// Run a refresh cycle before accepting requests
        #[arg(long)]
        refresh_on_start: bool,
    },

    /// Print statistics for one station kind
    Stats {
        /// hydro, hydro2, synop, meteo or aq
        #[arg(long)]
        kind: StationKind,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Search cached stations by name, river, region or id
    Search { term: String },

    /// Export markers as GeoJSON
    Markers {
        /// JSON file with filter settings; defaults show everything
        #[arg(long)]
        filters: Option<PathBuf>,

        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

impl Cli {
    fn config(&self) -> EnvMapConfig {
        let mut config = EnvMapConfig::from_env();
        if let Some(db) = &self.db {
            config.database_path = db.clone();
        }
        if let Some(path) = &self.hydro_coordinates {
            config.hydro_coordinates_path = path.clone();
        }
        if let Some(path) = &self.synop_coordinates {
            config.synop_coordinates_path = path.clone();
        }
        if let Commands::Serve { bind: Some(bind), .. } = &self.command {
            config.bind_address = bind.clone();
        }
        config
    }
}

async fn refresher(config: &EnvMapConfig) -> Result<Refresher> {
    let store = SqliteStore::new(&config.database_path)
        .await
        .context("opening measurement cache")?;
    let feed = Arc::new(PublicApis::new(config)?);
    Ok(Refresher::new(feed, store, config))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    let config = cli.config();

    match &cli.command {
        Commands::Refresh => {
            let report = refresher(&config).await?.refresh_all().await;
            for outcome in &report.outcomes {
                match (&outcome.stored, &outcome.error) {
                    (Some(stored), _) => println!("{:<7} {} rekordów", outcome.kind, stored),
                    (_, Some(error)) => println!("{:<7} błąd: {}", outcome.kind, error),
                    _ => {}
                }
            }
            if report.succeeded() == 0 {
                anyhow::bail!("every source failed to refresh");
            }
        }

        Commands::Serve { refresh_on_start, .. } => {
            let state = AppState::new(config.clone(), refresher(&config).await?);
            if *refresh_on_start {
                let report = state.refresh().await;
                for failed in report.failed() {
                    warn!("{} data unavailable, serving cached rows", failed.kind);
                }
            }
            run_server(state).await?;
        }

        Commands::Stats { kind, json } => {
            let store = SqliteStore::new(&config.database_path).await?;
            let stats = statistics_for(*kind, &store.load_snapshot().await?);

            if *json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else if stats.is_empty() {
                println!("Brak danych dla: {}", kind.label());
            } else {
                println!("{} {}", kind.icon(), kind.label());
                for p in &stats {
                    let s = &p.statistics;
                    println!("\n{} [{}]", p.parameter, p.unit);
                    println!("  liczba: {}  min: {}  maks: {}", s.count, s.min, s.max);
                    println!("  średnia: {}  mediana: {}  odch. std.: {}", s.mean, s.median, s.std_dev);
                    println!("  Q1: {}  Q3: {}  IQR: {}  CV: {}%", s.q1, s.q3, s.iqr, s.cv);
                    println!("  skośność: {}  kurtoza: {}", s.skewness, s.kurtosis);
                    for range in &s.ranges {
                        println!("  {:>20}  {:>4} ({}%)", range.range, range.count, range.percentage);
                    }
                }
            }
        }

        Commands::Search { term } => {
            let store = SqliteStore::new(&config.database_path).await?;
            let index = SearchIndex::build(&store.load_snapshot().await?);
            let hits = index.query(term);
            if hits.is_empty() {
                println!("Brak wyników dla '{}'", term);
            }
            for hit in hits {
                println!("{} - {}  [{:.4}, {:.4}]", hit.display_name, hit.detail, hit.lat, hit.lon);
            }
        }

        Commands::Markers { filters, out } => {
            let filters: FilterState = match filters {
                Some(path) => {
                    let raw = tokio::fs::read_to_string(path)
                        .await
                        .with_context(|| format!("reading {}", path.display()))?;
                    serde_json::from_str(&raw).context("parsing filter settings")?
                }
                None => FilterState::default(),
            };

            let store = SqliteStore::new(&config.database_path).await?;
            let snapshot = filters.apply(&store.load_snapshot().await?);
            let collection = FeatureCollection::from_markers(&markers(&snapshot));
            let json = serde_json::to_string_pretty(&collection)?;

            match out {
                Some(path) => {
                    tokio::fs::write(path, json).await?;
                    info!("Wrote {} markers to {}", collection.features.len(), path.display());
                }
                None => println!("{}", json),
            }
        }
    }

    Ok(())
}

//! HTTP Server
//!
//! JSON API over the local cache plus the Leaflet map page.

use anyhow::{Context, Result};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::EnvMapConfig;
use crate::error::EnvMapError;
use crate::filter::{FilterOptions, FilterState};
use crate::map::{markers, render_page, FeatureCollection, Marker};
use crate::models::StationKind;
use crate::refresh::{RefreshReport, Refresher};
use crate::search::{SearchEntry, SearchIndex};
use crate::stats::{statistics_for, ParameterStatistics};
use crate::store::SqliteStore;

struct ServerError(anyhow::Error);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<EnvMapError>() {
            Some(EnvMapError::UnknownKind(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!("Request failed: {:#}", self.0);
        }
        (status, Json(serde_json::json!({ "error": format!("{:#}", self.0) }))).into_response()
    }
}

impl<E> From<E> for ServerError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvMapConfig>,
    pub store: SqliteStore,
    pub refresher: Arc<Refresher>,
    /// Held for the duration of a refresh so cycles never overlap
    pub refresh_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(config: EnvMapConfig, refresher: Refresher) -> Self {
        Self {
            config: Arc::new(config),
            store: refresher.store().clone(),
            refresher: Arc::new(refresher),
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn refresh(&self) -> RefreshReport {
        let _guard = self.refresh_lock.lock().await;
        self.refresher.refresh_all().await
    }
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    database: String,
    stations: BTreeMap<StationKind, i64>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(map_page))
        .route("/api/markers", get(default_markers).post(filtered_markers))
        .route("/api/markers/geojson", get(geojson))
        .route("/api/search", get(search))
        .route("/api/stats/{kind}", get(stats))
        .route("/api/filters/options", get(filter_options))
        .route("/api/refresh", post(refresh))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(state: AppState) -> Result<()> {
    let addr = state.config.bind_address.clone();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Map available at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn map_page(State(state): State<AppState>) -> impl IntoResponse {
    Html(render_page(&state.config))
}

async fn filtered(state: &AppState, filters: &FilterState) -> Result<Vec<Marker>> {
    let snapshot = state.store.load_snapshot().await?;
    Ok(markers(&filters.apply(&snapshot)))
}

async fn default_markers(State(state): State<AppState>) -> Result<Json<Vec<Marker>>, ServerError> {
    Ok(Json(filtered(&state, &FilterState::default()).await?))
}

async fn filtered_markers(
    State(state): State<AppState>,
    Json(filters): Json<FilterState>,
) -> Result<Json<Vec<Marker>>, ServerError> {
    Ok(Json(filtered(&state, &filters).await?))
}

async fn geojson(State(state): State<AppState>) -> Result<Json<FeatureCollection>, ServerError> {
    let markers = filtered(&state, &FilterState::default()).await?;
    Ok(Json(FeatureCollection::from_markers(&markers)))
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchEntry>>, ServerError> {
    let snapshot = state.store.load_snapshot().await?;
    let index = SearchIndex::build(&snapshot);
    let hits = index.query(&params.q).into_iter().cloned().collect();
    Ok(Json(hits))
}

async fn stats(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<Vec<ParameterStatistics>>, ServerError> {
    let kind: StationKind = kind.parse()?;
    let snapshot = state.store.load_snapshot().await?;
    Ok(Json(statistics_for(kind, &snapshot)))
}

async fn filter_options(State(state): State<AppState>) -> Result<Json<FilterOptions>, ServerError> {
    let snapshot = state.store.load_snapshot().await?;
    Ok(Json(FilterOptions::from_snapshot(&snapshot)))
}

async fn refresh(State(state): State<AppState>) -> Json<RefreshReport> {
    Json(state.refresh().await)
}

async fn health(State(state): State<AppState>) -> Result<Json<Health>, ServerError> {
    let mut stations = BTreeMap::new();
    for kind in StationKind::ALL {
        stations.insert(kind, state.store.count(kind).await?);
    }
    Ok(Json(Health {
        status: "ok",
        database: state.store.path().display().to_string(),
        stations,
    }))
}

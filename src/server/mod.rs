//! HTTP surface of the catalog service.
//!
//! # Endpoints
//!
//! - `GET /`: service banner
//! - `GET /buscador`: static search page
//! - `GET|POST /categorias/`, `GET|PUT|DELETE /categorias/{id}`
//! - `GET|POST /productos/`, `GET|PUT|DELETE /productos/{id}`,
//!   `GET /productos/categoria/{categoria}`, `GET /productos/{id}/misma-categoria`
//! - `GET|POST /postres/`, `GET|PUT|DELETE /postres/{id}`,
//!   `GET /postres/categoria/{categoria}`, `GET /postres/{id}/misma-categoria`
//! - `GET /buscar/{termino}`: search across products and desserts
//! - `GET /estadisticas/`: per-category statistics
//! - `GET /contadores/`: sequence counters

mod categories;
mod desserts;
mod error;
mod products;

pub use error::ApiError;

use axum::extract::{Path, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::catalog::{Catalog, SearchResults, Statistics};
use crate::error::CatalogError;
use crate::models::CounterReport;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    /// Location of `buscador.html`
    pub search_page: PathBuf,
    pub port: u16,
}

/// `skip`/`limit` query parameters for list endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    100
}

/// Confirmation returned by delete endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct Deleted {
    pub message: String,
}

impl Deleted {
    fn new(message: String) -> Self {
        Self { message }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/buscador", get(search_page))
        .route(
            "/categorias/",
            get(categories::list).post(categories::create),
        )
        .route(
            "/categorias/{id}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route("/productos/", get(products::list).post(products::create))
        .route(
            "/productos/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
        .route(
            "/productos/categoria/{categoria}",
            get(products::by_category),
        )
        .route(
            "/productos/{id}/misma-categoria",
            get(products::same_category),
        )
        .route("/postres/", get(desserts::list).post(desserts::create))
        .route(
            "/postres/{id}",
            get(desserts::get)
                .put(desserts::update)
                .delete(desserts::delete),
        )
        .route("/postres/categoria/{categoria}", get(desserts::by_category))
        .route(
            "/postres/{id}/misma-categoria",
            get(desserts::same_category),
        )
        .route("/buscar/{termino}", get(search))
        .route("/estadisticas/", get(statistics))
        .route("/contadores/", get(counters))
        .with_state(state)
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(Serialize)]
struct Banner {
    message: &'static str,
    database: &'static str,
    version: &'static str,
    puerto: String,
    auto_increment: &'static str,
}

async fn root(State(state): State<AppState>) -> Json<Banner> {
    Json(Banner {
        message: "Bienvenido a la API de Cafetería El Rincón Mexicano",
        database: "SQLite",
        version: env!("CARGO_PKG_VERSION"),
        puerto: state.port.to_string(),
        auto_increment: "IDs secuenciales activados",
    })
}

async fn search_page(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    match tokio::fs::read_to_string(&state.search_page).await {
        Ok(page) => Ok(Html(page)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ApiError::not_found(
            "Archivo buscador.html no encontrado",
        )),
        Err(e) => Err(CatalogError::Io(e).into()),
    }
}

async fn search(
    State(state): State<AppState>,
    Path(termino): Path<String>,
) -> Result<Json<SearchResults>, ApiError> {
    Ok(Json(state.catalog.search(&termino).await?))
}

async fn statistics(State(state): State<AppState>) -> Result<Json<Statistics>, ApiError> {
    Ok(Json(state.catalog.statistics().await?))
}

#[derive(Serialize, Deserialize)]
struct CountersResponse {
    contadores: Vec<CounterReport>,
}

async fn counters(State(state): State<AppState>) -> Result<Json<CountersResponse>, ApiError> {
    let contadores = state
        .catalog
        .counters
        .list_counters()
        .await?
        .iter()
        .map(CounterReport::from)
        .collect();
    Ok(Json(CountersResponse { contadores }))
}

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;

use super::{AppState, Deleted};
use crate::models::{Category, CategoryCreate, CategoryUpdate};
use crate::server::ApiError;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.catalog.categories.list().await?))
}

pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Category>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.catalog.categories.get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CategoryCreate>, JsonRejection>,
) -> Result<Json<Category>, ApiError> {
    let Json(input) = body?;
    Ok(Json(state.catalog.categories.create(input).await?))
}

pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<CategoryUpdate>, JsonRejection>,
) -> Result<Json<Category>, ApiError> {
    let Path(id) = id?;
    let Json(patch) = body?;
    Ok(Json(state.catalog.categories.update(id, patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Deleted>, ApiError> {
    let Path(id) = id?;
    let nombre = state.catalog.categories.delete(id).await?;
    Ok(Json(Deleted::new(format!(
        "Categoría '{}' eliminada correctamente",
        nombre
    ))))
}

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;

use super::{AppState, Deleted, Pagination};
use crate::models::{Dessert, DessertCreate, DessertUpdate, Product};
use crate::server::ApiError;

pub async fn list(
    State(state): State<AppState>,
    pagination: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<Dessert>>, ApiError> {
    let Query(page) = pagination?;
    let desserts = state.catalog.desserts.list(page.skip, page.limit).await?;
    Ok(Json(desserts))
}

pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Dessert>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.catalog.desserts.get(id).await?))
}

pub async fn by_category(
    State(state): State<AppState>,
    Path(categoria): Path<String>,
) -> Result<Json<Vec<Dessert>>, ApiError> {
    Ok(Json(
        state.catalog.desserts.find_by_category(&categoria).await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<DessertCreate>, JsonRejection>,
) -> Result<Json<Dessert>, ApiError> {
    let Json(input) = body?;
    Ok(Json(state.catalog.desserts.create(input).await?))
}

pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<DessertUpdate>, JsonRejection>,
) -> Result<Json<Dessert>, ApiError> {
    let Path(id) = id?;
    let Json(patch) = body?;
    Ok(Json(state.catalog.desserts.update(id, patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Deleted>, ApiError> {
    let Path(id) = id?;
    let nombre = state.catalog.desserts.delete(id).await?;
    Ok(Json(Deleted::new(format!(
        "Postre '{}' eliminado correctamente",
        nombre
    ))))
}

/// Products in the same category as a dessert.
pub async fn same_category(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.catalog.products_sharing_category(id).await?))
}

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;

use super::{AppState, Deleted, Pagination};
use crate::models::{Dessert, Product, ProductCreate, ProductUpdate};
use crate::server::ApiError;

pub async fn list(
    State(state): State<AppState>,
    pagination: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let Query(page) = pagination?;
    let products = state.catalog.products.list(page.skip, page.limit).await?;
    Ok(Json(products))
}

pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Product>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.catalog.products.get(id).await?))
}

pub async fn by_category(
    State(state): State<AppState>,
    Path(categoria): Path<String>,
) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(
        state.catalog.products.find_by_category(&categoria).await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<ProductCreate>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Json(input) = body?;
    Ok(Json(state.catalog.products.create(input).await?))
}

pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<ProductUpdate>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Path(id) = id?;
    let Json(patch) = body?;
    Ok(Json(state.catalog.products.update(id, patch).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Deleted>, ApiError> {
    let Path(id) = id?;
    let nombre = state.catalog.products.delete(id).await?;
    Ok(Json(Deleted::new(format!(
        "Producto '{}' eliminado correctamente",
        nombre
    ))))
}

/// Desserts in the same category as a product.
pub async fn same_category(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<Dessert>>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.catalog.desserts_sharing_category(id).await?))
}

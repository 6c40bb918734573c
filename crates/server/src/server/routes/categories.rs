use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::RequestError;
use crate::models::category::{
    validate_category_description, validate_category_name, Category, CategoryDetailResponse,
    CategoryId, CreateCategoryRequest, UpdateCategoryRequest,
};
use crate::server::state::AppState;

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), RequestError> {
    validate_category_name(&request.name)?;
    validate_category_description(&request.description)?;
    let category = state.db_connection.create_category(&request).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Category>>, RequestError> {
    let categories = state.db_connection.list_categories().await?;
    Ok(Json(categories))
}

pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CategoryId>,
) -> Result<Json<CategoryDetailResponse>, RequestError> {
    let detail = state.db_connection.category_detail(id).await?;
    Ok(Json(detail))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CategoryId>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, RequestError> {
    if let Some(name) = request.name.as_deref() {
        validate_category_name(name)?;
    }
    if let Some(description) = request.description.as_deref() {
        validate_category_description(description)?;
    }
    let category = state.db_connection.update_category(id, &request).await?;
    Ok(Json(category))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CategoryId>,
) -> Result<Json<Category>, RequestError> {
    let category = state.db_connection.delete_category(id).await?;
    Ok(Json(category))
}

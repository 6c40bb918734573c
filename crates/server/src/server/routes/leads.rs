use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::RequestError;
use crate::models::lead::{validate_lead_name, CreateLeadRequest, Lead, LeadId};
use crate::models::support::validate_contact_email;
use crate::server::state::AppState;

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateLeadRequest>,
) -> Result<(StatusCode, Json<Lead>), RequestError> {
    validate_lead_name(&request.name)?;
    validate_contact_email(&request.email)?;
    let lead = state.db_connection.create_lead(&request).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Lead>>, RequestError> {
    let leads = state.db_connection.list_leads().await?;
    Ok(Json(leads))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<LeadId>,
) -> Result<Json<Lead>, RequestError> {
    let lead = state.db_connection.delete_lead(id).await?;
    Ok(Json(lead))
}

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{RequestError, ValidationError};
use crate::models::support::{
    validate_contact_email, validate_ticket_message, validate_ticket_subject, CreateTicketRequest,
    Ticket, TicketId,
};
use crate::server::state::AppState;

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateTicketRequest>,
) -> Result<(StatusCode, Json<Ticket>), RequestError> {
    if request.name.trim().is_empty() {
        return Err(ValidationError::InvalidInput {
            value: request.name.clone(),
            reason: "contact name cannot be empty".to_string(),
        }
        .into());
    }
    validate_contact_email(&request.email)?;
    validate_ticket_subject(&request.subject)?;
    validate_ticket_message(&request.message)?;
    let ticket = state.db_connection.create_ticket(&request).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Ticket>>, RequestError> {
    let tickets = state.db_connection.list_tickets().await?;
    Ok(Json(tickets))
}

pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TicketId>,
) -> Result<Json<Ticket>, RequestError> {
    let ticket = state.db_connection.get_ticket(id).await?;
    Ok(Json(ticket))
}

pub async fn close(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TicketId>,
) -> Result<Json<Ticket>, RequestError> {
    let ticket = state.db_connection.close_ticket(id).await?;
    Ok(Json(ticket))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TicketId>,
) -> Result<Json<Ticket>, RequestError> {
    let ticket = state.db_connection.delete_ticket(id).await?;
    Ok(Json(ticket))
}

use sqlx::{Error as SqlxError, PgExecutor};
use tracing::{info, instrument};

use crate::database::connection::DbConnection;
use crate::database::utils::map_not_found_as_none;
use crate::error::RequestError;
use crate::models::lead::{CreateLeadRequest, Lead, LeadId};

impl DbConnection {
    pub async fn create_lead(&self, request: &CreateLeadRequest) -> Result<Lead, SqlxError> {
        let lead = insert_lead(self.pool(), request).await?;
        info!("captured lead {}", lead.id);
        Ok(lead)
    }

    pub async fn list_leads(&self) -> Result<Vec<Lead>, SqlxError> {
        all_leads(self.pool()).await
    }

    pub async fn delete_lead(&self, id: LeadId) -> Result<Lead, RequestError> {
        map_not_found_as_none(delete_lead_row(self.pool(), id).await)?.ok_or(
            RequestError::NotFound { entity: "lead" },
        )
    }
}

#[instrument(skip_all)]
pub async fn insert_lead<'a, E: PgExecutor<'a>>(
    executor: E,
    request: &CreateLeadRequest,
) -> Result<Lead, SqlxError> {
    sqlx::query_as(
        "
    INSERT INTO leads (name, email, phone, source, created_at)
    VALUES ($1, $2, $3, $4, current_timestamp)
    RETURNING id, name, email, phone, source, created_at;
    ",
    )
    .bind(&request.name)
    .bind(&request.email)
    .bind(request.phone.as_ref())
    .bind(request.source.as_ref())
    .fetch_one(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn all_leads<'a, E: PgExecutor<'a>>(executor: E) -> Result<Vec<Lead>, SqlxError> {
    sqlx::query_as(
        "
    SELECT id, name, email, phone, source, created_at FROM leads ORDER BY created_at DESC;
    ",
    )
    .fetch_all(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn delete_lead_row<'a, E: PgExecutor<'a>>(
    executor: E,
    id: LeadId,
) -> Result<Lead, SqlxError> {
    sqlx::query_as(
        "
    DELETE FROM leads WHERE id = $1
    RETURNING id, name, email, phone, source, created_at;
    ",
    )
    .bind(id)
    .fetch_one(executor)
    .await
}

use sqlx::{Error as SqlxError, PgExecutor};
use tracing::{info, instrument};

use crate::database::connection::DbConnection;
use crate::database::utils::map_not_found_as_none;
use crate::error::RequestError;
use crate::models::support::{CreateTicketRequest, Ticket, TicketId};

impl DbConnection {
    pub async fn create_ticket(&self, request: &CreateTicketRequest) -> Result<Ticket, SqlxError> {
        let ticket = insert_ticket(self.pool(), request).await?;
        info!("created support ticket {}", ticket.id);
        Ok(ticket)
    }

    pub async fn list_tickets(&self) -> Result<Vec<Ticket>, SqlxError> {
        all_tickets(self.pool()).await
    }

    pub async fn get_ticket(&self, id: TicketId) -> Result<Ticket, RequestError> {
        map_not_found_as_none(ticket_by_id(self.pool(), id).await)?.ok_or(
            RequestError::NotFound {
                entity: "support ticket",
            },
        )
    }

    pub async fn close_ticket(&self, id: TicketId) -> Result<Ticket, RequestError> {
        let ticket = map_not_found_as_none(close_ticket_row(self.pool(), id).await)?.ok_or(
            RequestError::NotFound {
                entity: "support ticket",
            },
        )?;
        info!("closed support ticket {id}");
        Ok(ticket)
    }

    pub async fn delete_ticket(&self, id: TicketId) -> Result<Ticket, RequestError> {
        map_not_found_as_none(delete_ticket_row(self.pool(), id).await)?.ok_or(
            RequestError::NotFound {
                entity: "support ticket",
            },
        )
    }
}

#[instrument(skip_all)]
pub async fn insert_ticket<'a, E: PgExecutor<'a>>(
    executor: E,
    request: &CreateTicketRequest,
) -> Result<Ticket, SqlxError> {
    sqlx::query_as(
        "
    INSERT INTO support_tickets (name, email, subject, message, status, created_at)
    VALUES ($1, $2, $3, $4, 'open', current_timestamp)
    RETURNING id, name, email, subject, message, status, created_at;
    ",
    )
    .bind(&request.name)
    .bind(&request.email)
    .bind(&request.subject)
    .bind(&request.message)
    .fetch_one(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn all_tickets<'a, E: PgExecutor<'a>>(executor: E) -> Result<Vec<Ticket>, SqlxError> {
    sqlx::query_as(
        "
    SELECT id, name, email, subject, message, status, created_at
    FROM support_tickets
    ORDER BY created_at DESC;
    ",
    )
    .fetch_all(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn ticket_by_id<'a, E: PgExecutor<'a>>(
    executor: E,
    id: TicketId,
) -> Result<Ticket, SqlxError> {
    sqlx::query_as(
        "
    SELECT id, name, email, subject, message, status, created_at
    FROM support_tickets
    WHERE id = $1;
    ",
    )
    .bind(id)
    .fetch_one(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn close_ticket_row<'a, E: PgExecutor<'a>>(
    executor: E,
    id: TicketId,
) -> Result<Ticket, SqlxError> {
    sqlx::query_as(
        "
    UPDATE support_tickets
    SET status = 'closed'
    WHERE id = $1
    RETURNING id, name, email, subject, message, status, created_at;
    ",
    )
    .bind(id)
    .fetch_one(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn delete_ticket_row<'a, E: PgExecutor<'a>>(
    executor: E,
    id: TicketId,
) -> Result<Ticket, SqlxError> {
    sqlx::query_as(
        "
    DELETE FROM support_tickets
    WHERE id = $1
    RETURNING id, name, email, subject, message, status, created_at;
    ",
    )
    .bind(id)
    .fetch_one(executor)
    .await
}

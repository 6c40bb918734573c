use sqlx::{Error as SqlxError, Postgres, Transaction};
use tracing::instrument;

use crate::database::connection::DbConnection;

impl DbConnection {
    pub async fn init_schema(&self) -> Result<(), SqlxError> {
        let mut transaction = self.pool().begin().await?;
        create_all_types(&mut transaction).await?;
        create_all_tables(&mut transaction).await?;
        transaction.commit().await?;
        Ok(())
    }

    pub async fn drop_schema(&self) -> Result<(), SqlxError> {
        let mut transaction = self.pool().begin().await?;
        drop_all_tables(&mut transaction).await?;
        drop_all_types(&mut transaction).await?;
        transaction.commit().await?;
        Ok(())
    }
}

#[instrument(skip_all)]
pub async fn create_all_types(
    transaction: &mut Transaction<'_, Postgres>,
) -> Result<(), SqlxError> {
    sqlx::query("CREATE TYPE resource_kind AS ENUM ('video', 'image', 'pdf');")
        .execute(transaction.as_mut())
        .await?;
    sqlx::query("CREATE TYPE storage_provider AS ENUM ('cloud', 'external');")
        .execute(transaction.as_mut())
        .await?;
    sqlx::query("CREATE TYPE ticket_status AS ENUM ('open', 'closed');")
        .execute(transaction.as_mut())
        .await?;
    Ok(())
}

#[instrument(skip_all)]
pub async fn drop_all_types(transaction: &mut Transaction<'_, Postgres>) -> Result<(), SqlxError> {
    let statements = [
        "DROP TYPE IF EXISTS ticket_status;",
        "DROP TYPE IF EXISTS storage_provider;",
        "DROP TYPE IF EXISTS resource_kind;",
    ];
    for statement in &statements {
        sqlx::query(statement).execute(transaction.as_mut()).await?;
    }
    Ok(())
}

#[instrument(skip_all)]
pub async fn create_all_tables(
    transaction: &mut Transaction<'_, Postgres>,
) -> Result<(), SqlxError> {
    sqlx::query(
        "
            CREATE TABLE categories (
                id              uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                name            VARCHAR(80) NOT NULL,
                description     VARCHAR(255) NOT NULL,
                created_at      TIMESTAMPTZ NOT NULL
            );
        ",
    )
    .execute(transaction.as_mut())
    .await?;
    sqlx::query(
        "
            CREATE TABLE resources (
                id              uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                title           VARCHAR(120) NOT NULL,
                description     VARCHAR(1024) NOT NULL,
                url             VARCHAR(2048) NOT NULL,
                kind            resource_kind NOT NULL,
                published       BOOLEAN NOT NULL DEFAULT FALSE,
                storage         storage_provider NOT NULL,
                category_id     uuid NOT NULL REFERENCES categories(id),
                created_at      TIMESTAMPTZ NOT NULL,
                updated_at      TIMESTAMPTZ NOT NULL
            );
        ",
    )
    .execute(transaction.as_mut())
    .await?;
    sqlx::query(
        "
            CREATE TABLE support_tickets (
                id              uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                name            VARCHAR(80) NOT NULL,
                email           VARCHAR(120) NOT NULL,
                subject         VARCHAR(160) NOT NULL,
                message         VARCHAR(4096) NOT NULL,
                status          ticket_status NOT NULL DEFAULT 'open',
                created_at      TIMESTAMPTZ NOT NULL
            );
        ",
    )
    .execute(transaction.as_mut())
    .await?;
    sqlx::query(
        "
            CREATE TABLE leads (
                id              uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                name            VARCHAR(80) NOT NULL,
                email           VARCHAR(120) NOT NULL,
                phone           VARCHAR(40),
                source          VARCHAR(80),
                created_at      TIMESTAMPTZ NOT NULL
            );
        ",
    )
    .execute(transaction.as_mut())
    .await?;
    Ok(())
}

#[instrument(skip_all)]
pub async fn drop_all_tables(transaction: &mut Transaction<'_, Postgres>) -> Result<(), SqlxError> {
    let statements = [
        "DROP TABLE IF EXISTS leads;",
        "DROP TABLE IF EXISTS support_tickets;",
        "DROP TABLE IF EXISTS resources;",
        "DROP TABLE IF EXISTS categories;",
    ];
    for statement in &statements {
        sqlx::query(statement).execute(transaction.as_mut()).await?;
    }
    Ok(())
}

use sqlx::{Error as SqlxError, PgExecutor, Row};
use tracing::{info, instrument};

use crate::database::categories::category_exists;
use crate::database::connection::DbConnection;
use crate::database::utils::map_not_found_as_none;
use crate::error::{RequestError, ValidationError};
use crate::models::category::CategoryId;
use crate::models::resource::{
    CreateResourceRequest, ResourceId, ResourceResponse, UpdateResourceRequest,
};

impl DbConnection {
    /// Referential check and insert run in one transaction so a resource row
    /// can never land under a category that vanished in between.
    pub async fn create_resource(
        &self,
        request: &CreateResourceRequest,
    ) -> Result<ResourceResponse, RequestError> {
        let mut transaction = self.pool().begin().await?;
        if !category_exists(transaction.as_mut(), request.category_id).await? {
            return Err(ValidationError::UnknownCategory {
                id: request.category_id,
            }
            .into());
        }
        let id = insert_resource(transaction.as_mut(), request).await?;
        let resource = resource_by_id(transaction.as_mut(), id).await?;
        transaction.commit().await?;
        info!("created resource {id} under category {}", request.category_id);
        Ok(resource)
    }

    pub async fn list_resources(
        &self,
        published: bool,
    ) -> Result<Vec<ResourceResponse>, SqlxError> {
        resources_by_published(self.pool(), published).await
    }

    pub async fn get_resource(&self, id: ResourceId) -> Result<ResourceResponse, RequestError> {
        map_not_found_as_none(resource_by_id(self.pool(), id).await)?.ok_or(
            RequestError::NotFound {
                entity: "resource",
            },
        )
    }

    pub async fn update_resource(
        &self,
        id: ResourceId,
        request: &UpdateResourceRequest,
    ) -> Result<ResourceResponse, RequestError> {
        let mut transaction = self.pool().begin().await?;
        let updated = map_not_found_as_none(
            update_resource_row(transaction.as_mut(), id, request).await,
        )?
        .ok_or(RequestError::NotFound {
            entity: "resource",
        })?;
        let resource = resource_by_id(transaction.as_mut(), updated).await?;
        transaction.commit().await?;
        Ok(resource)
    }

    /// Removes the row and returns its last known state.
    pub async fn delete_resource(&self, id: ResourceId) -> Result<ResourceResponse, RequestError> {
        let mut transaction = self.pool().begin().await?;
        let resource = map_not_found_as_none(resource_by_id(transaction.as_mut(), id).await)?
            .ok_or(RequestError::NotFound {
                entity: "resource",
            })?;
        delete_resource_row(transaction.as_mut(), id).await?;
        transaction.commit().await?;
        info!("deleted resource {id}");
        Ok(resource)
    }
}

const RESOURCE_COLUMNS: &str = "
        resources.id AS id, resources.title AS title, resources.description AS description,
        resources.url AS url, resources.kind AS kind, resources.published AS published,
        resources.storage AS storage, resources.category_id AS category_id,
        categories.name AS category_name,
        resources.created_at AS created_at, resources.updated_at AS updated_at";

#[instrument(skip_all)]
pub async fn insert_resource<'a, E: PgExecutor<'a>>(
    executor: E,
    request: &CreateResourceRequest,
) -> Result<ResourceId, SqlxError> {
    sqlx::query(
        "
    INSERT INTO resources (title, description, url, kind, published, storage, category_id, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, current_timestamp, current_timestamp)
    RETURNING id;
    ",
    )
    .bind(&request.title)
    .bind(&request.description)
    .bind(&request.url)
    .bind(request.kind)
    .bind(request.published)
    .bind(request.storage)
    .bind(request.category_id)
    .fetch_one(executor)
    .await?
    .try_get("id")
}

#[instrument(skip(executor))]
pub async fn resource_by_id<'a, E: PgExecutor<'a>>(
    executor: E,
    id: ResourceId,
) -> Result<ResourceResponse, SqlxError> {
    sqlx::query_as(&format!(
        "
    SELECT {RESOURCE_COLUMNS}
    FROM resources JOIN categories ON resources.category_id = categories.id
    WHERE resources.id = $1;
    "
    ))
    .bind(id)
    .fetch_one(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn resources_by_published<'a, E: PgExecutor<'a>>(
    executor: E,
    published: bool,
) -> Result<Vec<ResourceResponse>, SqlxError> {
    sqlx::query_as(&format!(
        "
    SELECT {RESOURCE_COLUMNS}
    FROM resources JOIN categories ON resources.category_id = categories.id
    WHERE resources.published = $1
    ORDER BY resources.created_at DESC;
    "
    ))
    .bind(published)
    .fetch_all(executor)
    .await
}

/// Association order is insertion order, oldest first.
#[instrument(skip(executor))]
pub async fn resources_in_category<'a, E: PgExecutor<'a>>(
    executor: E,
    category_id: CategoryId,
) -> Result<Vec<ResourceResponse>, SqlxError> {
    sqlx::query_as(&format!(
        "
    SELECT {RESOURCE_COLUMNS}
    FROM resources JOIN categories ON resources.category_id = categories.id
    WHERE resources.category_id = $1
    ORDER BY resources.created_at;
    "
    ))
    .bind(category_id)
    .fetch_all(executor)
    .await
}

#[instrument(skip(executor, request))]
pub async fn update_resource_row<'a, E: PgExecutor<'a>>(
    executor: E,
    id: ResourceId,
    request: &UpdateResourceRequest,
) -> Result<ResourceId, SqlxError> {
    sqlx::query(
        "
    UPDATE resources
    SET title = COALESCE($2, title), description = COALESCE($3, description),
        kind = COALESCE($4, kind), published = COALESCE($5, published),
        url = COALESCE($6, url), storage = COALESCE($7, storage),
        updated_at = current_timestamp
    WHERE id = $1
    RETURNING id;
    ",
    )
    .bind(id)
    .bind(request.title.as_ref())
    .bind(request.description.as_ref())
    .bind(request.kind)
    .bind(request.published)
    .bind(request.url.as_ref())
    .bind(request.storage)
    .fetch_one(executor)
    .await?
    .try_get("id")
}

#[instrument(skip(executor))]
pub async fn delete_resource_row<'a, E: PgExecutor<'a>>(
    executor: E,
    id: ResourceId,
) -> Result<(), SqlxError> {
    sqlx::query("DELETE FROM resources WHERE id = $1;")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

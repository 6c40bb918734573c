use sqlx::{Error as SqlxError, PgExecutor};
use tracing::{info, instrument};

use crate::database::connection::DbConnection;
use crate::database::resources::resources_in_category;
use crate::database::utils::map_not_found_as_none;
use crate::error::RequestError;
use crate::models::category::{
    Category, CategoryDetailResponse, CategoryId, CreateCategoryRequest, UpdateCategoryRequest,
};

impl DbConnection {
    pub async fn create_category(
        &self,
        request: &CreateCategoryRequest,
    ) -> Result<Category, SqlxError> {
        let category = insert_category(self.pool(), request).await?;
        info!("created category {} ({})", category.id, category.name);
        Ok(category)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, SqlxError> {
        all_categories(self.pool()).await
    }

    pub async fn category_detail(
        &self,
        id: CategoryId,
    ) -> Result<CategoryDetailResponse, RequestError> {
        let category = map_not_found_as_none(category_by_id(self.pool(), id).await)?
            .ok_or(RequestError::NotFound {
                entity: "category",
            })?;
        let resources = resources_in_category(self.pool(), id).await?;
        Ok(CategoryDetailResponse {
            category,
            resources,
        })
    }

    pub async fn update_category(
        &self,
        id: CategoryId,
        request: &UpdateCategoryRequest,
    ) -> Result<Category, RequestError> {
        map_not_found_as_none(update_category_row(self.pool(), id, request).await)?.ok_or(
            RequestError::NotFound {
                entity: "category",
            },
        )
    }

    /// Refuses to orphan resources: a category that still owns any cannot be
    /// deleted, the caller has to move or remove them first.
    pub async fn delete_category(&self, id: CategoryId) -> Result<Category, RequestError> {
        let mut transaction = self.pool().begin().await?;
        let category = map_not_found_as_none(category_by_id(transaction.as_mut(), id).await)?
            .ok_or(RequestError::NotFound {
                entity: "category",
            })?;
        let owned = count_resources_in_category(transaction.as_mut(), id).await?;
        if owned > 0 {
            return Err(RequestError::Conflict(format!(
                "category `{}` still owns {owned} resource(s)",
                category.name
            )));
        }
        delete_category_row(transaction.as_mut(), id).await?;
        transaction.commit().await?;
        info!("deleted category {id}");
        Ok(category)
    }
}

#[instrument(skip(executor))]
pub async fn insert_category<'a, E: PgExecutor<'a>>(
    executor: E,
    request: &CreateCategoryRequest,
) -> Result<Category, SqlxError> {
    sqlx::query_as(
        "
    INSERT INTO categories (name, description, created_at)
    VALUES ($1, $2, current_timestamp)
    RETURNING id, name, description, created_at;
    ",
    )
    .bind(&request.name)
    .bind(&request.description)
    .fetch_one(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn all_categories<'a, E: PgExecutor<'a>>(
    executor: E,
) -> Result<Vec<Category>, SqlxError> {
    sqlx::query_as(
        "
    SELECT id, name, description, created_at FROM categories ORDER BY created_at;
    ",
    )
    .fetch_all(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn category_by_id<'a, E: PgExecutor<'a>>(
    executor: E,
    id: CategoryId,
) -> Result<Category, SqlxError> {
    sqlx::query_as(
        "
    SELECT id, name, description, created_at FROM categories WHERE id = $1;
    ",
    )
    .bind(id)
    .fetch_one(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn category_exists<'a, E: PgExecutor<'a>>(
    executor: E,
    id: CategoryId,
) -> Result<bool, SqlxError> {
    sqlx::query_scalar(
        "
    SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1);
    ",
    )
    .bind(id)
    .fetch_one(executor)
    .await
}

#[instrument(skip(executor, request))]
pub async fn update_category_row<'a, E: PgExecutor<'a>>(
    executor: E,
    id: CategoryId,
    request: &UpdateCategoryRequest,
) -> Result<Category, SqlxError> {
    sqlx::query_as(
        "
    UPDATE categories
    SET name = COALESCE($2, name), description = COALESCE($3, description)
    WHERE id = $1
    RETURNING id, name, description, created_at;
    ",
    )
    .bind(id)
    .bind(request.name.as_ref())
    .bind(request.description.as_ref())
    .fetch_one(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn count_resources_in_category<'a, E: PgExecutor<'a>>(
    executor: E,
    id: CategoryId,
) -> Result<i64, SqlxError> {
    sqlx::query_scalar(
        "
    SELECT COUNT(*) FROM resources WHERE category_id = $1;
    ",
    )
    .bind(id)
    .fetch_one(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn delete_category_row<'a, E: PgExecutor<'a>>(
    executor: E,
    id: CategoryId,
) -> Result<(), SqlxError> {
    sqlx::query("DELETE FROM categories WHERE id = $1;")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

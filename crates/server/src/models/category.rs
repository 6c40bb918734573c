use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::resource::ResourceResponse;

pub type CategoryId = sqlx::types::Uuid;
const CATEGORY_NAME_LENGTH_LIMIT: usize = 80;
const CATEGORY_DESCRIPTION_LENGTH_LIMIT: usize = 255;

#[derive(Clone, Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Category with its owned resources expanded, association order preserved.
#[derive(Clone, Debug, Serialize)]
pub struct CategoryDetailResponse {
    #[serde(flatten)]
    pub category: Category,
    pub resources: Vec<ResourceResponse>,
}

pub fn validate_category_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::InvalidInput {
            value: name.to_string(),
            reason: "category name cannot be empty".to_string(),
        });
    }
    if name.len() > CATEGORY_NAME_LENGTH_LIMIT {
        return Err(ValidationError::LimitExceeded {
            subject: "category name".to_string(),
            unit: "char".to_string(),
            attempted: name.len(),
            limit: CATEGORY_NAME_LENGTH_LIMIT,
        });
    }
    Ok(())
}

pub fn validate_category_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        return Err(ValidationError::InvalidInput {
            value: description.to_string(),
            reason: "category description cannot be empty".to_string(),
        });
    }
    if description.len() > CATEGORY_DESCRIPTION_LENGTH_LIMIT {
        return Err(ValidationError::LimitExceeded {
            subject: "category description".to_string(),
            unit: "char".to_string(),
            attempted: description.len(),
            limit: CATEGORY_DESCRIPTION_LENGTH_LIMIT,
        });
    }
    Ok(())
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::ValidationError;
use crate::models::category::CategoryId;

pub type ResourceId = sqlx::types::Uuid;
const RESOURCE_TITLE_LENGTH_LIMIT: usize = 120;
const RESOURCE_DESCRIPTION_LENGTH_LIMIT: usize = 1024;

#[derive(
    Clone, Debug, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "resource_kind")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResourceKind {
    Video,
    Image,
    Pdf,
}

/// Where the resource's file lives: uploaded to the media provider, or an
/// external link supplied by the caller. Written once at create/update time
/// so cleanup never has to guess from the url shape.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Display, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "storage_provider")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StorageProvider {
    Cloud,
    External,
}

#[derive(Clone, Debug)]
pub struct CreateResourceRequest {
    pub title: String,
    pub description: String,
    pub url: String,
    pub kind: ResourceKind,
    pub published: bool,
    pub storage: StorageProvider,
    pub category_id: CategoryId,
}

#[derive(Clone, Debug, Default)]
pub struct UpdateResourceRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<ResourceKind>,
    pub published: Option<bool>,
    pub url: Option<String>,
    pub storage: Option<StorageProvider>,
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct ResourceResponse {
    pub id: ResourceId,
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub published: bool,
    pub storage: StorageProvider,
    pub category_id: CategoryId,
    pub category_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResourceEnvelope {
    pub message: String,
    pub resource: ResourceResponse,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResourceListEnvelope {
    pub resources: Vec<ResourceResponse>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResourceBody {
    pub resource: ResourceResponse,
}

#[derive(Clone, Debug, Serialize)]
pub struct MessageEnvelope {
    pub message: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ListResourcesQuery {
    pub published: Option<bool>,
}

pub fn validate_resource_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::InvalidInput {
            value: title.to_string(),
            reason: "resource title cannot be empty".to_string(),
        });
    }
    if title.len() > RESOURCE_TITLE_LENGTH_LIMIT {
        return Err(ValidationError::LimitExceeded {
            subject: "resource title".to_string(),
            unit: "char".to_string(),
            attempted: title.len(),
            limit: RESOURCE_TITLE_LENGTH_LIMIT,
        });
    }
    Ok(())
}

pub fn validate_resource_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        return Err(ValidationError::InvalidInput {
            value: description.to_string(),
            reason: "resource description cannot be empty".to_string(),
        });
    }
    if description.len() > RESOURCE_DESCRIPTION_LENGTH_LIMIT {
        return Err(ValidationError::LimitExceeded {
            subject: "resource description".to_string(),
            unit: "char".to_string(),
            attempted: description.len(),
            limit: RESOURCE_DESCRIPTION_LENGTH_LIMIT,
        });
    }
    Ok(())
}

/// A caller-supplied link must at least parse as an absolute url. Uploaded
/// files skip this check, their url comes back from the provider.
pub fn validate_source_url(url: &str) -> Result<(), ValidationError> {
    url::Url::parse(url).map_err(|e| ValidationError::InvalidInput {
        value: url.to_string(),
        reason: format!("url is not valid: {e}"),
    })?;
    Ok(())
}

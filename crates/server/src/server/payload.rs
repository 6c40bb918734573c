use axum::async_trait;
use axum::extract::multipart::Field;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{RequestError, ValidationError};
use crate::models::category::CategoryId;
use crate::models::resource::ResourceKind;
use crate::storage::UploadFile;

/// Text fields shared by resource create and update. Wire names follow the
/// public API (`type`, `category`); everything is optional here, the handlers
/// decide what is required.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ResourceFields {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ResourceKind>,
    pub published: Option<bool>,
    #[serde(rename = "category")]
    pub category_id: Option<CategoryId>,
    pub url: Option<String>,
}

/// Body of a resource create/update request: either a json document or a
/// multipart form with an optional `file` part.
#[derive(Debug)]
pub struct ResourcePayload {
    pub fields: ResourceFields,
    pub file: Option<UploadFile>,
}

#[async_trait]
impl<S> FromRequest<S> for ResourcePayload
where
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| invalid("body", e.to_string()))?;
            from_multipart(multipart).await
        } else {
            let Json(fields) = Json::<ResourceFields>::from_request(req, state)
                .await
                .map_err(|e| invalid("body", e.to_string()))?;
            Ok(Self { fields, file: None })
        }
    }
}

async fn from_multipart(mut multipart: Multipart) -> Result<ResourcePayload, RequestError> {
    let mut fields = ResourceFields::default();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| invalid("body", e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("title") => fields.title = Some(text(field, "title").await?),
            Some("description") => fields.description = Some(text(field, "description").await?),
            Some("url") => fields.url = Some(text(field, "url").await?),
            Some("type") => {
                let value = text(field, "type").await?;
                let kind = value
                    .parse::<ResourceKind>()
                    .map_err(|_| invalid(&value, "expected one of video, image, pdf"))?;
                fields.kind = Some(kind);
            }
            Some("published") => {
                let value = text(field, "published").await?;
                let published = value
                    .parse::<bool>()
                    .map_err(|_| invalid(&value, "expected true or false"))?;
                fields.published = Some(published);
            }
            Some("category") => {
                let value = text(field, "category").await?;
                let id = Uuid::parse_str(&value)
                    .map_err(|_| invalid(&value, "expected a category id"))?;
                fields.category_id = Some(id);
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| invalid("file", e.to_string()))?;
                file = Some(UploadFile {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {} // Ignore unknown fields.
        }
    }

    Ok(ResourcePayload { fields, file })
}

async fn text(field: Field<'_>, name: &str) -> Result<String, RequestError> {
    field
        .text()
        .await
        .map_err(|e| invalid(name, format!("failed to read field: {e}")))
}

fn invalid(value: &str, reason: impl Into<String>) -> RequestError {
    ValidationError::InvalidInput {
        value: value.to_string(),
        reason: reason.into(),
    }
    .into()
}

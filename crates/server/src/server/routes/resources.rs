use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{RequestError, ValidationError};
use crate::models::category::CategoryId;
use crate::models::resource::{
    validate_resource_description, validate_resource_title, validate_source_url,
    CreateResourceRequest, ListResourcesQuery, MessageEnvelope, ResourceBody, ResourceEnvelope,
    ResourceId, ResourceKind, ResourceListEnvelope, StorageProvider, UpdateResourceRequest,
};
use crate::server::payload::{ResourceFields, ResourcePayload};
use crate::server::state::AppState;
use crate::storage::{delete_best_effort, MediaStorage, UploadFile};

pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: ResourcePayload,
) -> Result<(StatusCode, Json<ResourceEnvelope>), RequestError> {
    let ResourcePayload { mut fields, file } = payload;
    let source_url = fields.url.take();
    let draft = ResourceDraft::from_fields(fields)?;
    let (url, storage) = resolve_source(&*state.media_storage, file, source_url).await?;
    let request = CreateResourceRequest {
        title: draft.title,
        description: draft.description,
        url,
        kind: draft.kind,
        published: draft.published,
        storage,
        category_id: draft.category_id,
    };
    let resource = state.db_connection.create_resource(&request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ResourceEnvelope {
            message: "resource created".to_string(),
            resource,
        }),
    ))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ResourceId>,
    payload: ResourcePayload,
) -> Result<Json<ResourceEnvelope>, RequestError> {
    let existing = state.db_connection.get_resource(id).await?;
    let ResourcePayload { mut fields, file } = payload;
    if let Some(title) = fields.title.as_deref() {
        validate_resource_title(title)?;
    }
    if let Some(description) = fields.description.as_deref() {
        validate_resource_description(description)?;
    }

    // Replacing the source drops the old provider asset first; the cleanup
    // must not block the update itself.
    let source_url = fields.url.take();
    let replacement = if file.is_some() || source_url.is_some() {
        if existing.storage == StorageProvider::Cloud {
            delete_best_effort(&*state.media_storage, &existing.url).await;
        }
        Some(resolve_source(&*state.media_storage, file, source_url).await?)
    } else {
        None
    };
    let (url, storage) = match replacement {
        Some((url, storage)) => (Some(url), Some(storage)),
        None => (None, None),
    };

    let request = UpdateResourceRequest {
        title: fields.title,
        description: fields.description,
        kind: fields.kind,
        published: fields.published,
        url,
        storage,
    };
    let resource = state.db_connection.update_resource(id, &request).await?;
    Ok(Json(ResourceEnvelope {
        message: "resource updated".to_string(),
        resource,
    }))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListResourcesQuery>,
) -> Result<Json<ResourceListEnvelope>, RequestError> {
    let published = query.published.unwrap_or(true);
    let resources = state.db_connection.list_resources(published).await?;
    Ok(Json(ResourceListEnvelope { resources }))
}

pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ResourceId>,
) -> Result<Json<ResourceBody>, RequestError> {
    let resource = state.db_connection.get_resource(id).await?;
    Ok(Json(ResourceBody { resource }))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ResourceId>,
) -> Result<Json<MessageEnvelope>, RequestError> {
    let resource = state.db_connection.delete_resource(id).await?;
    if resource.storage == StorageProvider::Cloud {
        delete_best_effort(&*state.media_storage, &resource.url).await;
    }
    Ok(Json(MessageEnvelope {
        message: "resource deleted".to_string(),
    }))
}

#[derive(Debug)]
struct ResourceDraft {
    title: String,
    description: String,
    kind: ResourceKind,
    published: bool,
    category_id: CategoryId,
}

impl ResourceDraft {
    fn from_fields(fields: ResourceFields) -> Result<Self, RequestError> {
        let title = fields.title.ok_or_else(|| missing("title"))?;
        validate_resource_title(&title)?;
        let description = fields.description.ok_or_else(|| missing("description"))?;
        validate_resource_description(&description)?;
        let kind = fields.kind.ok_or_else(|| missing("type"))?;
        let category_id = fields.category_id.ok_or_else(|| missing("category"))?;
        Ok(Self {
            title,
            description,
            kind,
            published: fields.published.unwrap_or(false),
            category_id,
        })
    }
}

fn missing(field: &str) -> RequestError {
    ValidationError::InvalidInput {
        value: field.to_string(),
        reason: "field is required".to_string(),
    }
    .into()
}

/// Picks the single source of truth for the resource url: an uploaded file
/// wins over a supplied link, a supplied link must parse, and one of the two
/// must be present.
pub(crate) async fn resolve_source(
    storage: &dyn MediaStorage,
    file: Option<UploadFile>,
    url: Option<String>,
) -> Result<(String, StorageProvider), RequestError> {
    if let Some(file) = file {
        let outcome = storage.upload(file).await?;
        Ok((outcome.secure_url, StorageProvider::Cloud))
    } else if let Some(url) = url {
        validate_source_url(&url)?;
        Ok((url, StorageProvider::External))
    } else {
        Err(ValidationError::MissingSource.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::testing::RecordingStorage;

    fn upload(name: &str) -> UploadFile {
        UploadFile {
            filename: name.to_string(),
            content_type: "application/pdf".to_string(),
            bytes: b"%PDF-1.4".to_vec(),
        }
    }

    #[tokio::test]
    async fn uploaded_file_wins_over_supplied_url() {
        let storage = RecordingStorage::default();
        let (url, provider) = resolve_source(
            &storage,
            Some(upload("deck.pdf")),
            Some("not-a-url".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(provider, StorageProvider::Cloud);
        assert_eq!(url, "https://media.example.com/assets/deck.pdf");
        assert_eq!(storage.uploads.lock().unwrap().as_slice(), ["deck.pdf"]);
    }

    #[tokio::test]
    async fn supplied_url_is_kept_as_is() {
        let storage = RecordingStorage::default();
        let (url, provider) =
            resolve_source(&storage, None, Some("https://example.com/a.pdf".to_string()))
                .await
                .unwrap();

        assert_eq!(provider, StorageProvider::External);
        assert_eq!(url, "https://example.com/a.pdf");
        assert!(storage.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_url_is_rejected() {
        let storage = RecordingStorage::default();
        let err = resolve_source(&storage, None, Some("not-a-url".to_string()))
            .await
            .expect_err("expected invalid input error");

        assert!(matches!(
            err,
            RequestError::Validation(ValidationError::InvalidInput { value, .. }) if value == "not-a-url"
        ));
    }

    #[tokio::test]
    async fn missing_source_is_rejected() {
        let storage = RecordingStorage::default();
        let err = resolve_source(&storage, None, None)
            .await
            .expect_err("expected missing source error");

        assert!(matches!(
            err,
            RequestError::Validation(ValidationError::MissingSource)
        ));
    }

    #[test]
    fn draft_requires_title_type_and_category() {
        let err = ResourceDraft::from_fields(ResourceFields::default())
            .expect_err("expected invalid input error");
        assert!(matches!(
            err,
            RequestError::Validation(ValidationError::InvalidInput { value, .. }) if value == "title"
        ));
    }

    #[test]
    fn draft_defaults_published_to_false() {
        let fields = ResourceFields {
            title: Some("T".to_string()),
            description: Some("D".to_string()),
            kind: Some(ResourceKind::Pdf),
            published: None,
            category_id: Some(uuid::Uuid::new_v4()),
            url: None,
        };
        let draft = ResourceDraft::from_fields(fields).unwrap();
        assert!(!draft.published);
    }
}

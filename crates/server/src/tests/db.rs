use std::sync::Arc;

use axum::extract::{Path, Query, State};
use once_cell::sync::Lazy;
use tokio::sync::Mutex;

use crate::config::{AppConfig, ServerConfig};
use crate::database::connection::{DbConfig, DbConnection};
use crate::error::{RequestError, ValidationError};
use crate::models::category::CreateCategoryRequest;
use crate::models::resource::{
    CreateResourceRequest, ListResourcesQuery, ResourceKind, StorageProvider,
};
use crate::models::support::{CreateTicketRequest, TicketStatus};
use crate::server::payload::{ResourceFields, ResourcePayload};
use crate::server::routes;
use crate::server::state::AppState;
use crate::storage::remote::StorageConfig;
use crate::storage::testing::RecordingStorage;
use crate::storage::UploadFile;

/// Some tests can't run in parallel, prevent them from breaking each other's state
static SERIAL_LOCK: Lazy<Mutex<()>> = Lazy::new(Mutex::default);

async fn init_and_get_db() -> DbConnection {
    let _ = tracing_subscriber::fmt::try_init();

    let config = DbConfig::development("beacon_db", "beacon_guest", "beaconpass");
    let db = DbConnection::connect(&config).await.unwrap();
    db.drop_schema().await.unwrap();
    db.init_schema().await.unwrap();
    db
}

async fn init_and_get_state() -> (Arc<AppState>, Arc<RecordingStorage>) {
    let db_connection = init_and_get_db().await;
    let recorder = Arc::new(RecordingStorage::default());
    let config = AppConfig {
        server: ServerConfig {
            address: "127.0.0.1:0".to_string(),
        },
        database: DbConfig::development("beacon_db", "beacon_guest", "beaconpass"),
        storage: StorageConfig {
            endpoint: "https://media.example.com/v1".to_string(),
            api_key: "test-key".to_string(),
            timeout_secs: 5,
            chunk_size_bytes: 1024 * 1024,
        },
    };
    let state = Arc::new(AppState {
        config,
        db_connection,
        media_storage: recorder.clone(),
    });
    (state, recorder)
}

fn external_resource(category_id: crate::models::category::CategoryId) -> CreateResourceRequest {
    CreateResourceRequest {
        title: "Onboarding deck".to_string(),
        description: "Slides for new hires".to_string(),
        url: "https://example.com/deck.pdf".to_string(),
        kind: ResourceKind::Pdf,
        published: true,
        storage: StorageProvider::External,
        category_id,
    }
}

#[tokio::test]
#[ignore = "requires a local postgres instance"]
async fn resource_creation_maintains_category_association() {
    let _lock = SERIAL_LOCK.lock().await;
    let db = init_and_get_db().await;

    let category = db
        .create_category(&CreateCategoryRequest {
            name: "Material".to_string(),
            description: "desc".to_string(),
        })
        .await
        .unwrap();

    let resource = db.create_resource(&external_resource(category.id)).await.unwrap();
    assert_eq!(resource.category_id, category.id);
    assert_eq!(resource.category_name, "Material");

    // the new resource appears in the owning category exactly once
    let detail = db.category_detail(category.id).await.unwrap();
    let owned: Vec<_> = detail
        .resources
        .iter()
        .filter(|r| r.id == resource.id)
        .collect();
    assert_eq!(owned.len(), 1);

    // repeated reads with no writes in between are identical
    let first = db.get_resource(resource.id).await.unwrap();
    let second = db.get_resource(resource.id).await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(first.url, second.url);
    assert_eq!(first.updated_at, second.updated_at);
}

#[tokio::test]
#[ignore = "requires a local postgres instance"]
async fn resource_creation_rejects_unknown_category() {
    let _lock = SERIAL_LOCK.lock().await;
    let db = init_and_get_db().await;

    let missing = uuid::Uuid::new_v4();
    let err = db
        .create_resource(&external_resource(missing))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RequestError::Validation(ValidationError::UnknownCategory { id }) if id == missing
    ));
}

#[tokio::test]
#[ignore = "requires a local postgres instance"]
async fn published_filter_returns_newest_first() {
    let _lock = SERIAL_LOCK.lock().await;
    let db = init_and_get_db().await;

    let category = db
        .create_category(&CreateCategoryRequest {
            name: "Videos".to_string(),
            description: "published material".to_string(),
        })
        .await
        .unwrap();

    let mut request = external_resource(category.id);
    request.title = "first".to_string();
    db.create_resource(&request).await.unwrap();
    request.title = "second".to_string();
    db.create_resource(&request).await.unwrap();
    request.title = "draft".to_string();
    request.published = false;
    db.create_resource(&request).await.unwrap();

    let published = db.list_resources(true).await.unwrap();
    assert_eq!(published.len(), 2);
    assert!(published.iter().all(|r| r.published));
    assert_eq!(published[0].title, "second");
    assert_eq!(published[1].title, "first");

    let drafts = db.list_resources(false).await.unwrap();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].title, "draft");
}

#[tokio::test]
#[ignore = "requires a local postgres instance"]
async fn category_owning_resources_cannot_be_deleted() {
    let _lock = SERIAL_LOCK.lock().await;
    let db = init_and_get_db().await;

    let category = db
        .create_category(&CreateCategoryRequest {
            name: "Docs".to_string(),
            description: "guides".to_string(),
        })
        .await
        .unwrap();
    let resource = db.create_resource(&external_resource(category.id)).await.unwrap();

    let err = db.delete_category(category.id).await.unwrap_err();
    assert!(matches!(err, RequestError::Conflict(_)));

    // once the resource is gone the category can be removed
    db.delete_resource(resource.id).await.unwrap();
    db.delete_category(category.id).await.unwrap();
    let err = db.category_detail(category.id).await.unwrap_err();
    assert!(matches!(err, RequestError::NotFound { .. }));
}

#[tokio::test]
#[ignore = "requires a local postgres instance"]
async fn replacing_cloud_resource_cleans_up_old_asset() {
    let _lock = SERIAL_LOCK.lock().await;
    let (state, recorder) = init_and_get_state().await;

    let category = state
        .db_connection
        .create_category(&CreateCategoryRequest {
            name: "Uploads".to_string(),
            description: "cloud hosted".to_string(),
        })
        .await
        .unwrap();

    let payload = ResourcePayload {
        fields: ResourceFields {
            title: Some("Intro".to_string()),
            description: Some("welcome video".to_string()),
            kind: Some(ResourceKind::Video),
            published: Some(true),
            category_id: Some(category.id),
            url: None,
        },
        file: Some(UploadFile {
            filename: "intro.mp4".to_string(),
            content_type: "video/mp4".to_string(),
            bytes: vec![0u8; 64],
        }),
    };
    let (_, axum::Json(created)) = routes::resources::create(State(state.clone()), payload)
        .await
        .unwrap();
    let old_url = created.resource.url.clone();
    assert_eq!(created.resource.storage, StorageProvider::Cloud);
    assert_eq!(recorder.uploads.lock().unwrap().len(), 1);

    // replacing the upload deletes exactly the old asset
    let replacement = ResourcePayload {
        fields: ResourceFields::default(),
        file: Some(UploadFile {
            filename: "intro-v2.mp4".to_string(),
            content_type: "video/mp4".to_string(),
            bytes: vec![0u8; 64],
        }),
    };
    let axum::Json(updated) = routes::resources::update(
        State(state.clone()),
        Path(created.resource.id),
        replacement,
    )
    .await
    .unwrap();
    assert_eq!(recorder.deletes.lock().unwrap().as_slice(), [old_url]);

    // removing the resource deletes the replacement asset as well
    routes::resources::remove(State(state.clone()), Path(updated.resource.id))
        .await
        .unwrap();
    assert_eq!(recorder.deletes.lock().unwrap().len(), 2);
    assert_eq!(
        recorder.deletes.lock().unwrap()[1],
        updated.resource.url
    );
}

#[tokio::test]
#[ignore = "requires a local postgres instance"]
async fn external_resources_never_touch_the_provider() {
    let _lock = SERIAL_LOCK.lock().await;
    let (state, recorder) = init_and_get_state().await;

    let category = state
        .db_connection
        .create_category(&CreateCategoryRequest {
            name: "Links".to_string(),
            description: "external".to_string(),
        })
        .await
        .unwrap();
    let resource = state
        .db_connection
        .create_resource(&external_resource(category.id))
        .await
        .unwrap();

    routes::resources::remove(State(state.clone()), Path(resource.id))
        .await
        .unwrap();
    assert!(recorder.deletes.lock().unwrap().is_empty());
    assert!(recorder.uploads.lock().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires a local postgres instance"]
async fn list_handler_defaults_to_published() {
    let _lock = SERIAL_LOCK.lock().await;
    let (state, _recorder) = init_and_get_state().await;

    let category = state
        .db_connection
        .create_category(&CreateCategoryRequest {
            name: "Mixed".to_string(),
            description: "published and drafts".to_string(),
        })
        .await
        .unwrap();
    let mut request = external_resource(category.id);
    state.db_connection.create_resource(&request).await.unwrap();
    request.published = false;
    state.db_connection.create_resource(&request).await.unwrap();

    let axum::Json(default_listing) = routes::resources::list(
        State(state.clone()),
        Query(ListResourcesQuery { published: None }),
    )
    .await
    .unwrap();
    assert_eq!(default_listing.resources.len(), 1);
    assert!(default_listing.resources[0].published);

    let axum::Json(drafts) = routes::resources::list(
        State(state.clone()),
        Query(ListResourcesQuery {
            published: Some(false),
        }),
    )
    .await
    .unwrap();
    assert_eq!(drafts.resources.len(), 1);
    assert!(!drafts.resources[0].published);
}

#[tokio::test]
#[ignore = "requires a local postgres instance"]
async fn support_ticket_lifecycle() {
    let _lock = SERIAL_LOCK.lock().await;
    let db = init_and_get_db().await;

    let ticket = db
        .create_ticket(&CreateTicketRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: "billing".to_string(),
            message: "I was charged twice".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(ticket.status, TicketStatus::Open);

    let closed = db.close_ticket(ticket.id).await.unwrap();
    assert_eq!(closed.status, TicketStatus::Closed);

    db.delete_ticket(ticket.id).await.unwrap();
    let err = db.get_ticket(ticket.id).await.unwrap_err();
    assert!(matches!(err, RequestError::NotFound { .. }));
}

#[tokio::test]
#[ignore = "requires a local postgres instance"]
async fn leads_are_captured_newest_first() {
    let _lock = SERIAL_LOCK.lock().await;
    let db = init_and_get_db().await;

    let first = db
        .create_lead(&crate::models::lead::CreateLeadRequest {
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            phone: None,
            source: Some("landing".to_string()),
        })
        .await
        .unwrap();
    let second = db
        .create_lead(&crate::models::lead::CreateLeadRequest {
            name: "Alan".to_string(),
            email: "alan@example.com".to_string(),
            phone: Some("+1 555 0100".to_string()),
            source: None,
        })
        .await
        .unwrap();

    let leads = db.list_leads().await.unwrap();
    assert_eq!(leads.len(), 2);
    assert_eq!(leads[0].id, second.id);
    assert_eq!(leads[1].id, first.id);

    db.delete_lead(first.id).await.unwrap();
    assert_eq!(db.list_leads().await.unwrap().len(), 1);
}

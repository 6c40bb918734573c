use async_trait::async_trait;
use serde::Deserialize;
use strum_macros::Display;
use thiserror::Error;
use tracing::warn;

pub mod remote;

/// Processing pipeline hint required by the media provider.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Raw,
}

impl MediaKind {
    /// Videos go through the provider's transcoding pipeline, pdf documents
    /// are stored as raw bytes, everything else is treated as an image.
    pub fn classify(content_type: &str, filename: &str) -> Self {
        if content_type.starts_with("video/") {
            return Self::Video;
        }
        let is_pdf = std::path::Path::new(filename)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            Self::Raw
        } else {
            Self::Image
        }
    }
}

/// In-memory upload as it arrives from the multipart request.
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UploadOutcome {
    pub secure_url: String,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("transport failure talking to media provider: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("media provider rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("cannot derive a provider asset id from url: {0}")]
    BadAssetUrl(String),
}

#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Single attempt, fail-fast; the caller decides whether the failure is
    /// fatal for the surrounding operation.
    async fn upload(&self, file: UploadFile) -> Result<UploadOutcome, StorageError>;
    async fn delete(&self, url: &str) -> Result<(), StorageError>;
}

/// Asset cleanup must never abort the resource mutation that triggered it,
/// the database row is the state the user asked to change.
pub async fn delete_best_effort(storage: &dyn MediaStorage, url: &str) {
    if let Err(e) = storage.delete(url).await {
        warn!("failed to delete remote asset behind {url}: {e}");
    }
}

/// The provider addresses assets by the last url path segment without its
/// extension, e.g. `.../assets/abc123.pdf` -> `abc123`.
pub fn asset_id_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let id = match segment.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => segment,
    };
    Some(id.to_string())
}

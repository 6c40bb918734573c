use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_RANGE;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::storage::{asset_id_from_url, MediaKind, MediaStorage, StorageError, UploadFile, UploadOutcome};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub api_key: String,
    #[serde(default = "StorageConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "StorageConfig::default_chunk_size_bytes")]
    pub chunk_size_bytes: usize,
}

impl StorageConfig {
    // Chunking is tuned for large video uploads, smaller files go up whole.
    const DEFAULT_CHUNK_SIZE_BYTES: usize = 20 * 1024 * 1024;
    const DEFAULT_TIMEOUT_SECS: u64 = 120;

    fn default_timeout_secs() -> u64 {
        Self::DEFAULT_TIMEOUT_SECS
    }

    fn default_chunk_size_bytes() -> usize {
        Self::DEFAULT_CHUNK_SIZE_BYTES
    }
}

/// Client for the hosted media provider: uploads are multipart posts against
/// a per-pipeline endpoint, deletes address assets by id.
pub struct RemoteMediaStorage {
    client: reqwest::Client,
    config: StorageConfig,
}

impl RemoteMediaStorage {
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn upload_url(&self, kind: MediaKind) -> String {
        format!("{}/{kind}/upload", self.config.endpoint.trim_end_matches('/'))
    }

    fn delete_url(&self, asset_id: &str) -> String {
        format!(
            "{}/assets/{asset_id}",
            self.config.endpoint.trim_end_matches('/')
        )
    }

    fn file_part(&self, file: &UploadFile, bytes: Vec<u8>) -> Result<Part, StorageError> {
        let part = Part::bytes(bytes)
            .file_name(file.filename.clone())
            .mime_str(&file.content_type)?;
        Ok(part)
    }

    async fn upload_whole(&self, url: &str, file: &UploadFile) -> Result<UploadOutcome, StorageError> {
        let form = Form::new().part("file", self.file_part(file, file.bytes.clone())?);
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;
        check_status(&response)?;
        Ok(response.json().await?)
    }

    /// Large buffers are sent in sequential `Content-Range` chunks under one
    /// upload id; the provider responds with the asset url on the last chunk.
    async fn upload_chunked(&self, url: &str, file: &UploadFile) -> Result<UploadOutcome, StorageError> {
        let upload_id = Uuid::new_v4().to_string();
        let total = file.bytes.len();
        let mut last_response = None;
        for (index, chunk) in file.bytes.chunks(self.config.chunk_size_bytes).enumerate() {
            let start = index * self.config.chunk_size_bytes;
            let end = start + chunk.len() - 1;
            debug!("uploading chunk {start}-{end}/{total} of {}", file.filename);
            let form = Form::new().part("file", self.file_part(file, chunk.to_vec())?);
            let response = self
                .client
                .post(url)
                .bearer_auth(&self.config.api_key)
                .header(CONTENT_RANGE, format!("bytes {start}-{end}/{total}"))
                .header("x-upload-id", &upload_id)
                .multipart(form)
                .send()
                .await?;
            check_status(&response)?;
            last_response = Some(response);
        }
        // chunks() never yields an empty iterator for a non-empty buffer, and
        // empty files take the whole-body path
        let response = last_response.ok_or_else(|| StorageError::Rejected {
            status: 0,
            body: "empty upload".to_string(),
        })?;
        Ok(response.json().await?)
    }
}

fn check_status(response: &reqwest::Response) -> Result<(), StorageError> {
    let status = response.status();
    if !status.is_success() {
        return Err(StorageError::Rejected {
            status: status.as_u16(),
            body: status.canonical_reason().unwrap_or("unknown").to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl MediaStorage for RemoteMediaStorage {
    async fn upload(&self, file: UploadFile) -> Result<UploadOutcome, StorageError> {
        let kind = MediaKind::classify(&file.content_type, &file.filename);
        let url = self.upload_url(kind);
        let outcome = if file.bytes.len() > self.config.chunk_size_bytes {
            self.upload_chunked(&url, &file).await?
        } else {
            self.upload_whole(&url, &file).await?
        };
        info!(
            "uploaded {} ({} bytes) as {kind} to {}",
            file.filename,
            file.bytes.len(),
            outcome.secure_url
        );
        Ok(outcome)
    }

    async fn delete(&self, url: &str) -> Result<(), StorageError> {
        let asset_id =
            asset_id_from_url(url).ok_or_else(|| StorageError::BadAssetUrl(url.to_string()))?;
        let response = self
            .client
            .delete(self.delete_url(&asset_id))
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;
        check_status(&response)?;
        info!("deleted remote asset {asset_id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> StorageConfig {
        StorageConfig {
            endpoint: "https://media.example.com/v1/".to_string(),
            api_key: "secret".to_string(),
            timeout_secs: 5,
            chunk_size_bytes: 1024,
        }
    }

    #[test]
    fn upload_url_embeds_the_pipeline_hint() {
        let storage = RemoteMediaStorage::new(test_config()).unwrap();
        assert_eq!(
            storage.upload_url(MediaKind::Video),
            "https://media.example.com/v1/video/upload"
        );
        assert_eq!(
            storage.upload_url(MediaKind::Raw),
            "https://media.example.com/v1/raw/upload"
        );
    }

    #[test]
    fn delete_url_addresses_assets_by_id() {
        let storage = RemoteMediaStorage::new(test_config()).unwrap();
        assert_eq!(
            storage.delete_url("abc123"),
            "https://media.example.com/v1/assets/abc123"
        );
    }
}

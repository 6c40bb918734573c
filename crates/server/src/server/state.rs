use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::connection::DbConnection;
use crate::storage::remote::RemoteMediaStorage;
use crate::storage::MediaStorage;

pub struct AppState {
    pub config: AppConfig,
    pub db_connection: DbConnection,
    pub media_storage: Arc<dyn MediaStorage>,
}

impl AppState {
    pub async fn try_init(config: &AppConfig) -> anyhow::Result<Self> {
        let db_connection = DbConnection::connect(&config.database).await?;
        let media_storage = RemoteMediaStorage::new(config.storage.clone())?;
        Ok(Self {
            config: config.clone(),
            db_connection,
            media_storage: Arc::new(media_storage),
        })
    }
}

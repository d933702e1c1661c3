//! Home-feed news retrieval.

use std::path::PathBuf;

use shared::NewsItem;
use tracing::info;

use crate::db::{Store, StoreError};

/// Serves the short list of most recent community news entries.
#[derive(Clone)]
pub struct NewsService {
    db_path: PathBuf,
}

impl NewsService {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// The newest news entries, newest first.
    pub async fn latest(&self) -> Result<Vec<NewsItem>, StoreError> {
        info!("loading news feed");
        let store = Store::open(&self.db_path).await?;
        let news = store.latest_news().await;
        store.close().await;
        news
    }
}

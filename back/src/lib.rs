pub mod error;
pub mod store;
pub mod v1;

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use tokio::sync::OnceCell;
use tracing::info;

use crate::store::{Store, StoreError};

#[derive(Clone, Debug)]
pub enum StoreConfig {
    Memory,
    File(PathBuf),
}

/// Shared by every request. The store is opened on first use and reused
/// for the rest of the process; a failed open is retried by the next request.
#[derive(Debug)]
pub struct AppState {
    config: StoreConfig,
    store: OnceCell<Store>,
}

impl AppState {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            store: OnceCell::new(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(StoreConfig::Memory)
    }

    pub async fn store(&self) -> Result<&Store, StoreError> {
        self.store
            .get_or_try_init(|| async {
                match &self.config {
                    StoreConfig::Memory => Ok(Store::in_memory()),
                    StoreConfig::File(path) => {
                        info!(path = %path.display(), "opening data file");
                        Store::open(path).await
                    }
                }
            })
            .await
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", v1::router())
        .with_state(state)
}

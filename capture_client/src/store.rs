use std::path::PathBuf;

use async_trait::async_trait;
use location_tracker_lib::{LocationRecord, NewLocation};
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server answered {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("local store {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("local store {path:?} is not a record list: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("coordinates out of range")]
    InvalidCoordinates,
}

/// Where captured records go. Implemented by the HTTP server client and the local file fallback.
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Appends a record; the store assigns id and timestamp.
    async fn save(&self, location: NewLocation) -> Result<(), StoreError>;

    /// Every record, newest first.
    async fn list(&self) -> Result<Vec<LocationRecord>, StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;
}

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use location_tracker_lib::{LocationRecord, NewLocation};
use tokio::sync::Mutex;

use crate::store::{LocationStore, StoreError};

pub const DEFAULT_LOCAL_STORE: &str = "data/locations.json";

/// Fallback used when no server is available: a single JSON file holding the whole
/// record sequence. Records are only ever appended; `clear` empties the file.
pub struct LocalStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Vec<LocationRecord>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(self.io_error(source)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn write(&self, records: &[LocationRecord]) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir)
                    .await
                    .map_err(|source| self.io_error(source))?;
            }
        }

        let bytes = serde_json::to_vec_pretty(records).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        // Replace the file in one step, the previous history survives a failed write.
        let temp = self.temp_path();
        tokio::fs::write(&temp, bytes)
            .await
            .map_err(|source| self.io_error(source))?;

        if let Err(source) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(self.io_error(source));
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl LocationStore for LocalStore {
    async fn save(&self, location: NewLocation) -> Result<(), StoreError> {
        if !location.has_valid_coordinates() {
            return Err(StoreError::InvalidCoordinates);
        }

        let _guard = self.lock.lock().await;
        let mut records = self.read().await?;

        let id = records.iter().map(|record| record.id).max().unwrap_or(0) + 1;

        // Same rule as the server: timestamps never go backwards.
        let now = Utc::now();
        let timestamp = match records.iter().map(|record| record.timestamp).max() {
            Some(last) if now <= last => last + TimeDelta::microseconds(1),
            _ => now,
        };

        records.push(LocationRecord::new(id, location, timestamp));
        self.write(&records).await?;

        tracing::info!("Location {id} saved to {:?}", self.path);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<LocationRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read().await?;
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        self.write(&[]).await
    }
}

use std::sync::Arc;

use chrono::{DateTime, Utc};
use location_tracker_lib::{LocationRecord, NewLocation};
use tokio::sync::Mutex;

use crate::DataManagerError;

/// Non-durable fallback store. Everything is lost when the process exits.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    records: Vec<LocationRecord>,
    last_id: i64,
    closed: bool,
}

impl MemoryInner {
    fn check_open(&self) -> Result<(), DataManagerError> {
        if self.closed {
            return Err(DataManagerError::Memory("Store is closed".to_string()));
        }
        Ok(())
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_location(&self, location: NewLocation, timestamp: DateTime<Utc>) -> Result<LocationRecord, DataManagerError> {
        let mut inner = self.inner.lock().await;
        inner.check_open()?;

        // Ids keep growing across clears, like AUTOINCREMENT.
        inner.last_id += 1;
        let record = LocationRecord::new(inner.last_id, location, timestamp);
        inner.records.push(record.clone());

        Ok(record)
    }

    pub async fn get_locations(&self) -> Result<Vec<LocationRecord>, DataManagerError> {
        let inner = self.inner.lock().await;
        inner.check_open()?;

        let mut records = inner.records.clone();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    pub async fn clear_locations(&self) -> Result<u64, DataManagerError> {
        let mut inner = self.inner.lock().await;
        inner.check_open()?;

        let removed = inner.records.len() as u64;
        inner.records.clear();
        Ok(removed)
    }

    pub async fn close(&self) {
        self.inner.lock().await.closed = true;
    }
}

use std::{path::PathBuf, sync::Arc};

use location_tracker_lib::{LocationRecord, NewLocation};
use tokio::sync::Mutex;

use crate::{clock::MonotonicClock, database::db::LocationDatabase, memory::MemoryStore, DataManagerError};

/// Which backend holds the records.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreKind {
    /// Durable SQLite file.
    Database(PathBuf),
    /// In-process list, lost on restart.
    Memory,
}

#[derive(Clone)]
enum StoreBackend {
    Database(LocationDatabase),
    Memory(MemoryStore),
}

#[derive(Clone)]
pub struct DataManager {
    backend: StoreBackend,
    /// Locked for the whole insert: id order and timestamp order agree.
    clock: Arc<Mutex<MonotonicClock>>,
}

/// The public interface for all location data management.
impl DataManager {
    pub async fn start(kind: StoreKind) -> Result<Self, DataManagerError> {
        let (backend, latest) = match kind {
            StoreKind::Database(path) => {
                let database = LocationDatabase::connect(&path).await?;
                let latest = database.latest_timestamp().await?;
                tracing::info!("Using SQLite store at {:?}", path);
                (StoreBackend::Database(database), latest)
            }
            StoreKind::Memory => {
                tracing::warn!("Using in-memory store, records are lost on restart");
                (StoreBackend::Memory(MemoryStore::new()), None)
            }
        };

        Ok(DataManager {
            backend,
            clock: Arc::new(Mutex::new(MonotonicClock::starting_after(latest))),
        })
    }

    /// Stores a new record stamped with the next insert time.
    pub async fn create_location(&self, location: NewLocation) -> Result<LocationRecord, DataManagerError> {
        let mut clock = self.clock.lock().await;
        let timestamp = clock.next();
        match &self.backend {
            StoreBackend::Database(db) => db.insert_location(location, timestamp).await,
            StoreBackend::Memory(memory) => memory.insert_location(location, timestamp).await,
        }
    }

    /// All records, newest first.
    pub async fn get_locations(&self) -> Result<Vec<LocationRecord>, DataManagerError> {
        match &self.backend {
            StoreBackend::Database(db) => db.get_locations().await,
            StoreBackend::Memory(memory) => memory.get_locations().await,
        }
    }

    pub async fn clear_locations(&self) -> Result<u64, DataManagerError> {
        match &self.backend {
            StoreBackend::Database(db) => db.clear_locations().await,
            StoreBackend::Memory(memory) => memory.clear_locations().await,
        }
    }

    pub async fn close(&self) {
        match &self.backend {
            StoreBackend::Database(db) => db.close().await,
            StoreBackend::Memory(memory) => memory.close().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn managers(dir: &tempfile::TempDir) -> Vec<DataManager> {
        vec![
            DataManager::start(StoreKind::Database(dir.path().join("locations.db"))).await.unwrap(),
            DataManager::start(StoreKind::Memory).await.unwrap(),
        ]
    }

    #[tokio::test]
    async fn create_then_list_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        for manager in managers(&dir).await {
            let created: Vec<LocationRecord> = {
                let mut created = Vec::new();
                for _ in 0..4 {
                    created.push(manager.create_location(NewLocation::simulated()).await.unwrap());
                }
                created
            };

            let listed = manager.get_locations().await.unwrap();
            let expected: Vec<LocationRecord> = created.into_iter().rev().collect();
            assert_eq!(listed, expected);
            assert!(listed.windows(2).all(|pair| pair[0].timestamp > pair[1].timestamp));
        }
    }

    #[tokio::test]
    async fn record_without_enrichment_is_kept() {
        let dir = tempfile::tempdir().unwrap();

        for manager in managers(&dir).await {
            let location = NewLocation {
                latitude: Some(-23.5505),
                longitude: Some(-46.6333),
                ..Default::default()
            };
            manager.create_location(location).await.unwrap();

            let listed = manager.get_locations().await.unwrap();
            assert_eq!(listed.len(), 1);
            assert_eq!(listed[0].latitude, Some(-23.5505));
            assert_eq!(listed[0].longitude, Some(-46.6333));
            assert_eq!(listed[0].country, None);
            assert_eq!(listed[0].city, None);
            assert_eq!(listed[0].address, None);
            assert_eq!(listed[0].place_name, None);
        }
    }

    #[tokio::test]
    async fn clear_on_empty_store() {
        let dir = tempfile::tempdir().unwrap();

        for manager in managers(&dir).await {
            assert_eq!(manager.clear_locations().await.unwrap(), 0);
            assert!(manager.get_locations().await.unwrap().is_empty());
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_keep_id_and_timestamp_order() {
        let dir = tempfile::tempdir().unwrap();

        for manager in managers(&dir).await {
            let tasks: Vec<_> = (0..50)
                .map(|_| {
                    let manager = manager.clone();
                    tokio::spawn(async move { manager.create_location(NewLocation::simulated()).await })
                })
                .collect();
            for task in tasks {
                task.await.unwrap().unwrap();
            }

            let mut listed = manager.get_locations().await.unwrap();
            assert_eq!(listed.len(), 50);

            listed.sort_by_key(|record| record.id);
            assert!(listed.windows(2).all(|pair| pair[0].timestamp < pair[1].timestamp));
        }
    }

    #[tokio::test]
    async fn timestamps_continue_after_restart() {
        let dir = tempfile::tempdir().unwrap();
        let kind = StoreKind::Database(dir.path().join("locations.db"));

        let manager = DataManager::start(kind.clone()).await.unwrap();
        let first = manager.create_location(NewLocation::simulated()).await.unwrap();
        manager.close().await;

        let manager = DataManager::start(kind).await.unwrap();
        let second = manager.create_location(NewLocation::simulated()).await.unwrap();
        assert!(second.timestamp > first.timestamp);
        assert_eq!(manager.get_locations().await.unwrap()[0].id, second.id);
    }
}

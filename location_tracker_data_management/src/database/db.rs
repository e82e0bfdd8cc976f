use std::path::Path;

use chrono::{DateTime, Utc};
use const_format::concatcp;
use location_tracker_lib::{LocationRecord, NewLocation};
use sqlx::{query, query_as, sqlite::SqliteConnectOptions, Executor, Pool, Sqlite, SqlitePool};

use crate::DataManagerError;

use super::constants::*;

const COLUMNS: &str = concatcp!(
    ID, ", ", LATITUDE, ", ", LONGITUDE, ", ", COUNTRY, ", ", CITY, ", ",
    ADDRESS, ", ", PLACE_NAME, ", ", DEVICE_INFO, ", ", TIMESTAMP
);

#[derive(Clone)]
pub struct LocationDatabase {
    pool: Pool<Sqlite>,
}

impl LocationDatabase {
    pub async fn connect(path: &Path) -> Result<Self, DataManagerError> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir)
                    .map_err(|_| DataManagerError::Database(format!("Failed to create data directory: {:?}", dir)))?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options).await
            .map_err(|err| DataManagerError::Database(format!("Failed to connect to database {:?}: {err}", path)))?;

        let db = Self {
            pool
        };

        db.init().await?;

        Ok(db)
    }

    pub async fn init(&self) -> Result<(), DataManagerError> {
        self.pool.execute(concatcp!("
            CREATE TABLE IF NOT EXISTS ", LOCATIONS_TABLE_NAME, "(",
                ID,          " INTEGER PRIMARY KEY AUTOINCREMENT,",
                LATITUDE,    " REAL,",
                LONGITUDE,   " REAL,",
                COUNTRY,     " TEXT,",
                CITY,        " TEXT,",
                ADDRESS,     " TEXT,",
                PLACE_NAME,  " TEXT,",
                DEVICE_INFO, " TEXT,",
                TIMESTAMP,   " TIMESTAMP NOT NULL
            )")).await
            .map_err(|err| DataManagerError::Database(format!("Failed to create locations table: {err}")))
            .map(|_| ())
    }

    pub async fn insert_location(&self, location: NewLocation, timestamp: DateTime<Utc>) -> Result<LocationRecord, DataManagerError> {
        let id = query_as::<_, (i64,)>(concatcp!("
            INSERT INTO ", LOCATIONS_TABLE_NAME, "(",
            LATITUDE, ", ", LONGITUDE, ", ", COUNTRY, ", ", CITY, ", ", ADDRESS, ", ", PLACE_NAME, ", ", DEVICE_INFO, ", ", TIMESTAMP, ")
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) RETURNING ", ID))
                .bind(location.latitude)
                .bind(location.longitude)
                .bind(&location.country)
                .bind(&location.city)
                .bind(&location.address)
                .bind(&location.place_name)
                .bind(&location.device_info)
                .bind(timestamp)
                .fetch_one(&self.pool).await
                .map_err(|err| DataManagerError::Database(format!("Failed to insert location: {err}")))
                .map(|row| row.0)?;

        Ok(LocationRecord::new(id, location, timestamp))
    }

    /// Newest first. Equal timestamps fall back to insertion order.
    pub async fn get_locations(&self) -> Result<Vec<LocationRecord>, DataManagerError> {
        query_as::<_, LocationRecord>(concatcp!(
            "SELECT ", COLUMNS, " FROM ", LOCATIONS_TABLE_NAME,
            " ORDER BY ", TIMESTAMP, " DESC, ", ID, " DESC"))
            .fetch_all(&self.pool).await
            .map_err(|err| DataManagerError::Database(format!("Failed to get locations: {err}")))
    }

    /// Returns the number of deleted rows.
    pub async fn clear_locations(&self) -> Result<u64, DataManagerError> {
        query(concatcp!("DELETE FROM ", LOCATIONS_TABLE_NAME))
            .execute(&self.pool).await
            .map_err(|err| DataManagerError::Database(format!("Failed to clear locations: {err}")))
            .map(|result| result.rows_affected())
    }

    pub async fn latest_timestamp(&self) -> Result<Option<DateTime<Utc>>, DataManagerError> {
        query_as::<_, (DateTime<Utc>,)>(concatcp!(
            "SELECT ", TIMESTAMP, " FROM ", LOCATIONS_TABLE_NAME,
            " ORDER BY ", TIMESTAMP, " DESC LIMIT 1"))
            .fetch_optional(&self.pool).await
            .map_err(|err| DataManagerError::Database(format!("Failed to read latest timestamp: {err}")))
            .map(|row| row.map(|row| row.0))
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    #[tokio::test]
    async fn insert_and_list_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let db = LocationDatabase::connect(&dir.path().join("locations.db")).await.unwrap();

        let start = Utc::now();
        let first = db.insert_location(NewLocation::simulated(), start).await.unwrap();
        let second = db.insert_location(NewLocation::default(), start + TimeDelta::seconds(1)).await.unwrap();

        assert!(second.id > first.id);

        let locations = db.get_locations().await.unwrap();
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].id, second.id);
        assert_eq!(locations[1], first);
        assert_eq!(locations[0].country, None);
        assert_eq!(db.latest_timestamp().await.unwrap(), Some(second.timestamp));
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let db = LocationDatabase::connect(&dir.path().join("locations.db")).await.unwrap();

        assert_eq!(db.clear_locations().await.unwrap(), 0);

        for _ in 0..3 {
            db.insert_location(NewLocation::simulated(), Utc::now()).await.unwrap();
        }

        assert_eq!(db.clear_locations().await.unwrap(), 3);
        assert!(db.get_locations().await.unwrap().is_empty());
        assert_eq!(db.latest_timestamp().await.unwrap(), None);
    }

    #[tokio::test]
    async fn rows_survive_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("locations.db");

        let db = LocationDatabase::connect(&path).await.unwrap();
        let record = db.insert_location(NewLocation::simulated(), Utc::now()).await.unwrap();
        db.close().await;

        let db = LocationDatabase::connect(&path).await.unwrap();
        assert_eq!(db.get_locations().await.unwrap(), vec![record]);
    }

    #[tokio::test]
    async fn closed_pool_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = LocationDatabase::connect(&dir.path().join("locations.db")).await.unwrap();
        db.close().await;

        let result = db.insert_location(NewLocation::simulated(), Utc::now()).await;
        assert!(matches!(result, Err(DataManagerError::Database(_))));
    }
}

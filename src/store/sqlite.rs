use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{query, query_as, Executor, Row, SqlitePool};

use crate::error::StoreError;
use crate::store::RouteStore;
use crate::types::geo::GeoPoint;
use crate::types::route::{RouteDetails, RouteId, RouteRecord, StoredRoute};

const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS route_records (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        start_lat         REAL    NOT NULL,
        start_lon         REAL    NOT NULL,
        end_lat           REAL    NOT NULL,
        end_lon           REAL    NOT NULL,
        start_time        INTEGER NOT NULL,
        end_time          INTEGER NOT NULL,
        elapsed_millis    INTEGER NOT NULL,
        distance_meters   REAL    NOT NULL,
        average_speed_kmh REAL    NOT NULL,
        name              TEXT,
        notes             TEXT
    );
    CREATE INDEX IF NOT EXISTS route_records_start_time ON route_records (start_time DESC);";

const SELECT_COLUMNS: &str = "SELECT id, start_lat, start_lon, end_lat, end_lon, start_time, end_time, \
     elapsed_millis, distance_meters, average_speed_kmh, name, notes FROM route_records";

/// Route store backed by a SQLite file (or an in-memory database).
#[derive(Clone)]
pub struct SqliteRouteStore {
    pool: SqlitePool,
}

impl SqliteRouteStore {
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        // Every connection to an in-memory database sees its own empty
        // database, so those pools must hold exactly one connection forever.
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(4)
        };

        let pool = pool_options.connect_with(options).await?;
        let store = Self { pool };
        store.init().await?;

        tracing::info!("Connected to route database at {}", url);
        Ok(store)
    }

    pub async fn connect_in_memory() -> Result<Self, StoreError> {
        Self::connect("sqlite::memory:").await
    }

    async fn init(&self) -> Result<(), StoreError> {
        self.pool.execute(CREATE_TABLE).await?;
        Ok(())
    }
}

fn route_from_row(row: &SqliteRow) -> Result<StoredRoute, StoreError> {
    let start_time: i64 = row.try_get("start_time")?;
    let end_time: i64 = row.try_get("end_time")?;

    Ok(StoredRoute {
        id: row.try_get("id")?,
        record: RouteRecord {
            start_point: GeoPoint::new(row.try_get("start_lat")?, row.try_get("start_lon")?),
            end_point: GeoPoint::new(row.try_get("end_lat")?, row.try_get("end_lon")?),
            start_time: timestamp(start_time)?,
            end_time: timestamp(end_time)?,
            elapsed_millis: row.try_get("elapsed_millis")?,
            distance_meters: row.try_get("distance_meters")?,
            average_speed_kmh: row.try_get("average_speed_kmh")?,
            name: row.try_get("name")?,
            notes: row.try_get("notes")?,
        },
    })
}

fn timestamp(millis: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| StoreError::Database(format!("Stored timestamp out of range: {}", millis)))
}

#[async_trait]
impl RouteStore for SqliteRouteStore {
    async fn insert(&self, record: RouteRecord) -> Result<RouteId, StoreError> {
        let (id,) = query_as::<_, (i64,)>(
            "INSERT INTO route_records (
                start_lat, start_lon, end_lat, end_lon, start_time, end_time,
                elapsed_millis, distance_meters, average_speed_kmh, name, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11) RETURNING id",
        )
        .bind(record.start_point.lat)
        .bind(record.start_point.lon)
        .bind(record.end_point.lat)
        .bind(record.end_point.lon)
        .bind(record.start_time.timestamp_millis())
        .bind(record.end_time.timestamp_millis())
        .bind(record.elapsed_millis)
        .bind(record.distance_meters)
        .bind(record.average_speed_kmh)
        .bind(&record.name)
        .bind(&record.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get_by_id(&self, id: RouteId) -> Result<Option<StoredRoute>, StoreError> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let row = query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(route_from_row).transpose()
    }

    async fn delete_by_id(&self, id: RouteId) -> Result<bool, StoreError> {
        let result = query("DELETE FROM route_records WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> Result<Vec<StoredRoute>, StoreError> {
        let sql = format!("{} ORDER BY start_time DESC, id DESC", SELECT_COLUMNS);
        let rows = query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(route_from_row).collect()
    }

    async fn update_details(
        &self,
        id: RouteId,
        details: RouteDetails,
    ) -> Result<Option<StoredRoute>, StoreError> {
        let result = query("UPDATE route_records SET name = ?1, notes = ?2 WHERE id = ?3")
            .bind(&details.name)
            .bind(&details.notes)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }
}

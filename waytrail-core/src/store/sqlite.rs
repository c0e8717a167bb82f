//! SQLite-backed history store.
//!
//! One row per record. Nested values (destinations and the optional start
//! location) are stored as JSON text; timestamps are UTC milliseconds.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row, params};
use thiserror::Error;

use super::HistoryStore;
use crate::{
    DestinationSummary, HistoryError, HistoryRecord, NavigationStatus, ParseStatusError, Place,
    RecordId, RecordParts,
};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS history (
    id TEXT PRIMARY KEY,
    user_id TEXT,
    description TEXT NOT NULL,
    started_at INTEGER NOT NULL,
    ended_at INTEGER,
    status TEXT NOT NULL,
    start_location TEXT,
    destinations TEXT NOT NULL,
    total_distance_km REAL NOT NULL,
    estimated_minutes INTEGER NOT NULL,
    actual_minutes INTEGER,
    alarms_triggered INTEGER NOT NULL,
    completed_stops INTEGER NOT NULL,
    total_stops INTEGER NOT NULL
)";

const COLUMNS: &str = "id, user_id, description, started_at, ended_at, status, start_location, \
    destinations, total_distance_km, estimated_minutes, actual_minutes, alarms_triggered, \
    completed_stops, total_stops";

/// Errors raised by [`SqliteHistoryStore`].
#[derive(Debug, Error)]
pub enum SqliteHistoryStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// The stored record has ended and can no longer be replaced.
    #[error("record {id} has ended and cannot be replaced")]
    Finalised {
        /// Identifier of the frozen record.
        id: RecordId,
    },
    /// A stored identifier was not a UUID.
    #[error("stored record id {raw:?} is not a valid UUID: {source}")]
    InvalidId {
        /// Raw column value.
        raw: String,
        /// Parse failure.
        #[source]
        source: uuid::Error,
    },
    /// A stored status tag was not recognised.
    #[error("record {id} has an invalid status: {source}")]
    InvalidStatus {
        /// Affected record.
        id: RecordId,
        /// Parse failure.
        #[source]
        source: ParseStatusError,
    },
    /// A stored timestamp was out of range.
    #[error("record {id} has an out-of-range timestamp {millis}")]
    InvalidTimestamp {
        /// Affected record.
        id: RecordId,
        /// Raw milliseconds since the Unix epoch.
        millis: i64,
    },
    /// A JSON column could not be encoded or decoded.
    #[error("failed to convert {column} JSON for record {id}: {source}")]
    Json {
        /// Affected record.
        id: RecordId,
        /// Column name.
        column: &'static str,
        /// JSON failure.
        #[source]
        source: serde_json::Error,
    },
    /// A stored row broke a record invariant.
    #[error("stored record {id} is inconsistent: {source}")]
    InvalidRecord {
        /// Affected record.
        id: RecordId,
        /// Invariant violation.
        #[source]
        source: HistoryError,
    },
    /// Generic SQLite error.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// History store persisted in a SQLite database.
pub struct SqliteHistoryStore {
    connection: Connection,
}

impl fmt::Debug for SqliteHistoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteHistoryStore")
            .field("path", &self.connection.path())
            .finish_non_exhaustive()
    }
}

impl SqliteHistoryStore {
    /// Open or create a writable store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SqliteHistoryStoreError> {
        let path = path.as_ref();
        let connection =
            Connection::open(path).map_err(|source| SqliteHistoryStoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        Self::with_schema(connection)
    }

    /// Open an existing store at `path` without write access.
    ///
    /// Writes through a read-only store fail with
    /// [`SqliteHistoryStoreError::Database`].
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self, SqliteHistoryStoreError> {
        let path = path.as_ref();
        let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| SqliteHistoryStoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self { connection })
    }

    /// Create a private store that lives only as long as the value.
    pub fn open_in_memory() -> Result<Self, SqliteHistoryStoreError> {
        Self::with_schema(Connection::open_in_memory()?)
    }

    fn with_schema(connection: Connection) -> Result<Self, SqliteHistoryStoreError> {
        connection.execute(SCHEMA, [])?;
        Ok(Self { connection })
    }
}

impl HistoryStore for SqliteHistoryStore {
    type Error = SqliteHistoryStoreError;

    fn save(&mut self, record: &HistoryRecord) -> Result<(), Self::Error> {
        let id = record.id();
        let parts = record.clone().into_parts();
        let start_location = parts
            .start_location
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|source| json_error(id, "start_location", source))?;
        let destinations = serde_json::to_string(&parts.destinations)
            .map_err(|source| json_error(id, "destinations", source))?;

        let tx = self.connection.transaction()?;
        let ended: Option<Option<i64>> = tx
            .query_row(
                "SELECT ended_at FROM history WHERE id = ?1",
                [id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        if matches!(ended, Some(Some(_))) {
            warn!("refusing to overwrite ended record {id}");
            return Err(SqliteHistoryStoreError::Finalised { id });
        }
        tx.execute(
            &format!(
                "INSERT OR REPLACE INTO history ({COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
            ),
            params![
                id.to_string(),
                parts.user_id,
                parts.description,
                parts.started_at.timestamp_millis(),
                parts.ended_at.map(|t| t.timestamp_millis()),
                parts.status.as_str(),
                start_location,
                destinations,
                parts.total_distance_km,
                parts.estimated_minutes,
                parts.actual_minutes,
                parts.alarms_triggered,
                parts.completed_stops,
                parts.total_stops,
            ],
        )?;
        tx.commit()?;
        debug!("saved record {id} as {}", parts.status);
        Ok(())
    }

    fn get(&self, id: RecordId) -> Result<Option<HistoryRecord>, Self::Error> {
        let query = format!("SELECT {COLUMNS} FROM history WHERE id = ?1");
        let mut statement = self.connection.prepare(&query)?;
        let mut rows = statement.query([id.to_string()])?;
        rows.next()?.map(read_record).transpose()
    }

    fn list(&self, user_id: Option<&str>) -> Result<Vec<HistoryRecord>, Self::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM history \
             WHERE ?1 IS NULL OR user_id = ?1 \
             ORDER BY started_at DESC"
        );
        let mut statement = self.connection.prepare(&query)?;
        let mut rows = statement.query([user_id])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(read_record(row)?);
        }
        Ok(records)
    }

    fn delete(&mut self, id: RecordId) -> Result<bool, Self::Error> {
        let removed = self
            .connection
            .execute("DELETE FROM history WHERE id = ?1", [id.to_string()])?;
        Ok(removed > 0)
    }
}

fn json_error(
    id: RecordId,
    column: &'static str,
    source: serde_json::Error,
) -> SqliteHistoryStoreError {
    SqliteHistoryStoreError::Json { id, column, source }
}

fn timestamp(id: RecordId, millis: i64) -> Result<DateTime<Utc>, SqliteHistoryStoreError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or(SqliteHistoryStoreError::InvalidTimestamp { id, millis })
}

fn read_record(row: &Row<'_>) -> Result<HistoryRecord, SqliteHistoryStoreError> {
    let raw_id: String = row.get(0)?;
    let id: RecordId = raw_id
        .parse()
        .map_err(|source| SqliteHistoryStoreError::InvalidId {
            raw: raw_id.clone(),
            source,
        })?;
    let status_tag: String = row.get(5)?;
    let status: NavigationStatus = status_tag
        .parse()
        .map_err(|source| SqliteHistoryStoreError::InvalidStatus { id, source })?;
    let start_location: Option<String> = row.get(6)?;
    let start_location: Option<Place> = start_location
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(|source| json_error(id, "start_location", source))?;
    let destinations: String = row.get(7)?;
    let destinations: Vec<DestinationSummary> = serde_json::from_str(&destinations)
        .map_err(|source| json_error(id, "destinations", source))?;
    let ended_at: Option<i64> = row.get(4)?;

    let parts = RecordParts {
        id,
        description: row.get(2)?,
        started_at: timestamp(id, row.get(3)?)?,
        ended_at: ended_at.map(|millis| timestamp(id, millis)).transpose()?,
        status,
        start_location,
        destinations,
        total_distance_km: row.get(8)?,
        estimated_minutes: row.get(9)?,
        actual_minutes: row.get(10)?,
        alarms_triggered: row.get(11)?,
        completed_stops: row.get(12)?,
        total_stops: row.get(13)?,
        user_id: row.get(1)?,
    };
    HistoryRecord::from_parts(parts)
        .map_err(|source| SqliteHistoryStoreError::InvalidRecord { id, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{instant, record_with, route_through};
    use crate::{NavigationSession, Place};
    use geo::Coord;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn store() -> SqliteHistoryStore {
        SqliteHistoryStore::open_in_memory().expect("open in-memory store")
    }

    fn rich_record() -> HistoryRecord {
        let route = route_through(&["Dock", "Mill", "Fort"]);
        let mut session = NavigationSession::start(route, instant(0))
            .with_user_id("ana")
            .with_start_location(Place::new("Home", "2 Elm Row", Coord { x: 1.5, y: 52.0 }));
        session.arrive(instant(12));
        session
            .finalize(NavigationStatus::Cancelled, instant(40))
            .expect("finalise session")
    }

    #[rstest]
    fn round_trips_full_record(mut store: SqliteHistoryStore) {
        let record = rich_record();
        store.save(&record).expect("save");
        let loaded = store.get(record.id()).expect("get").expect("record present");
        assert_eq!(loaded, record);
        assert_eq!(loaded.destinations()[0].arrived_at, Some(instant(12)));
    }

    #[rstest]
    fn missing_record_is_none(store: SqliteHistoryStore) {
        assert!(store.get(RecordId::new()).expect("get").is_none());
    }

    #[rstest]
    fn ended_record_cannot_be_replaced(mut store: SqliteHistoryStore) {
        let route = route_through(&["Dock"]);
        let mut record = HistoryRecord::in_progress(&route, instant(0));
        store.save(&record).expect("save in progress");
        record
            .finish(NavigationStatus::Completed, instant(5))
            .expect("finish");
        store.save(&record).expect("replace in progress");

        let err = store.save(&record).expect_err("frozen");
        assert!(matches!(err, SqliteHistoryStoreError::Finalised { id } if id == record.id()));
        let loaded = store.get(record.id()).expect("get").expect("present");
        assert_eq!(loaded.status(), NavigationStatus::Completed);
    }

    #[rstest]
    fn list_orders_newest_first_and_filters_user(mut store: SqliteHistoryStore) {
        let older = HistoryRecord::in_progress(&route_through(&["Old"]), instant(0))
            .with_user_id("ana");
        let newer = HistoryRecord::in_progress(&route_through(&["New"]), instant(90))
            .with_user_id("ana");
        let other = record_with(NavigationStatus::Failed, &["Elsewhere"]);
        for record in [&older, &newer, &other] {
            store.save(record).expect("save");
        }

        let mine = store.list(Some("ana")).expect("list");
        assert_eq!(mine, vec![newer, older]);
        assert_eq!(store.list(None).expect("list all").len(), 3);
    }

    #[rstest]
    fn delete_removes_row(mut store: SqliteHistoryStore) {
        let record = record_with(NavigationStatus::Completed, &["Dock"]);
        store.save(&record).expect("save");
        assert!(store.delete(record.id()).expect("delete"));
        assert!(!store.delete(record.id()).expect("delete again"));
        assert!(store.list(None).expect("list").is_empty());
    }

    #[rstest]
    fn reopened_file_keeps_records() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("history.db");
        let record = rich_record();
        {
            let mut store = SqliteHistoryStore::open(&path).expect("open store");
            store.save(&record).expect("save");
        }
        let store = SqliteHistoryStore::open_read_only(&path).expect("reopen");
        assert_eq!(store.list(None).expect("list"), vec![record]);
    }

    #[rstest]
    fn corrupted_destinations_are_reported(mut store: SqliteHistoryStore) {
        let record = record_with(NavigationStatus::Completed, &["Dock"]);
        store.save(&record).expect("save");
        store
            .connection
            .execute("UPDATE history SET destinations = 'not-json'", [])
            .expect("corrupt row");
        let err = store.get(record.id()).expect_err("invalid JSON");
        assert!(matches!(
            err,
            SqliteHistoryStoreError::Json {
                column: "destinations",
                ..
            }
        ));
    }

    #[rstest]
    fn inconsistent_counts_are_reported(mut store: SqliteHistoryStore) {
        let record = record_with(NavigationStatus::Completed, &["Dock"]);
        store.save(&record).expect("save");
        store
            .connection
            .execute("UPDATE history SET completed_stops = 5", [])
            .expect("corrupt row");
        let err = store.get(record.id()).expect_err("invalid counts");
        assert!(matches!(
            err,
            SqliteHistoryStoreError::InvalidRecord {
                source: HistoryError::CompletedExceedsTotal { .. },
                ..
            }
        ));
    }

    #[rstest]
    fn unknown_status_is_reported(mut store: SqliteHistoryStore) {
        let record = record_with(NavigationStatus::Completed, &["Dock"]);
        store.save(&record).expect("save");
        store
            .connection
            .execute("UPDATE history SET status = 'paused'", [])
            .expect("corrupt row");
        assert!(matches!(
            store.get(record.id()),
            Err(SqliteHistoryStoreError::InvalidStatus { .. })
        ));
    }
}

//! Persistence for navigation history.
//!
//! The `HistoryStore` trait is the narrow interface between the engine and
//! whatever keeps records across runs. Stores upsert records while they are
//! in progress and refuse to overwrite a record that has already ended.

use crate::{HistoryRecord, RecordId};

mod memory;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use memory::{MemoryHistoryStore, MemoryHistoryStoreError};
#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteHistoryStore, SqliteHistoryStoreError};

/// Read and write access to persisted history records.
///
/// Failures are reported to the caller as-is; stores never retry.
///
/// # Examples
///
/// ```rust
/// use waytrail_core::{
///     HistoryStore, MemoryHistoryStore, NavigationStatus, Place, Route, finalize,
/// };
///
/// let route = Route::from_places("Loop", [Place::named("Gate")]);
/// let record = finalize(&route, NavigationStatus::Cancelled, route.created_at())?;
///
/// let mut store = MemoryHistoryStore::default();
/// store.save(&record)?;
/// assert_eq!(store.get(record.id())?, Some(record));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait HistoryStore {
    /// Error raised by the backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert `record`, or replace an in-progress record with the same id.
    ///
    /// Implementations must reject replacing a record that has ended.
    fn save(&mut self, record: &HistoryRecord) -> Result<(), Self::Error>;

    /// Fetch one record by id.
    fn get(&self, id: RecordId) -> Result<Option<HistoryRecord>, Self::Error>;

    /// Every record, newest start time first, optionally restricted to one
    /// owner.
    fn list(&self, user_id: Option<&str>) -> Result<Vec<HistoryRecord>, Self::Error>;

    /// Delete a record. Returns whether it existed.
    fn delete(&mut self, id: RecordId) -> Result<bool, Self::Error>;
}

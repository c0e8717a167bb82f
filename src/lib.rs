//! Facade crate for the Waytrail navigation engine.
//!
//! This crate re-exports the core route progression and history types and
//! exposes the optional SQLite history store behind a feature flag.

#![forbid(unsafe_code)]

pub use waytrail_core::{
    ArrivalOutcome, DestinationSummary, FilterCategory, HistoryError, HistoryQuery,
    HistoryRecord, HistoryStore, HistoryView, Leg, MemoryHistoryStore, MemoryHistoryStoreError,
    NavigationSession, NavigationStatus, ParseCategoryError, ParseStatusError, Place,
    ProgressState, RecordId, RecordParts, Route, RouteId, Waypoint, WaypointId,
    completion_percentage, describe_route, filter_records, finalize, format_duration,
    label_for_order,
};

#[cfg(feature = "store-sqlite")]
pub use waytrail_core::{SqliteHistoryStore, SqliteHistoryStoreError};

#[cfg(feature = "test-support")]
pub use waytrail_core::test_support;

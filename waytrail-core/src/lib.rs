//! Core domain types for the Waytrail navigation engine.
//!
//! The crate models multi-stop routes and the history left behind once a
//! traversal ends:
//!
//! - [`Route`] owns an ordered list of [`Waypoint`] values and a progression
//!   cursor. Arrival signals move the cursor forward through
//!   [`Route::advance`] and [`Route::finish`].
//! - [`NavigationSession`] wraps a route with the bookkeeping a host needs
//!   while travelling: start time, arrival timestamps and triggered alarms.
//! - [`HistoryRecord`] is the frozen summary persisted when a traversal
//!   completes, is cancelled, or fails.
//! - [`HistoryQuery`] and [`filter_records`] select records by status and
//!   free text for history screens.
//!
//! Persistence sits behind the [`HistoryStore`] trait. An in-memory store is
//! always available; a SQLite-backed store is enabled by the `store-sqlite`
//! feature.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod format;
pub mod history;
mod ids;
pub mod place;
pub mod query;
pub mod route;
pub mod session;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod waypoint;

pub use format::{completion_percentage, describe_route, format_duration, label_for_order};
pub use history::{
    DestinationSummary, HistoryError, HistoryRecord, NavigationStatus, ParseStatusError,
    RecordParts, finalize,
};
pub use ids::{RecordId, RouteId, WaypointId};
pub use place::Place;
pub use query::{FilterCategory, HistoryQuery, HistoryView, ParseCategoryError, filter_records};
pub use route::{ProgressState, Route};
pub use session::{ArrivalOutcome, NavigationSession};
pub use store::{HistoryStore, MemoryHistoryStore, MemoryHistoryStoreError};
#[cfg(feature = "store-sqlite")]
pub use store::{SqliteHistoryStore, SqliteHistoryStoreError};
pub use waypoint::{Leg, Waypoint};

//! Navigation history: statuses, records and finalisation.
//!
//! A [`HistoryRecord`] is created exactly once per traversal, when the host
//! decides the traversal is over. [`finalize`] is the one-shot conversion
//! from a route's final state into a terminal record.

use chrono::{DateTime, Utc};
use log::info;

use crate::Route;

mod error;
mod record;
mod status;

pub use error::HistoryError;
pub(crate) use record::Capture;
pub use record::{DestinationSummary, HistoryRecord, RecordParts};
pub use status::{NavigationStatus, ParseStatusError};

/// Convert the final state of `route` into a terminal record.
///
/// The session is taken to have started when the route was created. Use a
/// [`NavigationSession`](crate::NavigationSession) to capture the real start
/// time, arrival timestamps and alarms.
///
/// # Errors
/// Returns [`HistoryError::NonTerminalStatus`] when `status` is
/// [`NavigationStatus::InProgress`], [`HistoryError::RouteNotCompleted`]
/// when `status` is [`NavigationStatus::Completed`] but the route has not
/// passed its last stop, and [`HistoryError::EndBeforeStart`] when
/// `ended_at` precedes the route's creation time.
///
/// # Examples
/// ```
/// use waytrail_core::{NavigationStatus, Place, Route, finalize};
///
/// let route = Route::from_places("Tour", ["Gate", "Keep", "Moat", "Tower"].map(Place::named));
/// let record = finalize(&route, NavigationStatus::Cancelled, route.created_at())?;
/// assert_eq!(record.description(), "Gate → … → Tower");
/// assert_eq!(record.completed_stops(), 0);
/// # Ok::<(), waytrail_core::HistoryError>(())
/// ```
pub fn finalize(
    route: &Route,
    status: NavigationStatus,
    ended_at: DateTime<Utc>,
) -> Result<HistoryRecord, HistoryError> {
    check_terminal(route, status)?;
    let mut record = HistoryRecord::in_progress(route, route.created_at());
    record.finish(status, ended_at)?;
    info!(
        "route {} finalised as {status} with {}/{} stops",
        route.id(),
        record.completed_stops(),
        record.total_stops()
    );
    Ok(record)
}

/// Reject non-terminal statuses, and `Completed` for an unfinished route.
///
/// A route on its last stop is not finished yet: call
/// [`Route::finish`] first.
pub(crate) fn check_terminal(
    route: &Route,
    status: NavigationStatus,
) -> Result<(), HistoryError> {
    if !status.is_terminal() {
        return Err(HistoryError::NonTerminalStatus { status });
    }
    if status == NavigationStatus::Completed && !route.is_completed() {
        return Err(HistoryError::RouteNotCompleted {
            route: route.id(),
            completed: route.completed_points().len(),
            total: route.len(),
        });
    }
    Ok(())
}

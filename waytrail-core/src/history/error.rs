use chrono::{DateTime, Utc};
use thiserror::Error;

use super::NavigationStatus;
use crate::{RecordId, RouteId};

/// Errors raised while building, finishing or restoring a
/// [`HistoryRecord`](crate::HistoryRecord).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// A record can only be finalised into a terminal status.
    #[error("cannot finalise a record as {status}")]
    NonTerminalStatus {
        /// The rejected status.
        status: NavigationStatus,
    },
    /// The requested status change is not allowed.
    #[error("record {id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Affected record.
        id: RecordId,
        /// Current status.
        from: NavigationStatus,
        /// Requested status.
        to: NavigationStatus,
    },
    /// The record already has an end time and is immutable.
    #[error("record {id} has already ended")]
    AlreadyEnded {
        /// Affected record.
        id: RecordId,
    },
    /// Only a route that passed its last stop can be recorded as completed.
    #[error("route {route} has passed {completed} of {total} stops and cannot be completed")]
    RouteNotCompleted {
        /// Affected route.
        route: RouteId,
        /// Stops passed so far.
        completed: usize,
        /// Stops on the route.
        total: usize,
    },
    /// The end time precedes the start time.
    #[error("end time {ended_at} precedes start time {started_at}")]
    EndBeforeStart {
        /// Session start.
        started_at: DateTime<Utc>,
        /// Requested end.
        ended_at: DateTime<Utc>,
    },
    /// More stops were marked completed than exist.
    #[error("{completed} completed stops exceed the total of {total}")]
    CompletedExceedsTotal {
        /// Completed stop count.
        completed: usize,
        /// Total stop count.
        total: usize,
    },
    /// The stop total disagrees with the destination list.
    #[error("total of {total} stops does not match {destinations} destinations")]
    StopCountMismatch {
        /// Declared total.
        total: usize,
        /// Length of the destination list.
        destinations: usize,
    },
    /// A terminal record was restored without an end time.
    #[error("a {status} record needs an end time")]
    MissingEndTime {
        /// Declared status.
        status: NavigationStatus,
    },
    /// An ongoing record was restored with an end time.
    #[error("an in-progress record must not have an end time")]
    UnexpectedEndTime,
    /// An actual duration was restored without an end time, or the reverse.
    #[error("actual duration and end time must be present together")]
    DurationWithoutEnd,
}

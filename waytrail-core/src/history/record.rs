//! History records: frozen summaries of finished traversals.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use geo::Coord;

use super::{HistoryError, NavigationStatus};
use crate::{
    Place, RecordId, Route, Waypoint, WaypointId, completion_percentage, format_duration,
};

/// Outcome of a single stop, as stored in a [`HistoryRecord`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DestinationSummary {
    /// Place name.
    pub name: String,
    /// Place address.
    pub address: String,
    /// Place coordinates.
    pub location: Coord<f64>,
    /// Position within the route at capture time.
    pub order: usize,
    /// Whether the stop was passed.
    pub completed: bool,
    /// When the traveller arrived, if recorded.
    pub arrived_at: Option<DateTime<Utc>>,
    /// Whether the stop's arrival alarm fired.
    pub alarm_triggered: bool,
}

impl DestinationSummary {
    fn from_waypoint(
        waypoint: &Waypoint,
        arrived_at: Option<DateTime<Utc>>,
        alarm_triggered: bool,
    ) -> Self {
        let place = waypoint.place();
        Self {
            name: place.name.clone(),
            address: place.address.clone(),
            location: place.location,
            order: waypoint.order(),
            completed: waypoint.is_completed(),
            arrived_at,
            alarm_triggered,
        }
    }
}

/// Persisted shape of a [`HistoryRecord`].
///
/// Every field is public so storage backends can map it to their own
/// schema. Convert back with [`HistoryRecord::from_parts`], which checks the
/// record invariants.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordParts {
    /// Record identifier.
    pub id: RecordId,
    /// Route summary frozen at capture time.
    pub description: String,
    /// Session start.
    pub started_at: DateTime<Utc>,
    /// Session end, once finished.
    pub ended_at: Option<DateTime<Utc>>,
    /// Outcome.
    pub status: NavigationStatus,
    /// Where the traveller started, if known.
    pub start_location: Option<Place>,
    /// Per-stop outcomes in route order.
    pub destinations: Vec<DestinationSummary>,
    /// Sum of leg distances in kilometres.
    pub total_distance_km: f64,
    /// Sum of leg estimates in minutes.
    pub estimated_minutes: u32,
    /// Wall-clock duration in minutes, once finished.
    pub actual_minutes: Option<u32>,
    /// Number of alarms that fired.
    pub alarms_triggered: usize,
    /// Number of stops passed.
    pub completed_stops: usize,
    /// Number of stops.
    pub total_stops: usize,
    /// Owning user, if any.
    pub user_id: Option<String>,
}

/// Summary of one navigation session.
///
/// Records are captured from a [`Route`] and frozen once they end. The
/// description and counters never follow later route edits.
///
/// # Examples
/// ```
/// use chrono::{Duration, Utc};
/// use waytrail_core::{NavigationStatus, Place, Route, finalize};
///
/// let mut route = Route::from_places("Loop", ["Gate", "Keep"].map(Place::named));
/// route.advance();
/// route.finish();
/// let ended = route.created_at() + Duration::minutes(90);
/// let record = finalize(&route, NavigationStatus::Completed, ended)?;
///
/// assert_eq!(record.description(), "Gate → Keep");
/// assert_eq!(record.completion_percentage(), 100);
/// assert_eq!(record.duration_text(), "1h 30m");
/// # Ok::<(), waytrail_core::HistoryError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "RecordParts", try_from = "RecordParts")
)]
pub struct HistoryRecord {
    id: RecordId,
    description: String,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    status: NavigationStatus,
    start_location: Option<Place>,
    destinations: Vec<DestinationSummary>,
    total_distance_km: f64,
    estimated_minutes: u32,
    actual_minutes: Option<u32>,
    alarms_triggered: usize,
    completed_stops: usize,
    user_id: Option<String>,
}

/// Inputs for capturing a record from a live route.
pub(crate) struct Capture<'a> {
    pub(crate) route: &'a Route,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) start_location: Option<Place>,
    pub(crate) user_id: Option<String>,
    pub(crate) arrivals: &'a HashMap<WaypointId, DateTime<Utc>>,
    pub(crate) alarms: &'a HashSet<WaypointId>,
}

impl HistoryRecord {
    /// Capture an ongoing traversal of `route` that began at `started_at`.
    pub fn in_progress(route: &Route, started_at: DateTime<Utc>) -> Self {
        Self::capture(Capture {
            route,
            started_at,
            start_location: None,
            user_id: None,
            arrivals: &HashMap::new(),
            alarms: &HashSet::new(),
        })
    }

    pub(crate) fn capture(capture: Capture<'_>) -> Self {
        let destinations: Vec<_> = capture
            .route
            .points()
            .iter()
            .map(|point| {
                DestinationSummary::from_waypoint(
                    point,
                    capture.arrivals.get(&point.id()).copied(),
                    capture.alarms.contains(&point.id()),
                )
            })
            .collect();
        let completed_stops = destinations.iter().filter(|d| d.completed).count();
        let alarms_triggered = destinations.iter().filter(|d| d.alarm_triggered).count();
        Self {
            id: RecordId::new(),
            description: capture.route.description(),
            started_at: capture.started_at,
            ended_at: None,
            status: NavigationStatus::InProgress,
            start_location: capture.start_location,
            destinations,
            total_distance_km: capture.route.total_distance_km(),
            estimated_minutes: capture.route.total_estimated_minutes(),
            actual_minutes: None,
            alarms_triggered,
            completed_stops,
            user_id: capture.user_id,
        }
    }

    /// Attach an owning user.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// End an in-progress record with a terminal `status`.
    ///
    /// # Errors
    /// Returns [`HistoryError::AlreadyEnded`] when the record already has an
    /// end time, [`HistoryError::InvalidTransition`] when `status` is not
    /// terminal, and [`HistoryError::EndBeforeStart`] when `ended_at`
    /// precedes the start.
    pub fn finish(
        &mut self,
        status: NavigationStatus,
        ended_at: DateTime<Utc>,
    ) -> Result<(), HistoryError> {
        if self.ended_at.is_some() {
            return Err(HistoryError::AlreadyEnded { id: self.id });
        }
        if !self.status.can_transition_to(status) {
            return Err(HistoryError::InvalidTransition {
                id: self.id,
                from: self.status,
                to: status,
            });
        }
        if ended_at < self.started_at {
            return Err(HistoryError::EndBeforeStart {
                started_at: self.started_at,
                ended_at,
            });
        }
        let elapsed = ended_at.signed_duration_since(self.started_at).num_minutes();
        self.actual_minutes = Some(u32::try_from(elapsed).unwrap_or(u32::MAX));
        self.ended_at = Some(ended_at);
        self.status = status;
        Ok(())
    }

    /// Restore a record from its persisted shape.
    ///
    /// # Errors
    /// Returns a [`HistoryError`] when the parts break a record invariant:
    /// stop counts that disagree, an end before the start, an end time
    /// that does not match the status, or an actual duration without an end
    /// time (or the reverse).
    pub fn from_parts(parts: RecordParts) -> Result<Self, HistoryError> {
        if parts.total_stops != parts.destinations.len() {
            return Err(HistoryError::StopCountMismatch {
                total: parts.total_stops,
                destinations: parts.destinations.len(),
            });
        }
        if parts.completed_stops > parts.total_stops {
            return Err(HistoryError::CompletedExceedsTotal {
                completed: parts.completed_stops,
                total: parts.total_stops,
            });
        }
        match (parts.status.is_terminal(), parts.ended_at) {
            (true, None) => {
                return Err(HistoryError::MissingEndTime {
                    status: parts.status,
                });
            }
            (false, Some(_)) => return Err(HistoryError::UnexpectedEndTime),
            (_, Some(ended_at)) if ended_at < parts.started_at => {
                return Err(HistoryError::EndBeforeStart {
                    started_at: parts.started_at,
                    ended_at,
                });
            }
            _ => {}
        }
        if parts.actual_minutes.is_some() != parts.ended_at.is_some() {
            return Err(HistoryError::DurationWithoutEnd);
        }
        Ok(Self {
            id: parts.id,
            description: parts.description,
            started_at: parts.started_at,
            ended_at: parts.ended_at,
            status: parts.status,
            start_location: parts.start_location,
            destinations: parts.destinations,
            total_distance_km: parts.total_distance_km,
            estimated_minutes: parts.estimated_minutes,
            actual_minutes: parts.actual_minutes,
            alarms_triggered: parts.alarms_triggered,
            completed_stops: parts.completed_stops,
            user_id: parts.user_id,
        })
    }

    /// Convert into the persisted shape.
    pub fn into_parts(self) -> RecordParts {
        let total_stops = self.destinations.len();
        RecordParts {
            id: self.id,
            description: self.description,
            started_at: self.started_at,
            ended_at: self.ended_at,
            status: self.status,
            start_location: self.start_location,
            destinations: self.destinations,
            total_distance_km: self.total_distance_km,
            estimated_minutes: self.estimated_minutes,
            actual_minutes: self.actual_minutes,
            alarms_triggered: self.alarms_triggered,
            completed_stops: self.completed_stops,
            total_stops,
            user_id: self.user_id,
        }
    }

    /// Record identifier.
    pub const fn id(&self) -> RecordId {
        self.id
    }

    /// Route summary frozen at capture time.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Session start.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Session end, once finished.
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Outcome of the session.
    pub const fn status(&self) -> NavigationStatus {
        self.status
    }

    /// Where the traveller started, if known.
    pub const fn start_location(&self) -> Option<&Place> {
        self.start_location.as_ref()
    }

    /// Per-stop outcomes in route order.
    pub fn destinations(&self) -> &[DestinationSummary] {
        &self.destinations
    }

    /// Sum of leg distances in kilometres.
    pub const fn total_distance_km(&self) -> f64 {
        self.total_distance_km
    }

    /// Sum of leg estimates in minutes.
    pub const fn estimated_minutes(&self) -> u32 {
        self.estimated_minutes
    }

    /// Wall-clock duration in minutes, once finished.
    pub const fn actual_minutes(&self) -> Option<u32> {
        self.actual_minutes
    }

    /// Number of alarms that fired.
    pub const fn alarms_triggered(&self) -> usize {
        self.alarms_triggered
    }

    /// Number of stops passed.
    pub const fn completed_stops(&self) -> usize {
        self.completed_stops
    }

    /// Number of stops.
    pub fn total_stops(&self) -> usize {
        self.destinations.len()
    }

    /// Owning user, if any.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Duration for display: the actual duration when known, otherwise the
    /// estimate.
    pub fn duration_text(&self) -> String {
        format_duration(self.actual_minutes.unwrap_or(self.estimated_minutes))
    }

    /// Share of stops passed, rounded down to a whole percentage.
    pub fn completion_percentage(&self) -> usize {
        completion_percentage(self.completed_stops, self.total_stops())
    }
}

impl From<HistoryRecord> for RecordParts {
    fn from(record: HistoryRecord) -> Self {
        record.into_parts()
    }
}

impl TryFrom<RecordParts> for HistoryRecord {
    type Error = HistoryError;

    fn try_from(parts: RecordParts) -> Result<Self, Self::Error> {
        Self::from_parts(parts)
    }
}

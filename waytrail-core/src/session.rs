//! Host-side bookkeeping for an active traversal.
//!
//! A [`NavigationSession`] owns the route being travelled and remembers what
//! the route itself does not: when the trip started, when each stop was
//! reached, and which arrival alarms fired. Arrival signals from the
//! geofence collaborator are fed to [`NavigationSession::arrive`]; the
//! session does not deduplicate or reorder them.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::history::{Capture, check_terminal};
use crate::{HistoryError, HistoryRecord, NavigationStatus, Place, Route, WaypointId};

/// What an arrival signal did to the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalOutcome {
    /// The cursor moved to the next stop.
    Advanced,
    /// The last stop was reached; the route is completed.
    Finished,
    /// Nothing changed: the route is empty or already completed.
    Ignored,
}

/// A route being travelled, plus its arrival log.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use waytrail_core::{ArrivalOutcome, NavigationSession, NavigationStatus, Place, Route};
///
/// let route = Route::from_places("Loop", ["Gate", "Keep"].map(Place::named));
/// let start = Utc::now();
/// let mut session = NavigationSession::start(route, start);
///
/// assert_eq!(session.arrive(start), ArrivalOutcome::Advanced);
/// assert_eq!(session.arrive(start), ArrivalOutcome::Finished);
///
/// let record = session.finalize(NavigationStatus::Completed, start)?;
/// assert_eq!(record.completed_stops(), 2);
/// # Ok::<(), waytrail_core::HistoryError>(())
/// ```
#[derive(Debug, Clone)]
pub struct NavigationSession {
    route: Route,
    started_at: DateTime<Utc>,
    start_location: Option<Place>,
    user_id: Option<String>,
    arrivals: HashMap<WaypointId, DateTime<Utc>>,
    alarms: HashSet<WaypointId>,
}

impl NavigationSession {
    /// Begin travelling `route` at `started_at`. The route is marked active.
    pub fn start(mut route: Route, started_at: DateTime<Utc>) -> Self {
        route.set_active(true);
        Self {
            route,
            started_at,
            start_location: None,
            user_id: None,
            arrivals: HashMap::new(),
            alarms: HashSet::new(),
        }
    }

    /// Record where the traveller set off from.
    #[must_use]
    pub fn with_start_location(mut self, place: Place) -> Self {
        self.start_location = Some(place);
        self
    }

    /// Attribute the session to a user.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// The route being travelled.
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Mutable access for structural edits such as removing a stop.
    pub fn route_mut(&mut self) -> &mut Route {
        &mut self.route
    }

    /// Session start.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Arrival time recorded for `id`, if any.
    pub fn arrival_time(&self, id: WaypointId) -> Option<DateTime<Utc>> {
        self.arrivals.get(&id).copied()
    }

    /// Whether the alarm for `id` fired.
    pub fn alarm_triggered(&self, id: WaypointId) -> bool {
        self.alarms.contains(&id)
    }

    /// Handle "the traveller reached the current stop".
    ///
    /// Logs the arrival, fires the stop's alarm when enabled, then advances
    /// the route. On the last stop the route is finished instead.
    pub fn arrive(&mut self, at: DateTime<Utc>) -> ArrivalOutcome {
        let Some(current) = self.route.current_point() else {
            debug!("route {}: arrival ignored, no current stop", self.route.id());
            return ArrivalOutcome::Ignored;
        };
        let id = current.id();
        if current.alarm_enabled() {
            self.alarms.insert(id);
        }
        self.arrivals.insert(id, at);

        if self.route.advance() {
            ArrivalOutcome::Advanced
        } else if self.route.finish() {
            ArrivalOutcome::Finished
        } else {
            ArrivalOutcome::Ignored
        }
    }

    /// Move past the current stop without recording an arrival.
    ///
    /// Skipping the last stop finishes the route.
    pub fn skip(&mut self) -> ArrivalOutcome {
        if self.route.advance() {
            ArrivalOutcome::Advanced
        } else if self.route.finish() {
            ArrivalOutcome::Finished
        } else {
            ArrivalOutcome::Ignored
        }
    }

    /// Capture the session so far as an in-progress record.
    pub fn snapshot(&self) -> HistoryRecord {
        HistoryRecord::capture(self.capture())
    }

    /// End the session with a terminal `status`.
    ///
    /// # Errors
    /// Returns [`HistoryError::NonTerminalStatus`] for
    /// [`NavigationStatus::InProgress`], [`HistoryError::RouteNotCompleted`]
    /// for [`NavigationStatus::Completed`] before the last arrival, and
    /// [`HistoryError::EndBeforeStart`] when `ended_at` precedes the session
    /// start.
    pub fn finalize(
        self,
        status: NavigationStatus,
        ended_at: DateTime<Utc>,
    ) -> Result<HistoryRecord, HistoryError> {
        check_terminal(&self.route, status)?;
        let mut record = self.snapshot();
        record.finish(status, ended_at)?;
        info!(
            "session on route {} ended as {status} after {}",
            self.route.id(),
            record.duration_text()
        );
        Ok(record)
    }

    fn capture(&self) -> Capture<'_> {
        Capture {
            route: &self.route,
            started_at: self.started_at,
            start_location: self.start_location.clone(),
            user_id: self.user_id.clone(),
            arrivals: &self.arrivals,
            alarms: &self.alarms,
        }
    }
}

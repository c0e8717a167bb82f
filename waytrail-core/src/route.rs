//! Multi-stop routes and their progression cursor.
//!
//! A [`Route`] owns its waypoints exclusively. All mutations go through
//! `&mut self`, so hosts that share a route across threads must put it
//! behind a single writer such as a mutex or an actor.
//!
//! The cursor only moves forward. [`Route::advance`] stops on the last
//! waypoint; moving past it is a separate, explicit [`Route::finish`] so the
//! host can decide how a traversal ends.

use chrono::{DateTime, Utc};
use log::debug;

use crate::{Leg, Place, RouteId, Waypoint, WaypointId, describe_route};

/// Where a route stands, derived from its cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressState {
    /// Nothing has been visited yet.
    NotStarted,
    /// At least one stop remains.
    InProgress,
    /// The cursor has moved past every stop.
    Completed,
}

/// An ordered, traversable sequence of waypoints.
///
/// # Examples
/// ```
/// use waytrail_core::{Place, Route};
///
/// let mut route = Route::new("Saturday errands");
/// route.append(Place::named("Bakery"));
/// route.append(Place::named("Library"));
///
/// assert!(route.advance());
/// assert_eq!(route.current_point().map(|p| p.name()), Some("Library"));
/// assert!(!route.advance());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    id: RouteId,
    name: String,
    points: Vec<Waypoint>,
    cursor: usize,
    alarm_for_each_stop: bool,
    voice_announcements_enabled: bool,
    created_at: DateTime<Utc>,
    active: bool,
    revision: u64,
}

impl Route {
    /// Construct an empty route created now.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_created_at(name, Utc::now())
    }

    /// Construct an empty route with an explicit creation time.
    pub fn with_created_at(name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: RouteId::new(),
            name: name.into(),
            points: Vec::new(),
            cursor: 0,
            alarm_for_each_stop: false,
            voice_announcements_enabled: false,
            created_at,
            active: false,
            revision: 0,
        }
    }

    /// Construct a route pre-populated with `places`, in order.
    ///
    /// # Examples
    /// ```
    /// use waytrail_core::{Place, Route};
    ///
    /// let route = Route::from_places("Tour", ["Gate", "Keep"].map(Place::named));
    /// assert_eq!(route.len(), 2);
    /// assert_eq!(route.points()[1].order(), 1);
    /// ```
    pub fn from_places<I>(name: impl Into<String>, places: I) -> Self
    where
        I: IntoIterator<Item = Place>,
    {
        let mut route = Self::new(name);
        for place in places {
            route.append(place);
        }
        route
    }

    /// Set whether newly appended waypoints get an arrival alarm.
    pub const fn with_alarm_for_each_stop(mut self, enabled: bool) -> Self {
        self.alarm_for_each_stop = enabled;
        self
    }

    /// Stable identifier.
    pub const fn id(&self) -> RouteId {
        self.id
    }

    /// Route name chosen by the user.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All waypoints in travel order.
    pub fn points(&self) -> &[Waypoint] {
        &self.points
    }

    /// Number of waypoints.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the route has no waypoints.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the current waypoint.
    ///
    /// Removing waypoints does not move the cursor, so this may exceed
    /// [`len`](Self::len).
    pub const fn current_point_index(&self) -> usize {
        self.cursor
    }

    /// Default alarm flag for appended waypoints.
    pub const fn alarm_for_each_stop(&self) -> bool {
        self.alarm_for_each_stop
    }

    /// Change the default alarm flag. Existing waypoints keep their flag.
    pub fn set_alarm_for_each_stop(&mut self, enabled: bool) {
        self.alarm_for_each_stop = enabled;
        self.touch();
    }

    /// Whether spoken announcements are enabled.
    pub const fn voice_announcements_enabled(&self) -> bool {
        self.voice_announcements_enabled
    }

    /// Enable or disable spoken announcements.
    pub fn set_voice_announcements_enabled(&mut self, enabled: bool) {
        self.voice_announcements_enabled = enabled;
        self.touch();
    }

    /// Creation timestamp.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the host is currently navigating this route.
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Mark the route as being navigated or not.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.touch();
    }

    /// Counter bumped by every mutation.
    ///
    /// Hosts holding derived data can compare revisions to detect staleness.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Append a stop with an unknown leg.
    pub fn append(&mut self, place: Place) -> Waypoint {
        self.append_with_leg(place, Leg::default())
    }

    /// Append a stop reached via `leg` from the previous stop.
    ///
    /// The new waypoint takes the next order and inherits
    /// [`alarm_for_each_stop`](Self::alarm_for_each_stop).
    pub fn append_with_leg(&mut self, place: Place, leg: Leg) -> Waypoint {
        let waypoint = Waypoint::new(place, self.points.len(), self.alarm_for_each_stop, leg);
        self.points.push(waypoint.clone());
        self.touch();
        waypoint
    }

    /// Remove the waypoint with `id`, renumbering the rest.
    ///
    /// An unknown id is a no-op. The cursor is left untouched even when the
    /// removed stop sat at or before it.
    ///
    /// # Examples
    /// ```
    /// use waytrail_core::{Place, Route};
    ///
    /// let mut route = Route::from_places("Tour", ["Gate", "Keep", "Moat"].map(Place::named));
    /// let keep = route.points()[1].id();
    /// route.remove(keep);
    /// let orders: Vec<_> = route.points().iter().map(|p| p.order()).collect();
    /// assert_eq!(orders, vec![0, 1]);
    /// ```
    pub fn remove(&mut self, id: WaypointId) -> Option<Waypoint> {
        let Some(position) = self.points.iter().position(|p| p.id() == id) else {
            debug!("route {}: waypoint {id} not found, nothing removed", self.id);
            return None;
        };
        let removed = self.points.remove(position);
        self.renumber();
        self.touch();
        Some(removed)
    }

    /// Move past the current waypoint, marking it completed.
    ///
    /// Returns `false` without changing anything when the route is empty or
    /// the cursor already sits on (or beyond) the last waypoint. Leaving the
    /// last waypoint is done by [`finish`](Self::finish).
    pub fn advance(&mut self) -> bool {
        let last = self.points.len().checked_sub(1);
        if last.is_none_or(|last| self.cursor >= last) {
            debug!(
                "route {}: advance ignored at cursor {} of {}",
                self.id,
                self.cursor,
                self.points.len()
            );
            return false;
        }
        self.complete_current();
        true
    }

    /// Move past the final waypoint, completing the route.
    ///
    /// Only valid while the cursor sits exactly on the last waypoint;
    /// otherwise returns `false` without changing anything.
    ///
    /// # Examples
    /// ```
    /// use waytrail_core::{Place, ProgressState, Route};
    ///
    /// let mut route = Route::from_places("Hop", [Place::named("Stop")]);
    /// assert!(!route.advance());
    /// assert!(route.finish());
    /// assert_eq!(route.state(), ProgressState::Completed);
    /// ```
    pub fn finish(&mut self) -> bool {
        let last = self.points.len().checked_sub(1);
        if last != Some(self.cursor) {
            return false;
        }
        self.complete_current();
        true
    }

    /// Mutable access to a waypoint's alarm flag and leg.
    pub fn waypoint_mut(&mut self, id: WaypointId) -> Option<&mut Waypoint> {
        let found = self.points.iter_mut().find(|p| p.id() == id);
        if found.is_some() {
            self.revision = self.revision.wrapping_add(1);
        }
        found
    }

    /// The waypoint under the cursor, if any.
    pub fn current_point(&self) -> Option<&Waypoint> {
        self.points.get(self.cursor)
    }

    /// The waypoint after the current one, if any.
    pub fn next_point(&self) -> Option<&Waypoint> {
        self.points.get(self.cursor.saturating_add(1))
    }

    /// Waypoints after the next one.
    ///
    /// Neither the current nor the next waypoint is included, so the three
    /// views partition the unpassed stops: `current_point`, `next_point`,
    /// then `remaining_points`.
    ///
    /// # Examples
    /// ```
    /// use waytrail_core::{Place, Route};
    ///
    /// let route = Route::from_places("Tour", ["A", "B", "C", "D"].map(Place::named));
    /// let names: Vec<_> = route.remaining_points().iter().map(|p| p.name()).collect();
    /// assert_eq!(names, ["C", "D"]);
    /// ```
    pub fn remaining_points(&self) -> &[Waypoint] {
        self.points
            .get(self.cursor.saturating_add(2)..)
            .unwrap_or_default()
    }

    /// Waypoints before the cursor.
    pub fn completed_points(&self) -> &[Waypoint] {
        let end = self.cursor.min(self.points.len());
        self.points.get(..end).unwrap_or_default()
    }

    /// Whether the cursor has moved past every waypoint.
    ///
    /// An empty route counts as completed.
    pub fn is_completed(&self) -> bool {
        self.cursor >= self.points.len()
    }

    /// Fraction of waypoints passed, in `[0.0, 1.0]`.
    ///
    /// Empty routes report `0.0`.
    pub fn progress(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        let passed = self.cursor.min(self.points.len());
        ratio(passed, self.points.len())
    }

    /// Progression state derived from the cursor.
    pub fn state(&self) -> ProgressState {
        if self.is_completed() {
            ProgressState::Completed
        } else if self.cursor == 0 && self.points.iter().all(|p| !p.is_completed()) {
            ProgressState::NotStarted
        } else {
            ProgressState::InProgress
        }
    }

    /// Sum of leg distances in kilometres.
    pub fn total_distance_km(&self) -> f64 {
        self.points.iter().map(|p| p.leg().distance_km()).sum()
    }

    /// Sum of leg travel estimates in minutes.
    pub fn total_estimated_minutes(&self) -> u32 {
        self.points
            .iter()
            .fold(0_u32, |acc, p| acc.saturating_add(p.leg().estimated_minutes()))
    }

    /// One-line summary of the stops, as frozen into history records.
    pub fn description(&self) -> String {
        let names: Vec<&str> = self.points.iter().map(Waypoint::name).collect();
        describe_route(&names)
    }

    fn complete_current(&mut self) {
        if let Some(current) = self.points.get_mut(self.cursor) {
            current.completed = true;
        }
        self.cursor = self.cursor.saturating_add(1);
        self.touch();
    }

    fn renumber(&mut self) {
        for (index, point) in self.points.iter_mut().enumerate() {
            point.order = index;
        }
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    // Stop counts stay far below 2^52, so the conversions are exact.
    let numerator = u32::try_from(numerator).map_or(f64::from(u32::MAX), f64::from);
    let denominator = u32::try_from(denominator).map_or(f64::from(u32::MAX), f64::from);
    (numerator / denominator).clamp(0.0, 1.0)
}

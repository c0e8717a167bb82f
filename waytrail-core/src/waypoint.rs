//! Individual stops within a route.

use crate::{Place, WaypointId, label_for_order};

/// Pre-computed travel from the previous stop.
///
/// The engine never computes geometry; hosts supply these values from their
/// routing provider. The first stop's leg is usually measured from the
/// traveller's starting position.
///
/// # Examples
/// ```
/// use waytrail_core::Leg;
///
/// let leg = Leg::new(2.5, 12);
/// assert_eq!(leg.estimated_minutes(), 12);
/// assert_eq!(Leg::new(-1.0, 0).distance_km(), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leg {
    distance_km: f64,
    estimated_minutes: u32,
}

impl Leg {
    /// Construct a leg. Negative or non-finite distances are clamped to zero.
    pub fn new(distance_km: f64, estimated_minutes: u32) -> Self {
        let distance_km = if distance_km.is_finite() {
            distance_km.max(0.0)
        } else {
            0.0
        };
        Self {
            distance_km,
            estimated_minutes,
        }
    }

    /// Distance from the previous stop in kilometres.
    pub const fn distance_km(&self) -> f64 {
        self.distance_km
    }

    /// Estimated travel time from the previous stop in minutes.
    pub const fn estimated_minutes(&self) -> u32 {
        self.estimated_minutes
    }
}

/// A single stop in a [`Route`](crate::Route).
///
/// Order and completion are owned by the route: they change only through
/// [`Route`](crate::Route) operations so that the ordering invariant holds
/// after every mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    id: WaypointId,
    place: Place,
    pub(crate) order: usize,
    alarm_enabled: bool,
    leg: Leg,
    pub(crate) completed: bool,
}

impl Waypoint {
    pub(crate) fn new(place: Place, order: usize, alarm_enabled: bool, leg: Leg) -> Self {
        Self {
            id: WaypointId::new(),
            place,
            order,
            alarm_enabled,
            leg,
            completed: false,
        }
    }

    /// Stable identifier.
    pub const fn id(&self) -> WaypointId {
        self.id
    }

    /// The place this stop refers to.
    pub const fn place(&self) -> &Place {
        &self.place
    }

    /// Display name of the place.
    pub fn name(&self) -> &str {
        &self.place.name
    }

    /// Zero-based position within the owning route.
    pub const fn order(&self) -> usize {
        self.order
    }

    /// Map label derived from [`order`](Self::order).
    ///
    /// # Examples
    /// ```
    /// use waytrail_core::{Place, Route};
    ///
    /// let mut route = Route::new("Errands");
    /// let first = route.append(Place::named("Bakery"));
    /// assert_eq!(first.label(), "A");
    /// ```
    pub fn label(&self) -> String {
        label_for_order(self.order)
    }

    /// Whether an alarm should fire on arrival.
    pub const fn alarm_enabled(&self) -> bool {
        self.alarm_enabled
    }

    /// Enable or disable the arrival alarm for this stop.
    pub fn set_alarm_enabled(&mut self, enabled: bool) {
        self.alarm_enabled = enabled;
    }

    /// Travel from the previous stop.
    pub const fn leg(&self) -> Leg {
        self.leg
    }

    /// Replace the travel estimate from the previous stop.
    pub fn set_leg(&mut self, leg: Leg) {
        self.leg = leg;
    }

    /// Whether the traveller has moved past this stop.
    pub const fn is_completed(&self) -> bool {
        self.completed
    }
}

//! Builders shared by unit and behaviour tests.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::{HistoryRecord, NavigationStatus, Place, Route, finalize};

/// Fixed reference instant shifted by `minutes`.
pub fn instant(minutes: i64) -> DateTime<Utc> {
    let base = Utc
        .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_default();
    base + Duration::minutes(minutes)
}

/// Route created at [`instant(0)`](instant) visiting `names` in order.
pub fn route_through(names: &[&str]) -> Route {
    let mut route = Route::with_created_at("Test route", instant(0));
    for name in names {
        route.append(Place::named(*name));
    }
    route
}

/// Record with `status` for a route through `names`.
///
/// Terminal records end thirty minutes after they start. Completed records
/// come from a route that passed every stop.
pub fn record_with(status: NavigationStatus, names: &[&str]) -> HistoryRecord {
    let mut route = route_through(names);
    if status == NavigationStatus::Completed {
        while route.advance() {}
        route.finish();
    }
    if status.is_terminal() {
        finalize(&route, status, instant(30))
            .unwrap_or_else(|_| HistoryRecord::in_progress(&route, instant(0)))
    } else {
        HistoryRecord::in_progress(&route, instant(0))
    }
}

//! Display helpers shared by routes and history records.
//!
//! Everything here is a pure function of its inputs. Callers recompute the
//! values on every read instead of caching them alongside mutable state.

/// Text shown for a route without any destinations.
pub const NO_DESTINATIONS: &str = "No destinations";

const ARROW: &str = " → ";
const ELLIPSIS: &str = "…";
const LETTER_LABELS: [char; 10] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J'];
const MINUTES_PER_HOUR: u32 = 60;
const MINUTES_PER_DAY: u32 = 24 * MINUTES_PER_HOUR;

/// Return the map label for a waypoint at `order`.
///
/// The first ten stops are lettered `A` to `J`; later stops use their
/// one-based position in decimal.
///
/// # Examples
/// ```
/// use waytrail_core::label_for_order;
///
/// assert_eq!(label_for_order(0), "A");
/// assert_eq!(label_for_order(9), "J");
/// assert_eq!(label_for_order(10), "11");
/// ```
pub fn label_for_order(order: usize) -> String {
    match LETTER_LABELS.get(order) {
        Some(letter) => letter.to_string(),
        None => order.saturating_add(1).to_string(),
    }
}

/// Summarise a sequence of stop names as a single line.
///
/// Short routes list every stop; longer routes keep only the first and last
/// names around an ellipsis.
///
/// # Examples
/// ```
/// use waytrail_core::describe_route;
///
/// assert_eq!(describe_route::<&str>(&[]), "No destinations");
/// assert_eq!(describe_route(&["Dock"]), "Trip to Dock");
/// assert_eq!(describe_route(&["Dock", "Mill", "Fort"]), "Dock → Mill → Fort");
/// assert_eq!(describe_route(&["Dock", "Mill", "Fort", "Pier"]), "Dock → … → Pier");
/// ```
pub fn describe_route<S: AsRef<str>>(names: &[S]) -> String {
    match names {
        [] => NO_DESTINATIONS.to_owned(),
        [only] => format!("Trip to {}", only.as_ref()),
        [_, _] | [_, _, _] => names
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(ARROW),
        [first, .., last] => format!(
            "{}{ARROW}{ELLIPSIS}{ARROW}{}",
            first.as_ref(),
            last.as_ref()
        ),
    }
}

/// Format a whole number of minutes for display.
///
/// Durations under an hour show minutes only, durations under a day show
/// hours and minutes, and anything longer shows days and hours.
///
/// # Examples
/// ```
/// use waytrail_core::format_duration;
///
/// assert_eq!(format_duration(45), "45m");
/// assert_eq!(format_duration(135), "2h 15m");
/// assert_eq!(format_duration(1500), "1d 1h");
/// ```
pub fn format_duration(minutes: u32) -> String {
    if minutes < MINUTES_PER_HOUR {
        format!("{minutes}m")
    } else if minutes < MINUTES_PER_DAY {
        let hours = minutes / MINUTES_PER_HOUR;
        let rest = minutes % MINUTES_PER_HOUR;
        format!("{hours}h {rest}m")
    } else {
        let days = minutes / MINUTES_PER_DAY;
        let hours = (minutes % MINUTES_PER_DAY) / MINUTES_PER_HOUR;
        format!("{days}d {hours}h")
    }
}

/// Percentage of completed stops, rounded down.
///
/// Returns `0` when there are no stops at all.
///
/// # Examples
/// ```
/// use waytrail_core::completion_percentage;
///
/// assert_eq!(completion_percentage(1, 3), 33);
/// assert_eq!(completion_percentage(0, 0), 0);
/// ```
pub fn completion_percentage(completed: usize, total: usize) -> usize {
    completed.saturating_mul(100).checked_div(total).unwrap_or(0)
}

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Outcome of a navigation session.
///
/// Only [`InProgress`](Self::InProgress) may change; every other status is
/// terminal.
///
/// # Examples
/// ```
/// use waytrail_core::NavigationStatus;
///
/// assert_eq!(NavigationStatus::Cancelled.as_str(), "cancelled");
/// assert!(NavigationStatus::InProgress.can_transition_to(NavigationStatus::Failed));
/// assert!(!NavigationStatus::Completed.can_transition_to(NavigationStatus::Failed));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NavigationStatus {
    /// The traveller is still on the way.
    InProgress,
    /// Every stop was reached.
    Completed,
    /// The traveller stopped navigating.
    Cancelled,
    /// Navigation was aborted by an error.
    Failed,
}

impl NavigationStatus {
    /// Every status, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
        Self::Failed,
    ];

    /// Return the status as a lowercase tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }

    /// Whether the status can no longer change.
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    /// Whether a record in this status may move to `next`.
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(self, Self::InProgress) && next.is_terminal()
    }
}

impl fmt::Display for NavigationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown navigation status '{0}'")]
pub struct ParseStatusError(pub String);

impl FromStr for NavigationStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseStatusError(s.to_owned())),
        }
    }
}

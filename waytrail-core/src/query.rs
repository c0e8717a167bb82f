//! Filtering navigation history by status and free text.
//!
//! A record matches a [`HistoryQuery`] when both of these hold:
//!
//! - its status is in the accepted set, or the set is empty;
//! - the query text is empty, or it occurs case-insensitively in the
//!   record's description or in any destination name.
//!
//! Filtering is stable: matching records keep their input order.
//!
//! History screens present fewer categories than there are statuses. The
//! mapping lives in [`FilterCategory::statuses`]: selecting
//! [`FilterCategory::Cancelled`] accepts both cancelled and failed records.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::{HistoryRecord, NavigationStatus};

/// User-facing status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum FilterCategory {
    /// Sessions still running.
    InProgress,
    /// Sessions that reached every stop.
    Completed,
    /// Sessions that ended early, by choice or by error.
    Cancelled,
}

/// Statuses selected by each category.
const CATEGORY_STATUSES: [(FilterCategory, &[NavigationStatus]); 3] = [
    (FilterCategory::InProgress, &[NavigationStatus::InProgress]),
    (FilterCategory::Completed, &[NavigationStatus::Completed]),
    (
        FilterCategory::Cancelled,
        &[NavigationStatus::Cancelled, NavigationStatus::Failed],
    ),
];

impl FilterCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 3] = [Self::InProgress, Self::Completed, Self::Cancelled];

    /// Return the category as a kebab-case name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Underlying statuses this category accepts.
    ///
    /// # Examples
    /// ```
    /// use waytrail_core::{FilterCategory, NavigationStatus};
    ///
    /// assert_eq!(
    ///     FilterCategory::Cancelled.statuses(),
    ///     &[NavigationStatus::Cancelled, NavigationStatus::Failed]
    /// );
    /// ```
    pub fn statuses(self) -> &'static [NavigationStatus] {
        CATEGORY_STATUSES
            .iter()
            .find(|(category, _)| *category == self)
            .map(|(_, statuses)| *statuses)
            .unwrap_or_default()
    }
}

impl fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown history category '{0}' (expected in-progress, completed or cancelled)")]
pub struct ParseCategoryError(pub String);

impl FromStr for FilterCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseCategoryError(s.to_owned())),
        }
    }
}

/// Composite status and text filter over history records.
///
/// # Examples
/// ```
/// use waytrail_core::{FilterCategory, HistoryQuery};
///
/// let query = HistoryQuery::new()
///     .with_category(FilterCategory::Completed)
///     .with_text("market");
/// assert!(!query.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryQuery {
    statuses: BTreeSet<NavigationStatus>,
    text: String,
}

impl HistoryQuery {
    /// A query that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `status` in addition to any already accepted.
    #[must_use]
    pub fn with_status(mut self, status: NavigationStatus) -> Self {
        self.statuses.insert(status);
        self
    }

    /// Accept every status of `category`.
    #[must_use]
    pub fn with_category(mut self, category: FilterCategory) -> Self {
        self.add_category(category);
        self
    }

    /// Replace the search text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Accept every status of `category`.
    pub fn add_category(&mut self, category: FilterCategory) {
        self.statuses.extend(category.statuses().iter().copied());
    }

    /// Stop accepting the statuses of `category`.
    pub fn remove_category(&mut self, category: FilterCategory) {
        for status in category.statuses() {
            self.statuses.remove(status);
        }
    }

    /// Whether every status of `category` is accepted.
    pub fn has_category(&self, category: FilterCategory) -> bool {
        category
            .statuses()
            .iter()
            .all(|status| self.statuses.contains(status))
    }

    /// Replace the search text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Accepted statuses; empty means any.
    pub const fn statuses(&self) -> &BTreeSet<NavigationStatus> {
        &self.statuses
    }

    /// Search text; empty means any.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the query accepts every record.
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty() && self.text.is_empty()
    }

    /// Whether `record` satisfies both predicates.
    pub fn matches(&self, record: &HistoryRecord) -> bool {
        self.matches_status(record) && TextMatcher::new(&self.text).matches(record)
    }

    /// Matching records in input order.
    pub fn filter<'a, I>(&self, records: I) -> Vec<&'a HistoryRecord>
    where
        I: IntoIterator<Item = &'a HistoryRecord>,
    {
        let text = TextMatcher::new(&self.text);
        records
            .into_iter()
            .filter(|record| self.matches_status(record) && text.matches(record))
            .collect()
    }

    fn matches_status(&self, record: &HistoryRecord) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&record.status())
    }
}

/// Lower-cased needle, computed once per filter pass.
struct TextMatcher(Option<String>);

impl TextMatcher {
    fn new(text: &str) -> Self {
        Self((!text.is_empty()).then(|| text.to_lowercase()))
    }

    fn matches(&self, record: &HistoryRecord) -> bool {
        let Some(needle) = &self.0 else {
            return true;
        };
        record.description().to_lowercase().contains(needle.as_str())
            || record
                .destinations()
                .iter()
                .any(|d| d.name.to_lowercase().contains(needle.as_str()))
    }
}

/// Select records whose status is in `statuses` (or any, when empty) and
/// whose description or destination names contain `query`, ignoring case.
///
/// Never fails; an empty input yields an empty output.
pub fn filter_records<'a>(
    records: &'a [HistoryRecord],
    statuses: &BTreeSet<NavigationStatus>,
    query: &str,
) -> Vec<&'a HistoryRecord> {
    let query = HistoryQuery {
        statuses: statuses.clone(),
        text: query.to_owned(),
    };
    query.filter(records)
}

/// Filter state behind a history screen.
///
/// Holds the latest record set pushed by storage together with the user's
/// current query. [`visible`](Self::visible) recomputes the filtered view on
/// every call, so it never goes stale after either side changes.
#[derive(Debug, Clone, Default)]
pub struct HistoryView {
    records: Vec<HistoryRecord>,
    query: HistoryQuery,
}

impl HistoryView {
    /// An empty view with no filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the record set, e.g. after a storage change notification.
    pub fn replace_records(&mut self, records: Vec<HistoryRecord>) {
        self.records = records;
    }

    /// Replace the whole query.
    pub fn set_query(&mut self, query: HistoryQuery) {
        self.query = query;
    }

    /// Replace only the search text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.query.set_text(text);
    }

    /// Flip a category chip on or off. Returns whether it is now on.
    pub fn toggle_category(&mut self, category: FilterCategory) -> bool {
        if self.query.has_category(category) {
            self.query.remove_category(category);
            false
        } else {
            self.query.add_category(category);
            true
        }
    }

    /// Clear every filter.
    pub fn clear_filters(&mut self) {
        self.query = HistoryQuery::new();
    }

    /// Current query.
    pub const fn query(&self) -> &HistoryQuery {
        &self.query
    }

    /// Every record, unfiltered.
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// Records passing the current query, in stored order.
    pub fn visible(&self) -> Vec<&HistoryRecord> {
        self.query.filter(&self.records)
    }
}

//! Bug list view model
//!
//! Pure functions deriving what the dashboard shows from the loaded records:
//! the filtered and sorted rows plus per-tier counts. Nothing here performs
//! I/O, so the same view can back the table renderer, JSON output and tests.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use bug_sdk::{BugRecord, Priority};
use serde::Serialize;

/// Empty-state text when no records are loaded at all
pub const NO_BUGS_MESSAGE: &str = "No bug reports found. Start by reporting your first bug!";

/// Empty-state text when records exist but none pass the filters
pub const NO_MATCHES_MESSAGE: &str = "No bugs match your current filters.";

/// Column the table can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Title,
    Module,
    Frequency,
    UserType,
    Priority,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Title,
        SortField::Module,
        SortField::Frequency,
        SortField::UserType,
        SortField::Priority,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Module => "module",
            SortField::Frequency => "frequency",
            SortField::UserType => "user_type",
            SortField::Priority => "priority",
        }
    }

    /// Column heading
    pub fn label(self) -> &'static str {
        match self {
            SortField::Title => "Title",
            SortField::Module => "Module",
            SortField::Frequency => "Frequency",
            SortField::UserType => "User Type",
            SortField::Priority => "Priority",
        }
    }

    /// Lowercased text of this column, used for the string comparisons
    fn text_key(self, record: &BugRecord) -> String {
        let raw = match self {
            SortField::Title => record.title.as_str(),
            SortField::Module => record.module.as_str(),
            SortField::Frequency => record.frequency.as_str(),
            SortField::UserType => record.user_type.as_str(),
            SortField::Priority => record.priority.as_deref().unwrap_or(""),
        };
        raw.to_lowercase()
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        SortField::ALL
            .into_iter()
            .find(|f| f.as_str() == normalized)
            .ok_or_else(|| format!("Unknown sort field: {}", s.trim()))
    }
}

/// Sort direction, ascending unless toggled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// User-controlled inputs to the view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewParameters {
    /// Case-insensitive substring matched against title, description and module
    pub search_text: String,

    /// Only show records of this tier
    pub priority_filter: Option<Priority>,

    /// `None` keeps the order the records were loaded in
    pub sort_field: Option<SortField>,

    pub sort_direction: SortDirection,
}

impl ViewParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_priority(mut self, priority: Option<Priority>) -> Self {
        self.priority_filter = priority;
        self
    }

    pub fn sorted_by(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort_field = Some(field);
        self.sort_direction = direction;
        self
    }

    /// Column-header click: flip direction on the active column, otherwise
    /// switch to `field` ascending
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_field == Some(field) {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_field = Some(field);
            self.sort_direction = SortDirection::Ascending;
        }
    }
}

/// Per-tier counts over the full, unfiltered collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BugStats {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl BugStats {
    pub fn count(&self, priority: Priority) -> usize {
        match priority {
            Priority::Critical => self.critical,
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }

    /// Records with no recognized tier
    pub fn unranked(&self) -> usize {
        self.total - (self.critical + self.high + self.medium + self.low)
    }
}

pub fn compute_stats(records: &[BugRecord]) -> BugStats {
    records.iter().fold(
        BugStats {
            total: records.len(),
            ..BugStats::default()
        },
        |mut stats, record| {
            match record.priority_tier() {
                Some(Priority::Critical) => stats.critical += 1,
                Some(Priority::High) => stats.high += 1,
                Some(Priority::Medium) => stats.medium += 1,
                Some(Priority::Low) => stats.low += 1,
                None => {}
            }
            stats
        },
    )
}

/// `needle` must already be lowercased; an empty needle matches everything
fn matches_search(record: &BugRecord, needle: &str) -> bool {
    needle.is_empty()
        || record.title.to_lowercase().contains(needle)
        || record.description.to_lowercase().contains(needle)
        || record.module.to_lowercase().contains(needle)
}

fn matches_priority(record: &BugRecord, filter: Option<Priority>) -> bool {
    match filter {
        None => true,
        Some(tier) => record.priority_tier() == Some(tier),
    }
}

/// Records passing both the search and the priority filter, in input order
pub fn filter_bugs<'a>(records: &'a [BugRecord], params: &ViewParameters) -> Vec<&'a BugRecord> {
    let needle = params.search_text.to_lowercase();
    records
        .iter()
        .filter(|r| matches_search(r, &needle) && matches_priority(r, params.priority_filter))
        .collect()
}

/// Ascending comparison of two records on one column.
///
/// Priority compares by tier rank; every other column compares its
/// lowercased text.
pub fn compare_by(a: &BugRecord, b: &BugRecord, field: SortField) -> Ordering {
    match field {
        SortField::Priority => a.priority_rank().cmp(&b.priority_rank()),
        _ => field.text_key(a).cmp(&field.text_key(b)),
    }
}

/// Stable sort; rows comparing equal keep their relative order in either direction
pub fn sort_bugs(rows: &mut [&BugRecord], field: Option<SortField>, direction: SortDirection) {
    if let Some(field) = field {
        rows.sort_by(|a, b| direction.apply(compare_by(a, b, field)));
    }
}

/// What the dashboard displays for a given set of records and parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BugListView<'a> {
    pub rows: Vec<&'a BugRecord>,
    pub stats: BugStats,
}

impl<'a> BugListView<'a> {
    pub fn shown(&self) -> usize {
        self.rows.len()
    }

    pub fn total(&self) -> usize {
        self.stats.total
    }

    /// Text to show instead of the table when no rows are visible
    pub fn empty_message(&self) -> Option<&'static str> {
        if !self.rows.is_empty() {
            None
        } else if self.stats.total == 0 {
            Some(NO_BUGS_MESSAGE)
        } else {
            Some(NO_MATCHES_MESSAGE)
        }
    }
}

/// Filter, then sort, then count
pub fn build_view<'a>(records: &'a [BugRecord], params: &ViewParameters) -> BugListView<'a> {
    let mut rows = filter_bugs(records, params);
    sort_bugs(&mut rows, params.sort_field, params.sort_direction);

    BugListView {
        rows,
        stats: compute_stats(records),
    }
}

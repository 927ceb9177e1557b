//! Dashboard state
//!
//! The loaded records, where they came from and the current view
//! parameters. The view itself is always derived, never stored.

use bug_sdk::BugRecord;
use serde::Serialize;

use crate::loader::LoadOutcome;
use crate::view_model::{build_view, BugListView, SortField, ViewParameters};

/// Origin of the records currently held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Live,
    Demo,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    bugs: Vec<BugRecord>,
    params: ViewParameters,
    source: DataSource,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_outcome(outcome: LoadOutcome) -> Self {
        let mut state = Self::new();
        state.replace(outcome.bugs, outcome.source);
        state
    }

    pub fn bugs(&self) -> &[BugRecord] {
        &self.bugs
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn params(&self) -> &ViewParameters {
        &self.params
    }

    pub fn set_params(&mut self, params: ViewParameters) {
        self.params = params;
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.params.search_text = text.into();
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.params.toggle_sort(field);
    }

    /// Swap in a freshly loaded collection; view parameters are kept
    pub fn replace(&mut self, bugs: Vec<BugRecord>, source: DataSource) {
        self.bugs = bugs;
        self.source = source;
    }

    /// Add a newly submitted report
    pub fn append(&mut self, record: BugRecord) {
        self.bugs.push(record);
    }

    pub fn view(&self) -> BugListView<'_> {
        build_view(&self.bugs, &self.params)
    }
}

//! # Bug Dashboard
//!
//! Command-line dashboard for the bug priority service: submit a report and
//! see its predicted priority, then browse every report with search, a
//! priority filter, sortable columns and per-tier counts.
//!
//! - `view_model`: filtering, sorting and counting, with no I/O
//! - `form`: raw form input and its validation
//! - `state`: loaded records plus the current view parameters
//! - `loader`: list and submit flows over any `BugService`
//! - `render`: plain-text output

mod args;
mod commands;

pub mod form;
pub mod loader;
pub mod render;
pub mod state;
pub mod view_model;

pub use args::{Cli, Commands, ListArgs, ReportArgs};
pub use commands::run;
pub use form::{BugForm, FormField, ValidationError};
pub use loader::{load_bugs, submit_report, LoadOutcome, LoadPolicy, SubmissionOutcome, SubmitError};
pub use state::{DashboardState, DataSource};
pub use view_model::{build_view, BugListView, BugStats, SortDirection, SortField, ViewParameters};

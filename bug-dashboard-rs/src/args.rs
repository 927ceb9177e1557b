use bug_sdk::Priority;
use clap::{Args, Parser, Subcommand};

use crate::view_model::SortField;

#[derive(Parser, Debug)]
#[command(name = "bug-dashboard")]
#[command(about = "Report bugs and triage them by predicted priority", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Base URL of the bug service (overrides BUGTRIAGE_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Request timeout, e.g. `10`, `10s` or `1500ms` (overrides BUGTRIAGE_TIMEOUT_SECONDS)
    #[arg(long, global = true)]
    pub timeout: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List bug reports with per-priority counts
    List(ListArgs),

    /// Show one bug report
    Show {
        /// Report id as assigned by the service
        id: String,
    },

    /// Submit a bug report and print its predicted priority
    Report(ReportArgs),

    /// Check that the bug service is reachable
    Health,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Case-insensitive text matched against title, description and module
    #[arg(long, short, default_value = "")]
    pub search: String,

    /// Only show this priority tier
    #[arg(long, short)]
    pub priority: Option<Priority>,

    /// Sort by title, module, frequency, user_type or priority
    #[arg(long)]
    pub sort: Option<SortField>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Show demo data when the service cannot be reached
    #[arg(long)]
    pub demo_fallback: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Form fields; validation happens before anything is sent
#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    #[arg(long, default_value = "")]
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Authentication, Database, API, Frontend, Backend, Payment, Notification or Other
    #[arg(long, default_value = "")]
    pub module: String,

    /// Always, Often, Sometimes, Rarely or Once
    #[arg(long, default_value = "")]
    pub frequency: String,

    /// End User, Developer, Admin, Tester or Support
    #[arg(long, default_value = "")]
    pub user_type: String,

    /// Error output or stack trace
    #[arg(long, default_value = "")]
    pub logs: String,
}

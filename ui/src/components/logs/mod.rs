//! Telemetry Dashboard Components
//!
//! Filters, scorecards, the request chart and the request table. All of them
//! read [`DashboardState`](crate::state::DashboardState) from context.

mod chart;
mod dashboard;
mod filters;
mod scorecards;
mod table;

pub use chart::{paint, RequestChart};
pub use dashboard::LogsDashboard;
pub use filters::FilterBar;
pub use scorecards::ScorecardPanel;
pub use table::RequestTable;

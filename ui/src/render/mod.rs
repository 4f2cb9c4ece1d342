//! Presentation layer
//!
//! Pure projections from the controller's state to what the dashboard shows:
//! - [`render`]: banner, scorecards, table rows and status line
//! - [`chart::draw`]: histogram draw primitives for a given canvas size
//!
//! The Leptos components only place these values; they never compute them.

pub mod chart;
pub mod table;

use chrono::{DateTime, Local, TimeZone, Utc};
use heimdall_shared::LogEntry;

use crate::aggregate::AggregateSnapshot;
use crate::controller::ViewState;

pub use chart::{ChartFrame, ChartSurface, DrawCommand};
pub use table::{StatusBadge, TableRow};

/// Everything the renderer reads
#[derive(Clone, Copy, Debug)]
pub struct ViewModel<'a> {
    pub state: &'a ViewState,
    pub entries: &'a [LogEntry],
    pub snapshot: Option<&'a AggregateSnapshot>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Kind of the state banner above the table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerKind {
    Loading,
    Empty,
    Error,
}

impl BannerKind {
    pub fn class(&self) -> &'static str {
        match self {
            BannerKind::Loading => "state-banner loading",
            BannerKind::Empty => "state-banner empty",
            BannerKind::Error => "state-banner error",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            BannerKind::Loading => "Loading telemetry data...",
            BannerKind::Empty => "No data found for the selected filters and time range.",
            BannerKind::Error => "Last query failed. Check logs and retry.",
        }
    }
}

/// Formatted scorecard values
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scorecards {
    pub count: String,
    pub p95: String,
    pub error_rate: String,
}

impl Scorecards {
    pub fn from_snapshot(snapshot: Option<&AggregateSnapshot>) -> Self {
        let snapshot = snapshot.cloned().unwrap_or_default();
        Self {
            count: snapshot.count.to_string(),
            p95: format!("{:.1} ms", snapshot.p95_ms),
            error_rate: format!("{:.1}%", snapshot.error_rate_pct),
        }
    }
}

impl Default for Scorecards {
    fn default() -> Self {
        Self::from_snapshot(None)
    }
}

/// What the dashboard displays for one view model
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    pub state: ViewState,
    pub banner: Option<BannerKind>,
    /// Detail text of the error panel
    pub error_message: Option<String>,
    pub scorecards: Scorecards,
    /// Only filled in the `ready` state
    pub rows: Vec<TableRow>,
    /// e.g. "42 entries"
    pub result_meta: String,
    /// Local time of the last completed refresh
    pub last_updated: Option<String>,
    pub refresh_enabled: bool,
}

impl Presentation {
    pub fn show_table(&self) -> bool {
        self.state == ViewState::Ready
    }
}

impl Default for Presentation {
    fn default() -> Self {
        render_in(
            &ViewModel {
                state: &ViewState::Idle,
                entries: &[],
                snapshot: None,
                last_updated: None,
            },
            &Utc,
        )
    }
}

/// Render with the viewer's local time zone
pub fn render(model: &ViewModel<'_>) -> Presentation {
    render_in(model, &Local)
}

/// Render with times shown in `tz`
pub fn render_in<Tz>(model: &ViewModel<'_>, tz: &Tz) -> Presentation
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let banner = match model.state {
        ViewState::Loading => Some(BannerKind::Loading),
        ViewState::Empty => Some(BannerKind::Empty),
        ViewState::Error(_) => Some(BannerKind::Error),
        ViewState::Idle | ViewState::Ready => None,
    };

    let error_message = match model.state {
        ViewState::Error(message) if message.is_empty() => {
            Some("Unable to load telemetry data.".to_string())
        }
        ViewState::Error(message) => Some(message.clone()),
        _ => None,
    };

    let rows = if *model.state == ViewState::Ready {
        table::table_rows(model.entries, tz)
    } else {
        Vec::new()
    };

    Presentation {
        state: model.state.clone(),
        banner,
        error_message,
        scorecards: Scorecards::from_snapshot(model.snapshot),
        rows,
        result_meta: format!("{} entries", model.entries.len()),
        last_updated: model
            .last_updated
            .map(|at| table::format_time_of_day(&at, tz)),
        refresh_enabled: !model.state.is_loading(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::tests::{at, entry};

    fn model<'a>(
        state: &'a ViewState,
        entries: &'a [LogEntry],
        snapshot: Option<&'a AggregateSnapshot>,
    ) -> ViewModel<'a> {
        ViewModel {
            state,
            entries,
            snapshot,
            last_updated: Some(at(10, 15, 42)),
        }
    }

    #[test]
    fn test_ready_renders_rows_and_scorecards() {
        let entries = vec![entry(200, 10), entry(500, 20)];
        let snapshot = AggregateSnapshot::from_entries(&entries);
        let presentation = render_in(&model(&ViewState::Ready, &entries, Some(&snapshot)), &Utc);

        assert!(presentation.show_table());
        assert_eq!(presentation.banner, None);
        assert_eq!(presentation.rows.len(), 2);
        assert_eq!(presentation.rows[1].badge, StatusBadge::Err);
        assert_eq!(
            presentation.scorecards,
            Scorecards {
                count: "2".to_string(),
                p95: "20.0 ms".to_string(),
                error_rate: "50.0%".to_string(),
            }
        );
        assert_eq!(presentation.result_meta, "2 entries");
        assert_eq!(presentation.last_updated.as_deref(), Some("10:15:42"));
        assert!(presentation.refresh_enabled);
    }

    #[test]
    fn test_empty_renders_banner_without_rows() {
        let snapshot = AggregateSnapshot::from_entries(&[]);
        let presentation = render_in(&model(&ViewState::Empty, &[], Some(&snapshot)), &Utc);

        assert!(!presentation.show_table());
        assert_eq!(presentation.banner, Some(BannerKind::Empty));
        assert!(presentation.rows.is_empty());
        assert_eq!(presentation.scorecards.count, "0");
        assert_eq!(presentation.scorecards.p95, "0.0 ms");
        assert_eq!(presentation.scorecards.error_rate, "0.0%");
        assert_eq!(presentation.error_message, None);
    }

    #[test]
    fn test_error_hides_table_and_keeps_scorecards() {
        let entries = vec![entry(200, 10)];
        let snapshot = AggregateSnapshot::from_entries(&entries);
        let state = ViewState::Error("Query failed (HTTP 503).".to_string());
        let presentation = render_in(&model(&state, &entries, Some(&snapshot)), &Utc);

        assert!(!presentation.show_table());
        assert!(presentation.rows.is_empty());
        assert_eq!(presentation.banner, Some(BannerKind::Error));
        assert_eq!(
            presentation.error_message.as_deref(),
            Some("Query failed (HTTP 503).")
        );
        assert_eq!(presentation.scorecards.count, "1");
    }

    #[test]
    fn test_loading_disables_refresh() {
        let presentation = render_in(&model(&ViewState::Loading, &[], None), &Utc);

        assert_eq!(presentation.banner, Some(BannerKind::Loading));
        assert_eq!(presentation.banner.map(|b| b.message()), Some("Loading telemetry data..."));
        assert!(!presentation.refresh_enabled);
    }

    #[test]
    fn test_rows_capped() {
        let entries = vec![entry(200, 1); 300];
        let snapshot = AggregateSnapshot::from_entries(&entries);
        let presentation = render_in(&model(&ViewState::Ready, &entries, Some(&snapshot)), &Utc);

        assert_eq!(presentation.rows.len(), table::MAX_ROWS);
        assert_eq!(presentation.result_meta, "300 entries");
        assert_eq!(presentation.scorecards.count, "300");
    }

    #[test]
    fn test_default_presentation() {
        let presentation = Presentation::default();
        assert_eq!(presentation.state, ViewState::Idle);
        assert_eq!(presentation.banner, None);
        assert_eq!(presentation.last_updated, None);
        assert_eq!(presentation.scorecards, Scorecards::default());
    }
}

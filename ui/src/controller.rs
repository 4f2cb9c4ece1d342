//! Refresh Controller
//!
//! Coordinates manual, keyboard and timer triggers into refresh cycles:
//!
//! ```text
//! idle -> loading -> ready | empty | error -> loading -> ...
//! ```
//!
//! At most one cycle is in flight. A trigger that arrives while a cycle is
//! loading is dropped, not queued, so responses are always applied in the
//! order their requests were issued.
//!
//! There is no timeout: a request that never settles keeps the controller in
//! `loading` until the page is reloaded.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Local, TimeZone, Utc};
use heimdall_shared::{LogEntry, QuerySpec, ViewerConfig};

use crate::aggregate::AggregateSnapshot;
use crate::client::{FetchError, LogsClient};
use crate::query::{FilterForm, QueryBuilder, TimeRangeMode};
use crate::render::ViewModel;

/// What started a refresh
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// First load when the dashboard mounts
    Initial,
    /// Refresh button
    Manual,
    /// Enter pressed in a filter field
    FilterSubmit,
    /// Auto-refresh tick
    Timer,
}

/// Which view the dashboard shows
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ViewState {
    /// Nothing requested yet
    #[default]
    Idle,
    Loading,
    /// Last fetch succeeded with no entries
    Empty,
    /// Last fetch failed; carries the user-facing message
    Error(String),
    /// Last fetch returned entries
    Ready,
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewState::Idle => "idle",
            ViewState::Loading => "loading",
            ViewState::Empty => "empty",
            ViewState::Error(_) => "error",
            ViewState::Ready => "ready",
        }
    }
}

/// The refresh state machine
///
/// Holds the last successful fetch so the chart can be redrawn on resize
/// without another request.
#[derive(Debug)]
pub struct RefreshController<Tz: TimeZone = Local> {
    state: ViewState,
    query: QueryBuilder<Tz>,
    entries: Vec<LogEntry>,
    snapshot: Option<AggregateSnapshot>,
    last_completed: Option<DateTime<Utc>>,
    cycles: u64,
}

impl RefreshController<Local> {
    pub fn new(config: &ViewerConfig) -> Self {
        Self::with_query_builder(QueryBuilder::new(config))
    }
}

impl<Tz> RefreshController<Tz>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    pub fn with_query_builder(query: QueryBuilder<Tz>) -> Self {
        Self {
            state: ViewState::Idle,
            query,
            entries: Vec::new(),
            snapshot: None,
            last_completed: None,
            cycles: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Whether the manual refresh control is usable
    pub fn trigger_enabled(&self) -> bool {
        !self.state.is_loading()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn snapshot(&self) -> Option<&AggregateSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn last_completed(&self) -> Option<DateTime<Utc>> {
        self.last_completed
    }

    pub fn time_range_mode(&self) -> TimeRangeMode {
        self.query.mode()
    }

    /// The user typed into a time field
    pub fn mark_manual_range(&mut self) {
        self.query.mark_manual();
    }

    /// Seed the time fields before the first refresh
    pub fn prefill(&self, form: &mut FilterForm, now: DateTime<Utc>) {
        if self.query.mode() == TimeRangeMode::Auto {
            self.query.fill_auto_range(form, now);
        }
    }

    /// Start a cycle
    ///
    /// Returns `None` when a cycle is already in flight. Otherwise enters
    /// `loading` and returns the query to send; in auto mode the form's time
    /// fields are rewritten first.
    pub fn begin(
        &mut self,
        trigger: Trigger,
        form: &mut FilterForm,
        now: DateTime<Utc>,
    ) -> Option<QuerySpec> {
        if self.state.is_loading() {
            tracing::debug!(?trigger, "refresh already in flight, trigger dropped");
            return None;
        }

        self.cycles += 1;
        self.state = ViewState::Loading;
        let query = self.query.build(form, now);
        tracing::debug!(?trigger, cycle = self.cycles, "refresh started");
        Some(query)
    }

    /// Apply the outcome of the in-flight cycle
    pub fn finish(
        &mut self,
        result: Result<Vec<LogEntry>, FetchError>,
        now: DateTime<Utc>,
    ) -> &ViewState {
        if !self.state.is_loading() {
            tracing::warn!(state = self.state.label(), "refresh finished without one in flight");
        }

        self.state = match result {
            Ok(entries) => {
                let snapshot = AggregateSnapshot::from_entries(&entries);
                let state = if entries.is_empty() {
                    ViewState::Empty
                } else {
                    ViewState::Ready
                };
                tracing::info!(
                    cycle = self.cycles,
                    count = snapshot.count,
                    p95_ms = snapshot.p95_ms,
                    error_rate_pct = snapshot.error_rate_pct,
                    "refresh complete"
                );
                self.entries = entries;
                self.snapshot = Some(snapshot);
                state
            }
            Err(err) => {
                tracing::warn!(cycle = self.cycles, "refresh failed: {}", err);
                ViewState::Error(err.user_message())
            }
        };
        self.last_completed = Some(now);
        &self.state
    }

    /// Borrowed view of everything the renderer needs
    pub fn view_model(&self) -> ViewModel<'_> {
        ViewModel {
            state: &self.state,
            entries: &self.entries,
            snapshot: self.snapshot.as_ref(),
            last_updated: self.last_completed,
        }
    }
}

/// Drives [`RefreshController`] cycles against a [`LogsClient`]
///
/// Cloning is cheap; clones share the controller and the client.
pub struct Refresher<C: ?Sized, Tz: TimeZone = Local> {
    controller: Rc<RefCell<RefreshController<Tz>>>,
    client: Rc<C>,
}

impl<C: ?Sized, Tz: TimeZone> Clone for Refresher<C, Tz> {
    fn clone(&self) -> Self {
        Self {
            controller: Rc::clone(&self.controller),
            client: Rc::clone(&self.client),
        }
    }
}

impl<C, Tz> Refresher<C, Tz>
where
    C: LogsClient + ?Sized,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    pub fn new(controller: RefreshController<Tz>, client: Rc<C>) -> Self {
        Self {
            controller: Rc::new(RefCell::new(controller)),
            client,
        }
    }

    pub fn controller(&self) -> &Rc<RefCell<RefreshController<Tz>>> {
        &self.controller
    }

    /// Synchronous half of a cycle: guard check and query build
    ///
    /// The returned [`PendingRefresh`] must be awaited for the cycle to end.
    pub fn start(&self, trigger: Trigger, form: &mut FilterForm) -> Option<PendingRefresh<C, Tz>> {
        let query = self
            .controller
            .borrow_mut()
            .begin(trigger, form, Utc::now())?;

        Some(PendingRefresh {
            query,
            refresher: self.clone(),
        })
    }
}

/// A cycle that has entered `loading` and is waiting on the fetch
pub struct PendingRefresh<C: ?Sized, Tz: TimeZone = Local> {
    query: QuerySpec,
    refresher: Refresher<C, Tz>,
}

impl<C, Tz> PendingRefresh<C, Tz>
where
    C: LogsClient + ?Sized,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    /// Fetch and apply the result; returns the new view state
    pub async fn run(self) -> ViewState {
        // No controller borrow is held across the await.
        let result = self.refresher.client.fetch_logs(&self.query).await;
        let state = self
            .refresher
            .controller
            .borrow_mut()
            .finish(result, Utc::now())
            .clone();
        state
    }
}

/// Owner of the auto-refresh timer
///
/// Holds at most one timer handle. Replacing or clearing it drops the old
/// handle, which cancels it (as `gloo_timers::callback::Interval` does).
#[derive(Debug)]
pub struct AutoRefresh<H> {
    handle: Option<H>,
}

impl<H> Default for AutoRefresh<H> {
    fn default() -> Self {
        Self { handle: None }
    }
}

impl<H> AutoRefresh<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Start or stop the timer
    ///
    /// Enabling only schedules ticks; it never refreshes immediately.
    pub fn set_enabled(&mut self, enabled: bool, start: impl FnOnce() -> H) {
        self.stop();
        if enabled {
            self.handle = Some(start());
            tracing::debug!("auto-refresh timer started");
        }
    }

    pub fn stop(&mut self) {
        if self.handle.take().is_some() {
            tracing::debug!("auto-refresh timer stopped");
        }
    }
}

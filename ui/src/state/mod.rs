//! Dashboard State
//!
//! Reactive state shared by the dashboard components:
//! - Filter form fields
//! - The rendered [`Presentation`] and the snapshot the chart draws from
//! - The refresh controller and the auto-refresh timer

use std::rc::Rc;

use chrono::Utc;
use gloo_timers::callback::Interval;
use heimdall_shared::ViewerConfig;
use leptos::*;

use crate::aggregate::AggregateSnapshot;
use crate::client::LogsClient;
use crate::controller::{AutoRefresh, RefreshController, Refresher, Trigger};
use crate::query::FilterForm;
use crate::render::{render, Presentation};

/// One signal per filter field, holding the raw input text
#[derive(Clone, Copy)]
pub struct FilterSignals {
    pub from: RwSignal<String>,
    pub to: RwSignal<String>,
    pub method: RwSignal<String>,
    pub status: RwSignal<String>,
    pub namespace: RwSignal<String>,
    pub pod: RwSignal<String>,
    pub path: RwSignal<String>,
}

impl FilterSignals {
    fn new() -> Self {
        Self {
            from: create_rw_signal(String::new()),
            to: create_rw_signal(String::new()),
            method: create_rw_signal(String::new()),
            status: create_rw_signal(String::new()),
            namespace: create_rw_signal(String::new()),
            pod: create_rw_signal(String::new()),
            path: create_rw_signal(String::new()),
        }
    }

    /// Current field values, without subscribing
    pub fn form(&self) -> FilterForm {
        FilterForm {
            from: self.from.get_untracked(),
            to: self.to.get_untracked(),
            method: self.method.get_untracked(),
            status: self.status.get_untracked(),
            namespace: self.namespace.get_untracked(),
            pod: self.pod.get_untracked(),
            path: self.path.get_untracked(),
        }
    }

    /// Write back the time fields, which auto mode may have rewritten
    fn set_times(&self, form: &FilterForm) {
        if self.from.get_untracked() != form.from {
            self.from.set(form.from.clone());
        }
        if self.to.get_untracked() != form.to {
            self.to.set(form.to.clone());
        }
    }
}

/// Dashboard state, provided as context by `LogsDashboard`
#[derive(Clone, Copy)]
pub struct DashboardState {
    pub filters: FilterSignals,

    /// What the dashboard currently shows
    pub presentation: RwSignal<Presentation>,

    /// Last successful aggregation; only changes when a fetch succeeds
    pub snapshot: RwSignal<Option<AggregateSnapshot>>,

    /// Whether the auto-refresh checkbox is ticked
    pub auto_refresh: RwSignal<bool>,

    config: StoredValue<ViewerConfig>,
    refresher: StoredValue<Refresher<dyn LogsClient>>,
    timer: StoredValue<AutoRefresh<Interval>>,
}

impl DashboardState {
    pub fn new(config: ViewerConfig, client: Rc<dyn LogsClient>) -> Self {
        let refresher = Refresher::new(RefreshController::new(&config), client);
        Self {
            filters: FilterSignals::new(),
            presentation: create_rw_signal(Presentation::default()),
            snapshot: create_rw_signal(None),
            auto_refresh: create_rw_signal(config.auto_refresh_enabled),
            config: store_value(config),
            refresher: store_value(refresher),
            timer: store_value(AutoRefresh::new()),
        }
    }

    pub fn chart_height(&self) -> f64 {
        self.config.with_value(|config| config.chart_height)
    }

    /// Prefill the time range, start the timer and run the first refresh
    pub fn start(self) {
        let mut form = self.filters.form();
        self.refresher
            .with_value(|refresher| refresher.controller().borrow().prefill(&mut form, Utc::now()));
        self.filters.set_times(&form);

        self.set_auto_refresh(self.auto_refresh.get_untracked());
        self.refresh(Trigger::Initial);
    }

    /// Stop the timer; called when the dashboard unmounts
    pub fn stop(self) {
        let _ = self.timer.try_update_value(AutoRefresh::stop);
    }

    /// Run one refresh cycle unless one is already in flight
    pub fn refresh(self, trigger: Trigger) {
        let Some(refresher) = self.refresher.try_get_value() else {
            return;
        };

        let mut form = self.filters.form();
        let Some(pending) = refresher.start(trigger, &mut form) else {
            return;
        };
        self.filters.set_times(&form);
        self.publish(&refresher);

        spawn_local(async move {
            let state = pending.run().await;
            tracing::debug!(state = state.label(), "publishing refresh result");
            self.publish(&refresher);
        });
    }

    /// Start or stop periodic refreshes; never refreshes immediately
    pub fn set_auto_refresh(self, enabled: bool) {
        self.auto_refresh.set(enabled);
        let period = self.config.with_value(|config| config.auto_refresh_interval_ms);
        self.timer.update_value(|timer| {
            timer.set_enabled(enabled, || {
                Interval::new(period, move || self.refresh(Trigger::Timer))
            })
        });
    }

    /// The user edited a time field; stop overwriting it
    pub fn mark_manual_range(self) {
        self.refresher
            .with_value(|refresher| refresher.controller().borrow_mut().mark_manual_range());
    }

    fn publish(self, refresher: &Refresher<dyn LogsClient>) {
        let controller = refresher.controller().borrow();
        let presentation = render(&controller.view_model());
        let snapshot = controller.snapshot().cloned();
        drop(controller);

        self.presentation.set(presentation);
        if self.snapshot.with_untracked(|current| current != &snapshot) {
            self.snapshot.set(snapshot);
        }
    }
}

//! Dashboard shell: header controls and layout

use std::rc::Rc;

use heimdall_shared::ViewerConfig;
use leptos::*;

use crate::client::{HttpLogsClient, LogsClient};
use crate::components::common::{RefreshIcon, StateBanner};
use crate::controller::Trigger;
use crate::state::DashboardState;

use super::{FilterBar, RequestChart, RequestTable, ScorecardPanel};

/// The whole telemetry view
///
/// Runs the first refresh on mount and owns the auto-refresh timer, which is
/// stopped on unmount.
#[component]
pub fn LogsDashboard(config: ViewerConfig) -> impl IntoView {
    let client: Rc<dyn LogsClient> = Rc::new(HttpLogsClient::from_config(&config));
    let state = DashboardState::new(config, client);
    provide_context(state);

    state.start();
    on_cleanup(move || state.stop());

    let refresh_disabled = move || !state.presentation.with(|p| p.refresh_enabled);
    let last_updated = move || {
        state
            .presentation
            .with(|p| p.last_updated.clone())
            .map(|at| format!("Last updated {}", at))
            .unwrap_or_else(|| "Not updated yet".to_string())
    };

    view! {
        <div class="max-w-7xl mx-auto p-6 space-y-6">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-2xl font-bold text-white">"Request Telemetry"</h1>
                    <p class="text-slate-400 mt-1">{last_updated}</p>
                </div>
                <div class="flex items-center gap-4">
                    <label class="flex items-center gap-2 text-sm text-slate-300">
                        <input
                            type="checkbox"
                            prop:checked=move || state.auto_refresh.get()
                            on:change=move |e| state.set_auto_refresh(event_target_checked(&e))
                        />
                        "Auto refresh"
                    </label>
                    <button
                        class="flex items-center gap-2 px-4 py-2 rounded-lg bg-blue-600 hover:bg-blue-500 text-white text-sm disabled:opacity-50"
                        prop:disabled=refresh_disabled
                        on:click=move |_| state.refresh(Trigger::Manual)
                    >
                        <RefreshIcon class="w-4 h-4" />
                        "Refresh"
                    </button>
                </div>
            </div>

            <FilterBar />
            <ScorecardPanel />
            <RequestChart />
            <StateBanner />
            <RequestTable />
        </div>
    }
}

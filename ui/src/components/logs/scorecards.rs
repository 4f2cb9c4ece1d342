//! Scorecards: request count, p95 latency and error rate

use leptos::*;

use crate::components::common::{ActivityIcon, AlertIcon, ClockIcon};
use crate::state::DashboardState;

#[component]
pub fn ScorecardPanel() -> impl IntoView {
    let state = expect_context::<DashboardState>();
    let cards = move || state.presentation.with(|p| p.scorecards.clone());

    view! {
        <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
            <StatsCard
                title="Requests"
                value=Signal::derive(move || cards().count)
                icon_bg="bg-blue-500/20"
            >
                <ActivityIcon class="w-5 h-5 text-blue-400" />
            </StatsCard>
            <StatsCard
                title="p95 latency"
                value=Signal::derive(move || cards().p95)
                icon_bg="bg-amber-500/20"
            >
                <ClockIcon class="w-5 h-5 text-amber-400" />
            </StatsCard>
            <StatsCard
                title="Error rate"
                value=Signal::derive(move || cards().error_rate)
                icon_bg="bg-red-500/20"
            >
                <AlertIcon class="w-5 h-5 text-red-400" />
            </StatsCard>
        </div>
    }
}

#[component]
fn StatsCard(
    title: &'static str,
    value: Signal<String>,
    icon_bg: &'static str,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="bg-slate-800 rounded-xl border border-slate-700 p-5">
            <div class="flex items-start justify-between">
                <div>
                    <p class="text-sm text-slate-400 mb-1">{title}</p>
                    <span class="text-2xl font-bold text-white">{value}</span>
                </div>
                <div class=format!("w-10 h-10 rounded-lg {} flex items-center justify-center", icon_bg)>
                    {children()}
                </div>
            </div>
        </div>
    }
}

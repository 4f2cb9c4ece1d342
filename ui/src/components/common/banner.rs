//! State banner shown above the request table

use leptos::*;

use crate::render::BannerKind;
use crate::state::DashboardState;

use super::AlertIcon;

/// Loading / empty / error banner, hidden in the idle and ready states
#[component]
pub fn StateBanner() -> impl IntoView {
    let state = expect_context::<DashboardState>();
    let banner = move || state.presentation.with(|p| p.banner);
    let error_message = move || state.presentation.with(|p| p.error_message.clone());

    view! {
        {move || banner().map(|kind| view! {
            <div class=format!("{} flex items-center gap-2 rounded-lg px-4 py-3 text-sm", kind.class())>
                {(kind == BannerKind::Error).then(|| view! { <AlertIcon class="w-4 h-4 text-red-400" /> })}
                <span>{kind.message()}</span>
            </div>
        })}
        {move || error_message().map(|message| view! {
            <div class="error-panel mt-2 rounded-lg border border-red-500/40 bg-red-500/10 px-4 py-3 text-sm text-red-300">
                {message}
            </div>
        })}
    }
}

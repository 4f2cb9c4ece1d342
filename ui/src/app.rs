//! Root Application Component

use heimdall_shared::ViewerConfig;
use leptos::*;
use leptos_meta::*;

use crate::components::logs::LogsDashboard;

/// Root application component
///
/// An invalid `config` is reported and replaced by the defaults.
#[component]
pub fn App(#[prop(optional)] config: Option<ViewerConfig>) -> impl IntoView {
    provide_meta_context();

    let config = match config {
        Some(config) => match config.validate() {
            Ok(()) => config,
            Err(err) => {
                tracing::warn!("invalid viewer config, using defaults: {}", err);
                ViewerConfig::default()
            }
        },
        None => ViewerConfig::default(),
    };

    view! {
        <Title text="Heimdall" />
        <main class="min-h-screen bg-slate-900 text-slate-100">
            <LogsDashboard config=config />
        </main>
    }
}

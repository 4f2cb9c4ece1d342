//! Request table

use leptos::*;

use crate::render::TableRow;
use crate::state::DashboardState;

/// Table of the fetched entries; only shown in the ready state
///
/// Rows are rebuilt wholesale on every refresh.
#[component]
pub fn RequestTable() -> impl IntoView {
    let state = expect_context::<DashboardState>();
    let show = move || state.presentation.with(|p| p.show_table());
    let meta = move || state.presentation.with(|p| p.result_meta.clone());
    let rows = move || {
        state
            .presentation
            .with(|p| p.rows.clone())
            .into_iter()
            .map(|row| view! { <RequestRow row=row /> })
            .collect_view()
    };

    view! {
        <Show when=show>
            <div class="bg-slate-800 rounded-xl border border-slate-700 overflow-hidden">
                <div class="px-4 py-2 text-xs text-slate-400 border-b border-slate-700">{meta}</div>
                <table class="w-full text-sm">
                    <thead class="text-left text-slate-400">
                        <tr>
                            <th class="px-4 py-2">"Time"</th>
                            <th class="px-4 py-2">"Method"</th>
                            <th class="px-4 py-2">"Path"</th>
                            <th class="px-4 py-2">"Status"</th>
                            <th class="px-4 py-2">"Duration"</th>
                            <th class="px-4 py-2">"Namespace"</th>
                            <th class="px-4 py-2">"Pod"</th>
                            <th class="px-4 py-2">"Node"</th>
                        </tr>
                    </thead>
                    <tbody class="text-slate-200">{rows}</tbody>
                </table>
            </div>
        </Show>
    }
}

#[component]
fn RequestRow(row: TableRow) -> impl IntoView {
    view! {
        <tr class="border-t border-slate-700/60">
            <td class="px-4 py-1.5 font-mono">{row.time}</td>
            <td class="px-4 py-1.5">{row.method}</td>
            <td class="px-4 py-1.5 font-mono">{row.path}</td>
            <td class="px-4 py-1.5">
                <span class={row.badge.class()}>{row.status}</span>
            </td>
            <td class="px-4 py-1.5">{row.duration}</td>
            <td class="px-4 py-1.5">{row.namespace}</td>
            <td class="px-4 py-1.5">{row.pod}</td>
            <td class="px-4 py-1.5">{row.node}</td>
        </tr>
    }
}

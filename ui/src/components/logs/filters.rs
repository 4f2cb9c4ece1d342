//! Filter inputs
//!
//! Enter in a text filter submits; the time pickers keep Enter for
//! themselves. Editing either time field switches the range to manual, so
//! later refreshes keep it.

use leptos::*;

use crate::controller::Trigger;
use crate::state::DashboardState;

#[component]
pub fn FilterBar() -> impl IntoView {
    let state = expect_context::<DashboardState>();
    let filters = state.filters;

    let on_submit = move || state.refresh(Trigger::FilterSubmit);

    view! {
        <div class="grid grid-cols-2 lg:grid-cols-7 gap-3 bg-slate-800 rounded-xl border border-slate-700 p-4">
            <FilterField label="From" input_type="datetime-local" value=filters.from time_field=true on_submit=on_submit />
            <FilterField label="To" input_type="datetime-local" value=filters.to time_field=true on_submit=on_submit />
            <FilterField label="Method" placeholder="GET" value=filters.method on_submit=on_submit />
            <FilterField label="Status" placeholder="500" value=filters.status on_submit=on_submit />
            <FilterField label="Namespace" value=filters.namespace on_submit=on_submit />
            <FilterField label="Pod" value=filters.pod on_submit=on_submit />
            <FilterField label="Path" placeholder="/api" value=filters.path on_submit=on_submit />
        </div>
    }
}

#[component]
fn FilterField<S>(
    label: &'static str,
    value: RwSignal<String>,
    on_submit: S,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(default = "")] placeholder: &'static str,
    /// Time fields switch the range to manual and ignore Enter
    #[prop(default = false)]
    time_field: bool,
) -> impl IntoView
where
    S: Fn() + Copy + 'static,
{
    let state = expect_context::<DashboardState>();

    view! {
        <label class="flex flex-col gap-1 text-xs text-slate-400">
            {label}
            <input
                type=input_type
                step=(input_type == "datetime-local").then_some("1")
                placeholder=placeholder
                class="rounded-md bg-slate-900 border border-slate-700 px-2 py-1.5 text-sm text-slate-100"
                prop:value=move || value.get()
                on:input=move |e| {
                    value.set(event_target_value(&e));
                    if time_field {
                        state.mark_manual_range();
                    }
                }
                on:keydown=move |e: ev::KeyboardEvent| {
                    if submits_on(&e.key(), time_field) {
                        on_submit();
                    }
                }
            />
        </label>
    }
}

/// Whether `key` pressed in a filter field starts a refresh
fn submits_on(key: &str, time_field: bool) -> bool {
    key == "Enter" && !time_field
}

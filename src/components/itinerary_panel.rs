//! Itinerary Panel Component
//!
//! Places to visit, filtered by status or type, plus the organized route
//! (everything not skipped, in visiting order).

use chrono::{DateTime, NaiveDateTime, Utc};
use leptos::prelude::*;
use leptos::task::spawn_local;
use trip_api::resources::{organized_itinerary, ItineraryFilter, ItineraryItem, ItineraryStatus, NewItineraryItem};

use crate::components::{CategoryFilter, DeleteConfirmButton, NoticeBar, StatCard};
use crate::store::use_resource;

fn visit_label(visit_time: Option<DateTime<Utc>>) -> String {
    visit_time
        .map(|time| time.format("%b %-d, %H:%M").to_string())
        .unwrap_or_else(|| "Unscheduled".to_string())
}

#[component]
pub fn ItineraryPanel() -> impl IntoView {
    let state = use_resource::<ItineraryItem>();
    let summary = Memo::new(move |_| state.store.with(|store| store.summary().clone()));
    let route = Memo::new(move |_| state.store.with(|store| organized_itinerary(store.items())));

    let status_class = move |status: Option<ItineraryStatus>| {
        if state.filter.with(|filter| filter.status == status) {
            "filter-btn active"
        } else {
            "filter-btn"
        }
    };
    let set_status_filter = move |status: Option<ItineraryStatus>| {
        let type_id = state.filter.with_untracked(|filter| filter.type_id.clone());
        state.set_filter(ItineraryFilter { status, type_id });
    };

    view! {
        <section class="panel itinerary-panel">
            <h2>"Itinerary"</h2>
            <NoticeBar error=state.error />

            <div class="stats-row">
                <StatCard label="Places" value=Signal::derive(move || summary.get().total.to_string()) />
                {ItineraryStatus::ALL.into_iter().map(|status| view! {
                    <StatCard
                        label=status.label()
                        value=Signal::derive(move || summary.with(|summary| summary.count(&status)).to_string())
                    />
                }).collect_view()}
            </div>

            <div class="category-filter">
                <button class=move || status_class(None) on:click=move |_| set_status_filter(None)>"All"</button>
                {ItineraryStatus::ALL.into_iter().map(|status| view! {
                    <button
                        class=move || status_class(Some(status))
                        on:click=move |_| set_status_filter(Some(status))
                    >
                        {status.label()}
                    </button>
                }).collect_view()}
            </div>
            <CategoryFilter
                categories=state.categories
                selected=Signal::derive(move || state.filter.with(|filter| filter.type_id.clone()))
                on_change={move |type_id: Option<String>| {
                    let status = state.filter.with_untracked(|filter| filter.status);
                    state.set_filter(ItineraryFilter { status, type_id });
                }}
            />

            <NewItineraryForm />

            <Show when=move || !route.with(Vec::is_empty)>
                <div class="route">
                    <h3>"Route"</h3>
                    <ol>
                        {move || route.get().into_iter().map(|item| view! {
                            <li>
                                <span class="item-meta">{visit_label(item.visit_time)}</span>
                                <span class="item-name">{item.name.clone()}</span>
                            </li>
                        }).collect_view()}
                    </ol>
                </div>
            </Show>

            <Show when=move || state.loading.get()>
                <p class="loading">"Loading..."</p>
            </Show>

            <ul class="item-list">
                <For
                    each=move || state.store.with(|store| store.items().to_vec())
                    key=|item| (item.id.clone(), item.status)
                    children=move |item| view! { <ItineraryRow item=item /> }
                />
            </ul>
        </section>
    }
}

#[component]
fn ItineraryRow(item: ItineraryItem) -> impl IntoView {
    let state = use_resource::<ItineraryItem>();
    let id = StoredValue::new(item.id.clone());
    let kind = item.kind.as_ref().map(|kind| kind.name.clone()).unwrap_or_default();

    view! {
        <li class=format!("item-row {}", item.status.as_str().to_lowercase())>
            <span class="item-meta">{visit_label(item.visit_time)}</span>
            <span class="item-name">{item.name.clone()}</span>
            <span class="item-tag">{kind}</span>
            <span class="item-location">{item.location.clone()}</span>
            {ItineraryStatus::ALL
                .into_iter()
                .map(|status| {
                    let current = status == item.status;
                    view! {
                        <button
                            class=if current { "status-btn active" } else { "status-btn" }
                            disabled=current
                            on:click=move |_| state.set_status(id.get_value(), status)
                        >
                            {status.label()}
                        </button>
                    }
                })
                .collect_view()}
            <DeleteConfirmButton
                item_name=item.name.clone()
                button_class="delete-btn"
                on_confirm=move |_: ()| state.delete(id.get_value())
            />
        </li>
    }
}

#[component]
fn NewItineraryForm() -> impl IntoView {
    let state = use_resource::<ItineraryItem>();

    let (name, set_name) = signal(String::new());
    let (type_id, set_type_id) = signal(String::new());
    let (visit_time, set_visit_time) = signal(String::new());
    let (location, set_location) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = name.get();
        if text.trim().is_empty() {
            return;
        }
        let draft = NewItineraryItem {
            name: text.trim().to_string(),
            type_id: Some(type_id.get()).filter(|id| !id.is_empty()),
            status: ItineraryStatus::Planned,
            visit_time: NaiveDateTime::parse_from_str(&visit_time.get(), "%Y-%m-%dT%H:%M")
                .ok()
                .map(|time| time.and_utc()),
            location: location.get().trim().to_string(),
            notes: String::new(),
        };
        spawn_local(async move {
            match state.create(draft).await {
                Ok(()) => {
                    set_name.set(String::new());
                    set_visit_time.set(String::new());
                    set_location.set(String::new());
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e.user_message("Could not add the place."))),
            }
        });
    };

    view! {
        <form class="new-item-form" on:submit=on_submit>
            <input
                type="text"
                placeholder="Add place..."
                prop:value=move || name.get()
                on:input=move |ev| set_name.set(event_target_value(&ev))
            />
            <select on:change=move |ev| set_type_id.set(event_target_value(&ev))>
                <option value="">"Type"</option>
                {move || state.categories.get().into_iter().map(|kind| view! {
                    <option value=kind.id.clone()>{kind.name.clone()}</option>
                }).collect_view()}
            </select>
            <input
                type="datetime-local"
                prop:value=move || visit_time.get()
                on:input=move |ev| set_visit_time.set(event_target_value(&ev))
            />
            <input
                type="text"
                placeholder="Location"
                prop:value=move || location.get()
                on:input=move |ev| set_location.set(event_target_value(&ev))
            />
            <button type="submit">"Add"</button>
            {move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}
        </form>
    }
}

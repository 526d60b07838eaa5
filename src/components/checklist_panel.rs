//! Checklist Panel Component
//!
//! Trip checklist by phase, with an "upcoming" view of open items due
//! today or later.

use chrono::{NaiveDate, Utc};
use leptos::prelude::*;
use leptos::task::spawn_local;
use trip_api::resources::{
    upcoming_checklist, ChecklistCategory, ChecklistFilter, ChecklistItem, NewChecklistItem, Priority,
};

use crate::components::{percent, DeleteConfirmButton, MemberSelect, NoticeBar, StatCard};
use crate::store::use_resource;

const PRIORITIES: [(Priority, &str); 3] = [
    (Priority::Low, "Low"),
    (Priority::Medium, "Medium"),
    (Priority::High, "High"),
];

fn priority_label(priority: Priority) -> &'static str {
    PRIORITIES
        .iter()
        .find(|(p, _)| *p == priority)
        .map(|(_, label)| *label)
        .unwrap_or("Medium")
}

#[component]
pub fn ChecklistPanel() -> impl IntoView {
    let state = use_resource::<ChecklistItem>();
    let summary = Memo::new(move |_| state.store.with(|store| store.summary().clone()));
    let upcoming = Memo::new(move |_| {
        let today = Utc::now().date_naive();
        state.store.with(|store| upcoming_checklist(store.items(), today))
    });

    let set_category = move |category: Option<ChecklistCategory>| {
        let upcoming = state.filter.with_untracked(|filter| filter.upcoming);
        state.set_filter(ChecklistFilter { category, upcoming });
    };
    let category_class = move |category: Option<ChecklistCategory>| {
        if state.filter.with(|filter| filter.category == category) {
            "filter-btn active"
        } else {
            "filter-btn"
        }
    };

    view! {
        <section class="panel checklist-panel">
            <h2>"Checklist"</h2>
            <NoticeBar error=state.error />

            <div class="stats-row">
                <StatCard label="Tasks" value=Signal::derive(move || summary.get().total.to_string()) />
                <StatCard label="Completed" value=Signal::derive(move || summary.get().completed().to_string()) />
                <StatCard label="Pending" value=Signal::derive(move || summary.get().pending().to_string()) />
            </div>

            <ul class="group-progress">
                {ChecklistCategory::ALL.into_iter().map(|category| view! {
                    <li>
                        <span class="group-name">{category.label()}</span>
                        <span class="group-count">
                            {move || {
                                let (done, total) = summary.with(|summary| {
                                    summary.group(&category).map(|g| (g.completed(), g.total)).unwrap_or((0, 0))
                                });
                                format!("{}/{} ({}%)", done, total, percent(done, total))
                            }}
                        </span>
                    </li>
                }).collect_view()}
            </ul>

            <div class="category-filter">
                <button class=move || category_class(None) on:click=move |_| set_category(None)>"All"</button>
                {ChecklistCategory::ALL.into_iter().map(|category| view! {
                    <button
                        class=move || category_class(Some(category))
                        on:click=move |_| set_category(Some(category))
                    >
                        {category.label()}
                    </button>
                }).collect_view()}
                <label class="filter-toggle">
                    <input
                        type="checkbox"
                        prop:checked=move || state.filter.with(|filter| filter.upcoming)
                        on:change=move |_| {
                            let mut filter = state.filter.get_untracked();
                            filter.upcoming = !filter.upcoming;
                            state.set_filter(filter);
                        }
                    />
                    "Upcoming only"
                </label>
            </div>

            <NewChecklistForm />

            <Show when=move || !upcoming.with(Vec::is_empty)>
                <div class="upcoming">
                    <h3>"Coming up"</h3>
                    <ul>
                        {move || upcoming.get().into_iter().map(|item| view! {
                            <li>
                                <span class="item-name">{item.title.clone()}</span>
                                <span class="item-meta">{due_label(item.due_date)}</span>
                            </li>
                        }).collect_view()}
                    </ul>
                </div>
            </Show>

            <Show when=move || state.loading.get()>
                <p class="loading">"Loading..."</p>
            </Show>

            <ul class="item-list">
                <For
                    each=move || state.store.with(|store| store.items().to_vec())
                    key=|item| (item.id.clone(), item.is_completed)
                    children=move |item| {
                        let toggle_id = item.id.clone();
                        let delete_id = item.id.clone();
                        let assignee = item.assigned_to.as_ref().map(|member| member.display_name());
                        view! {
                            <li class=if item.is_completed { "item-row done" } else { "item-row" }>
                                <input
                                    type="checkbox"
                                    prop:checked=item.is_completed
                                    on:change=move |_| state.toggle(toggle_id.clone())
                                />
                                <span class="item-name">{item.title.clone()}</span>
                                <span class="item-tag">{item.category.label()}</span>
                                <span class="item-priority">{priority_label(item.priority)}</span>
                                <span class="item-meta">{due_label(item.due_date)}</span>
                                {assignee.map(|name| view! { <span class="item-meta">{name}</span> })}
                                <DeleteConfirmButton
                                    item_name=item.title.clone()
                                    button_class="delete-btn"
                                    on_confirm=move |_: ()| state.delete(delete_id.clone())
                                />
                            </li>
                        }
                    }
                />
            </ul>
        </section>
    }
}

fn due_label(due: Option<NaiveDate>) -> String {
    due.map(|date| format!("Due {}", date.format("%b %-d, %Y")))
        .unwrap_or_default()
}

#[component]
fn NewChecklistForm() -> impl IntoView {
    let state = use_resource::<ChecklistItem>();

    let (title, set_title) = signal(String::new());
    let (category, set_category) = signal(ChecklistCategory::PreTrip);
    let (priority, set_priority) = signal(Priority::Medium);
    let (due_date, set_due_date) = signal(String::new());
    let (assigned_to_id, set_assigned_to_id) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = title.get();
        if text.trim().is_empty() {
            return;
        }
        let draft = NewChecklistItem {
            title: text.trim().to_string(),
            description: String::new(),
            category: category.get(),
            priority: priority.get(),
            due_date: NaiveDate::parse_from_str(&due_date.get(), "%Y-%m-%d").ok(),
            assigned_to_id: Some(assigned_to_id.get()).filter(|id| !id.is_empty()),
        };
        spawn_local(async move {
            match state.create(draft).await {
                Ok(()) => {
                    set_title.set(String::new());
                    set_due_date.set(String::new());
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e.user_message("Could not add the task."))),
            }
        });
    };

    view! {
        <form class="new-item-form" on:submit=on_submit>
            <input
                type="text"
                placeholder="Add task..."
                prop:value=move || title.get()
                on:input=move |ev| set_title.set(event_target_value(&ev))
            />
            <select on:change=move |ev| {
                let value = event_target_value(&ev);
                if let Some(selected) = ChecklistCategory::ALL.into_iter().find(|c| c.as_str() == value) {
                    set_category.set(selected);
                }
            }>
                {ChecklistCategory::ALL.into_iter().map(|c| view! {
                    <option value=c.as_str() selected=move || category.get() == c>{c.label()}</option>
                }).collect_view()}
            </select>
            <select on:change=move |ev| {
                let value = event_target_value(&ev);
                if let Some((selected, _)) = PRIORITIES.iter().find(|(_, label)| *label == value) {
                    set_priority.set(*selected);
                }
            }>
                {PRIORITIES.iter().map(|(p, label)| {
                    let p = *p;
                    view! { <option value={*label} selected=move || priority.get() == p>{*label}</option> }
                }).collect_view()}
            </select>
            <input
                type="date"
                prop:value=move || due_date.get()
                on:input=move |ev| set_due_date.set(event_target_value(&ev))
            />
            <MemberSelect
                placeholder="Unassigned"
                selected=assigned_to_id
                on_change=move |id: String| set_assigned_to_id.set(id)
            />
            <button type="submit">"Add"</button>
            {move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}
        </form>
    }
}

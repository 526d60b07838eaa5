//! Packing Panel Component
//!
//! Packing list with packed counters, per-category progress and a quick-add
//! form.

use leptos::prelude::*;
use leptos::task::spawn_local;
use trip_api::resources::{NewPackingItem, PackingFilter, PackingItem};

use crate::components::{percent, CategoryFilter, DeleteConfirmButton, MemberSelect, NoticeBar, StatCard};
use crate::store::use_resource;

#[component]
pub fn PackingPanel() -> impl IntoView {
    let state = use_resource::<PackingItem>();
    let summary = Memo::new(move |_| state.store.with(|store| store.summary().clone()));

    let category_name = move |id: &str| {
        state.categories.with(|categories| {
            categories
                .iter()
                .find(|category| category.id == id)
                .map(|category| category.name.clone())
                .unwrap_or_else(|| id.to_string())
        })
    };

    view! {
        <section class="panel packing-panel">
            <h2>"Packing"</h2>
            <NoticeBar error=state.error />

            <div class="stats-row">
                <StatCard label="Items" value=Signal::derive(move || summary.get().total.to_string()) />
                <StatCard label="Packed" value=Signal::derive(move || summary.get().completed().to_string()) />
                <StatCard label="To pack" value=Signal::derive(move || summary.get().pending().to_string()) />
                <StatCard
                    label="Progress"
                    value=Signal::derive(move || {
                        let summary = summary.get();
                        format!("{}%", percent(summary.completed(), summary.total))
                    })
                />
            </div>

            <ul class="group-progress">
                {move || summary.get().groups().map(|(id, stats)| view! {
                    <li>
                        <span class="group-name">{category_name(id.as_str())}</span>
                        <span class="group-count">{format!("{}/{}", stats.completed(), stats.total)}</span>
                    </li>
                }).collect_view()}
            </ul>

            <CategoryFilter
                categories=state.categories
                selected=Signal::derive(move || state.filter.with(|filter| filter.category_id.clone()))
                on_change={move |category_id: Option<String>| state.set_filter(PackingFilter { category_id })}
            />

            <NewPackingForm />

            <Show when=move || state.loading.get()>
                <p class="loading">"Loading..."</p>
            </Show>

            <ul class="item-list">
                <For
                    each=move || state.store.with(|store| store.items().to_vec())
                    key=|item| (item.id.clone(), item.packed, item.quantity)
                    children=move |item| {
                        let toggle_id = item.id.clone();
                        let delete_id = item.id.clone();
                        let category = item.category.as_ref().map(|c| c.name.clone()).unwrap_or_default();
                        let owner = item
                            .assigned_to
                            .as_ref()
                            .map(|member| member.display_name())
                            .unwrap_or_else(|| "Shared".to_string());
                        view! {
                            <li class=if item.packed { "item-row done" } else { "item-row" }>
                                <input
                                    type="checkbox"
                                    prop:checked=item.packed
                                    on:change=move |_| state.toggle(toggle_id.clone())
                                />
                                <span class="item-name">{item.name.clone()}</span>
                                <span class="item-meta">{format!("×{}", item.quantity)}</span>
                                <span class="item-tag">{category}</span>
                                <span class="item-meta">{owner}</span>
                                <DeleteConfirmButton
                                    item_name=item.name.clone()
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

#[component]
fn NewPackingForm() -> impl IntoView {
    let state = use_resource::<PackingItem>();

    let (name, set_name) = signal(String::new());
    let (category_id, set_category_id) = signal(String::new());
    let (quantity, set_quantity) = signal(1u32);
    let (assigned_to_id, set_assigned_to_id) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = name.get();
        if text.trim().is_empty() {
            return;
        }
        let draft = NewPackingItem {
            name: text.trim().to_string(),
            category_id: Some(category_id.get()).filter(|id| !id.is_empty()),
            quantity: quantity.get().max(1),
            assigned_to_id: Some(assigned_to_id.get()).filter(|id| !id.is_empty()),
        };
        spawn_local(async move {
            match state.create(draft).await {
                Ok(()) => {
                    set_name.set(String::new());
                    set_quantity.set(1);
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e.user_message("Could not add the item."))),
            }
        });
    };

    view! {
        <form class="new-item-form" on:submit=on_submit>
            <input
                type="text"
                placeholder="Add item..."
                prop:value=move || name.get()
                on:input=move |ev| set_name.set(event_target_value(&ev))
            />
            <select on:change=move |ev| set_category_id.set(event_target_value(&ev))>
                <option value="">"No category"</option>
                {move || state.categories.get().into_iter().map(|category| view! {
                    <option value=category.id.clone()>{category.name.clone()}</option>
                }).collect_view()}
            </select>
            <input
                type="number"
                min="1"
                class="quantity-input"
                prop:value=move || quantity.get().to_string()
                on:input=move |ev| set_quantity.set(event_target_value(&ev).parse().unwrap_or(1))
            />
            <MemberSelect
                placeholder="Shared"
                selected=assigned_to_id
                on_change=move |id: String| set_assigned_to_id.set(id)
            />
            <button type="submit">"Add"</button>
            {move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}
        </form>
    }
}

//! Expenses Panel Component
//!
//! Spending against the trip budget, broken down by category.

use chrono::{NaiveDate, Utc};
use leptos::prelude::*;
use leptos::task::spawn_local;
use trip_api::resources::{format_cents, parse_cents, Expense, NewExpense};

use crate::components::{DeleteConfirmButton, MemberSelect, NoticeBar, StatCard};
use crate::store::use_resource;

#[component]
pub fn ExpensesPanel() -> impl IntoView {
    let state = use_resource::<Expense>();
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
        <section class="panel expenses-panel">
            <h2>"Expenses"</h2>
            <NoticeBar error=state.error />

            <div class="stats-row">
                <StatCard
                    label="Budget"
                    value=Signal::derive(move || {
                        state.statistics.with(|stats| stats.as_ref().map(|s| format_cents(s.budget)).unwrap_or_default())
                    })
                />
                <StatCard label="Spent" value=Signal::derive(move || format_cents(summary.get().amount)) />
                <StatCard
                    label="Remaining"
                    value=Signal::derive(move || state.budget_remaining().map(format_cents).unwrap_or_default())
                />
                <StatCard label="Expenses" value=Signal::derive(move || summary.get().total.to_string()) />
            </div>

            <ul class="group-progress">
                {move || summary.get().groups().map(|(id, stats)| view! {
                    <li>
                        <span class="group-name">{category_name(id.as_str())}</span>
                        <span class="group-count">{format!("{} ({})", format_cents(stats.amount), stats.total)}</span>
                    </li>
                }).collect_view()}
            </ul>

            <NewExpenseForm />

            <Show when=move || state.loading.get()>
                <p class="loading">"Loading..."</p>
            </Show>

            <ul class="item-list">
                <For
                    each=move || state.store.with(|store| store.items().to_vec())
                    key=|expense| expense.id.clone()
                    children=move |expense| {
                        let delete_id = expense.id.clone();
                        let payer = expense.paid_by.as_ref().map(|member| member.display_name());
                        view! {
                            <li class="item-row">
                                <span class="item-meta">{expense.date.format("%b %-d").to_string()}</span>
                                <span class="item-name">{expense.title.clone()}</span>
                                <span class="item-tag">{expense.category.name.clone()}</span>
                                <span class="item-amount">{format_cents(expense.amount)}</span>
                                {payer.map(|name| view! { <span class="item-meta">{format!("paid by {}", name)}</span> })}
                                <DeleteConfirmButton
                                    item_name=expense.title.clone()
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
fn NewExpenseForm() -> impl IntoView {
    let state = use_resource::<Expense>();

    let (title, set_title) = signal(String::new());
    let (amount, set_amount) = signal(String::new());
    let (date, set_date) = signal(Utc::now().date_naive().format("%Y-%m-%d").to_string());
    let (category_id, set_category_id) = signal(String::new());
    let (paid_by_id, set_paid_by_id) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = title.get();
        let Some(value) = parse_cents(&amount.get()).filter(|cents| *cents > 0) else {
            set_error.set(Some("Please enter a valid amount.".to_string()));
            return;
        };
        let Ok(day) = NaiveDate::parse_from_str(&date.get(), "%Y-%m-%d") else {
            set_error.set(Some("Please pick a date.".to_string()));
            return;
        };
        let category = category_id.get();
        let payer = paid_by_id.get();
        if text.trim().is_empty() || category.is_empty() || payer.is_empty() {
            set_error.set(Some("Title, category and payer are required.".to_string()));
            return;
        }
        let draft = NewExpense {
            title: text.trim().to_string(),
            amount: value,
            date: day,
            category_id: category,
            paid_by_id: payer,
            notes: String::new(),
        };
        spawn_local(async move {
            match state.create(draft).await {
                Ok(()) => {
                    set_title.set(String::new());
                    set_amount.set(String::new());
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(e.user_message("Could not add the expense."))),
            }
        });
    };

    view! {
        <form class="new-item-form" on:submit=on_submit>
            <input
                type="text"
                placeholder="What was it?"
                prop:value=move || title.get()
                on:input=move |ev| set_title.set(event_target_value(&ev))
            />
            <input
                type="number"
                step="0.01"
                min="0"
                placeholder="Amount"
                prop:value=move || amount.get()
                on:input=move |ev| set_amount.set(event_target_value(&ev))
            />
            <input
                type="date"
                prop:value=move || date.get()
                on:input=move |ev| set_date.set(event_target_value(&ev))
            />
            <select on:change=move |ev| set_category_id.set(event_target_value(&ev))>
                <option value="">"Category"</option>
                {move || state.categories.get().into_iter().map(|category| view! {
                    <option value=category.id.clone()>{category.name.clone()}</option>
                }).collect_view()}
            </select>
            <MemberSelect
                placeholder="Paid by"
                selected=paid_by_id
                on_change=move |id: String| set_paid_by_id.set(id)
            />
            <button type="submit">"Add"</button>
            {move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}
        </form>
    }
}

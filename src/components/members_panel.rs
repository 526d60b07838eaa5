//! Members Panel Component
//!
//! Trip members with invitation status counters, role changes and invites.

use leptos::prelude::*;
use leptos::task::spawn_local;
use trip_api::resources::{Member, MemberFilter, MemberPatch, MemberRole, MemberStatus, NewMember};

use crate::components::{DeleteConfirmButton, NoticeBar, StatCard};
use crate::store::use_resource;

#[component]
pub fn MembersPanel() -> impl IntoView {
    let state = use_resource::<Member>();
    let summary = Memo::new(move |_| state.store.with(|store| store.summary().clone()));
    let accepted = Memo::new(move |_| {
        state.store.with(|store| {
            store
                .items()
                .iter()
                .filter(|member| member.is_accepted())
                .map(|member| member.display_name().to_string())
                .collect::<Vec<_>>()
        })
    });

    let status_class = move |status: Option<MemberStatus>| {
        if state.filter.with(|filter| filter.status == status) {
            "filter-btn active"
        } else {
            "filter-btn"
        }
    };

    view! {
        <section class="panel members-panel">
            <h2>"Members"</h2>
            <NoticeBar error=state.error />

            <div class="stats-row">
                <StatCard label="Members" value=Signal::derive(move || summary.get().total.to_string()) />
                {MemberStatus::ALL.into_iter().map(|status| view! {
                    <StatCard
                        label=status.label()
                        value=Signal::derive(move || summary.with(|summary| summary.count(&status)).to_string())
                    />
                }).collect_view()}
            </div>

            <Show when=move || !accepted.with(Vec::is_empty)>
                <p class="accepted-members">
                    "Going: " {move || accepted.get().join(", ")}
                </p>
            </Show>

            <div class="category-filter">
                <button
                    class=move || status_class(None)
                    on:click=move |_| state.set_filter(MemberFilter::default())
                >
                    "All"
                </button>
                {MemberStatus::ALL.into_iter().map(|status| view! {
                    <button
                        class=move || status_class(Some(status))
                        on:click=move |_| state.set_filter(MemberFilter { status: Some(status) })
                    >
                        {status.label()}
                    </button>
                }).collect_view()}
            </div>

            <InviteForm />

            <Show when=move || state.loading.get()>
                <p class="loading">"Loading..."</p>
            </Show>

            <ul class="item-list">
                <For
                    each=move || state.store.with(|store| store.items().to_vec())
                    key=|member| (member.id.clone(), member.status, member.role)
                    children=move |member| view! { <MemberRow member=member /> }
                />
            </ul>
        </section>
    }
}

#[component]
fn MemberRow(member: Member) -> impl IntoView {
    let state = use_resource::<Member>();
    let id = StoredValue::new(member.id.clone());
    let current_role = member.role;

    let on_role = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        let Some(role) = MemberRole::ALL.into_iter().find(|role| role.label() == value) else {
            return;
        };
        if role != current_role {
            let patch = MemberPatch {
                role: Some(role),
                status: None,
            };
            state.update_member(id.get_value(), patch);
        }
    };

    view! {
        <li class="item-row">
            <span class="item-name">{member.display_name().to_string()}</span>
            <span class=format!("status-badge {}", member.status.as_str().to_lowercase())>
                {member.status.label()}
            </span>
            <select on:change=on_role>
                {MemberRole::ALL.into_iter().map(|role| view! {
                    <option value=role.label() selected={role == current_role}>{role.label()}</option>
                }).collect_view()}
            </select>
            {MemberStatus::ALL
                .into_iter()
                .filter(|status| *status != member.status)
                .map(|status| view! {
                    <button
                        class="status-btn"
                        on:click=move |_| state.set_status(id.get_value(), status)
                    >
                        {format!("Mark {}", status.label().to_lowercase())}
                    </button>
                })
                .collect_view()}
            <DeleteConfirmButton
                item_name=member.display_name().to_string()
                button_class="delete-btn"
                on_confirm=move |_: ()| state.delete(id.get_value())
            />
        </li>
    }
}

#[component]
fn InviteForm() -> impl IntoView {
    let state = use_resource::<Member>();

    let (email, set_email) = signal(String::new());
    let (role, set_role) = signal(MemberRole::Member);
    let (error, set_error) = signal::<Option<String>>(None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let address = email.get();
        if address.trim().is_empty() {
            return;
        }
        let draft = NewMember {
            email: address.trim().to_string(),
            role: role.get(),
            name: None,
        };
        spawn_local(async move {
            match state.create(draft).await {
                Ok(()) => {
                    set_email.set(String::new());
                    set_error.set(None);
                }
                Err(e) => {
                    let message = e
                        .field_errors()
                        .and_then(|fields| fields.field("email").and_then(|m| m.first().cloned()))
                        .unwrap_or_else(|| e.user_message("Could not send the invitation."));
                    set_error.set(Some(message));
                }
            }
        });
    };

    view! {
        <form class="new-item-form" on:submit=on_submit>
            <input
                type="email"
                placeholder="Invite by email..."
                prop:value=move || email.get()
                on:input=move |ev| set_email.set(event_target_value(&ev))
            />
            <select on:change=move |ev| {
                let value = event_target_value(&ev);
                if let Some(selected) = MemberRole::ALL.into_iter().find(|r| r.label() == value) {
                    set_role.set(selected);
                }
            }>
                {MemberRole::ALL.into_iter().map(|r| view! {
                    <option value=r.label() selected=move || role.get() == r>{r.label()}</option>
                }).collect_view()}
            </select>
            <button type="submit">"Invite"</button>
            {move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}
        </form>
    }
}

//! Member Select Component
//!
//! Dropdown of the trip's accepted members, for assignees and payers.

use leptos::prelude::*;
use trip_api::resources::Member;

use crate::store::use_resource;

/// `on_change` receives the member id, or an empty string for the blank entry
#[component]
pub fn MemberSelect(
    /// Label of the blank entry
    #[prop(into)]
    placeholder: String,
    #[prop(into)] selected: Signal<String>,
    #[prop(into)] on_change: Callback<String>,
) -> impl IntoView {
    let members = use_resource::<Member>();
    let accepted = move || {
        members.store.with(|store| {
            store
                .items()
                .iter()
                .filter(|member| member.is_accepted())
                .map(|member| (member.id.clone(), member.display_name().to_string()))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <select
            class="member-select"
            prop:value=move || selected.get()
            on:change=move |ev| on_change.run(event_target_value(&ev))
        >
            <option value="">{placeholder}</option>
            {move || accepted().into_iter().map(|(id, name)| view! {
                <option value=id>{name}</option>
            }).collect_view()}
        </select>
    }
}

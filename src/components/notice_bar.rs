//! Notice Bar Component
//!
//! Shows the last failure of a container until dismissed.

use leptos::prelude::*;

#[component]
pub fn NoticeBar(error: RwSignal<Option<String>>) -> impl IntoView {
    view! {
        {move || error.get().map(|message| view! {
            <div class="notice-bar" role="alert">
                <span class="notice-text">{message}</span>
                <button class="notice-dismiss" on:click=move |_| error.set(None)>"×"</button>
            </div>
        })}
    }
}

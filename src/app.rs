//! Trip Planner App
//!
//! Session check, then the trip list or the tabbed view of the open trip.

use leptos::prelude::*;
use leptos::task::spawn_local;
use trip_api::ApiClient;

use crate::components::{
    ChecklistPanel, ExpensesPanel, ItineraryPanel, LoginForm, MembersPanel, PackingPanel, Tab, TripList,
    TripOverview, TripTabBar,
};
use crate::config::trip_from_location;
use crate::context::AppContext;
use crate::store::provide_resources;
use crate::trips::provide_trips;

#[component]
pub fn App(api: ApiClient) -> impl IntoView {
    let ctx = AppContext::new(api, trip_from_location());
    provide_context(ctx);
    provide_resources(ctx);
    provide_trips(ctx);

    let (current_tab, set_current_tab) = signal(Tab::Members);

    // Resume an existing session on mount
    Effect::new(move |_| {
        spawn_local(async move {
            match ctx.api().me().await {
                Ok(user) => {
                    tracing::info!(user = %user.email, "session resumed");
                    ctx.user.set(Some(user));
                }
                Err(e) => tracing::debug!(error = %e, "no active session"),
            }
            ctx.session_checked.set(true);
        });
    });

    let logout = move |_| {
        spawn_local(async move {
            if let Err(e) = ctx.api().logout().await {
                tracing::warn!(error = %e, "logout failed");
            }
            ctx.user.set(None);
        });
    };

    view! {
        <div class="app-layout">
            <header class="app-header">
                <h1>"Trip Planner"</h1>
                {move || ctx.user.get().map(|user| view! {
                    <span class="user-name">{user.display_name()}</span>
                    <button class="logout-btn" on:click=logout>"Sign out"</button>
                })}
            </header>

            <main class="main-content">
                {move || match (ctx.session_checked.get(), ctx.user.with(Option::is_some)) {
                    (false, _) => view! { <p class="loading">"Loading..."</p> }.into_any(),
                    (true, false) => view! { <LoginForm /> }.into_any(),
                    (true, true) => view! {
                        <Show
                            when=move || ctx.trip_id.with(Option::is_some)
                            fallback=|| view! { <TripList /> }
                        >
                            <TripOverview />
                            <TripTabBar current_tab=current_tab set_current_tab=set_current_tab />
                            {move || match current_tab.get() {
                                Tab::Members => view! { <MembersPanel /> }.into_any(),
                                Tab::Expenses => view! { <ExpensesPanel /> }.into_any(),
                                Tab::Packing => view! { <PackingPanel /> }.into_any(),
                                Tab::Checklist => view! { <ChecklistPanel /> }.into_any(),
                                Tab::Itinerary => view! { <ItineraryPanel /> }.into_any(),
                            }}
                        </Show>
                    }.into_any(),
                }}
            </main>
        </div>
    }
}

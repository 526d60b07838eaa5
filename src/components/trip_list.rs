//! Trip List Component
//!
//! The user's own trips, trips they joined, and public trips they can ask
//! to join.

use leptos::prelude::*;
use trip_api::Trip;

use crate::components::{NoticeBar, TripForm};
use crate::trips::use_trips;

#[component]
pub fn TripList() -> impl IntoView {
    let trips = use_trips();
    let (creating, set_creating) = signal(false);

    // Public trips the user is not already part of
    let joinable = Memo::new(move |_| {
        let known: Vec<String> = trips.mine.with(|mine| {
            trips
                .joined
                .with(|joined| mine.iter().chain(joined).map(|trip| trip.id.clone()).collect())
        });
        trips.public.with(|public| {
            public
                .iter()
                .filter(|trip| !known.contains(&trip.id))
                .cloned()
                .collect::<Vec<_>>()
        })
    });

    view! {
        <section class="panel trip-list">
            <NoticeBar error=trips.error />
            <NoticeBar error=trips.notice />

            <div class="panel-header">
                <h2>"My trips"</h2>
                <button class="new-trip-btn" on:click=move |_| set_creating.set(true)>"+ New trip"</button>
            </div>

            <Show when=move || creating.get()>
                <TripForm on_done=move |_: ()| set_creating.set(false) />
            </Show>

            <Show when=move || trips.loading.get()>
                <p class="loading">"Loading..."</p>
            </Show>

            <TripCards trips=trips.mine empty="You have not planned any trips yet." />

            <h2>"Joined"</h2>
            <TripCards trips=trips.joined empty="No joined trips." />

            <h2>"Public trips"</h2>
            <ul class="trip-cards">
                <For
                    each=move || joinable.get()
                    key=|trip| trip.id.clone()
                    children=move |trip| {
                        let join_id = trip.id.clone();
                        view! {
                            <li class="trip-card">
                                <TripSummaryLine trip=trip />
                                <button class="join-btn" on:click=move |_| trips.join(join_id.clone())>
                                    "Ask to join"
                                </button>
                            </li>
                        }
                    }
                />
            </ul>
        </section>
    }
}

#[component]
fn TripCards(trips: RwSignal<Vec<Trip>>, empty: &'static str) -> impl IntoView {
    let state = use_trips();

    view! {
        <Show
            when=move || !trips.with(Vec::is_empty)
            fallback=move || view! { <p class="empty">{empty}</p> }
        >
            <ul class="trip-cards">
                <For
                    each=move || trips.get()
                    key=|trip| trip.id.clone()
                    children=move |trip| {
                        let open_id = trip.id.clone();
                        view! {
                            <li class="trip-card" on:click=move |_| state.open(open_id.clone())>
                                <TripSummaryLine trip=trip />
                            </li>
                        }
                    }
                />
            </ul>
        </Show>
    }
}

#[component]
fn TripSummaryLine(trip: Trip) -> impl IntoView {
    view! {
        <div class="trip-summary">
            <span class="trip-title">{trip.title.clone()}</span>
            <span class="trip-location">{trip.location.clone()}</span>
            <span class="trip-dates">
                {format!("{} ({} days)", trip.dates_label(), trip.duration_days())}
            </span>
            {trip.is_public.then(|| view! { <span class="item-tag">"Public"</span> })}
        </div>
    }
}

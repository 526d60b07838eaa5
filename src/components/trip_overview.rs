//! Trip Overview Component
//!
//! Header of the open trip and its itinerary day by day.

use leptos::prelude::*;

use crate::components::TripForm;
use crate::trips::use_trips;

#[component]
pub fn TripOverview() -> impl IntoView {
    let trips = use_trips();
    let (editing, set_editing) = signal(false);

    view! {
        <section class="trip-overview">
            <button class="back-btn" on:click=move |_| trips.close()>"← All trips"</button>
            {move || trips.current.get().map(|trip| {
                let edit_trip = trip.clone();
                view! {
                    <div class="trip-header">
                        <h2>{trip.title.clone()}</h2>
                        <span class="trip-location">{trip.location.clone()}</span>
                        <span class="trip-dates">{trip.dates_label()}</span>
                        <button class="edit-btn" on:click=move |_| set_editing.set(true)>"Edit"</button>
                    </div>
                    <Show when=move || editing.get()>
                        <TripForm trip=edit_trip.clone() on_done=move |_: ()| set_editing.set(false) />
                    </Show>
                    {(!trip.description.is_empty()).then(|| view! {
                        <p class="trip-description">{trip.description.clone()}</p>
                    })}
                }
            })}

            <Show when=move || !trips.days.with(Vec::is_empty)>
                <ol class="day-summary">
                    {move || trips.days.get().into_iter().map(|day| {
                        let done = day.is_complete();
                        view! {
                            <li class={if done { "day complete" } else { "day" }}>
                                <span class="day-date">{day.date.clone()}</span>
                                <span class="day-progress">{format!("{}/{}", day.completed(), day.total())}</span>
                                <span class="day-locations">{day.locations.join(", ")}</span>
                                <span class="day-stops">{day.itineraries.join(" · ")}</span>
                            </li>
                        }
                    }).collect_view()}
                </ol>
            </Show>
        </section>
    }
}

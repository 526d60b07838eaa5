//! Trip Form Component
//!
//! Create a trip, or edit the open one. Field messages from the backend are
//! shown under their inputs.

use chrono::{Days, NaiveDate, Utc};
use leptos::prelude::*;
use leptos::task::spawn_local;
use trip_api::{FieldErrors, Trip, TripDraft};

use crate::trips::use_trips;

#[component]
pub fn TripForm(
    /// Trip being edited; a new trip when absent
    #[prop(optional)]
    trip: Option<Trip>,
    #[prop(into)] on_done: Callback<()>,
) -> impl IntoView {
    let trips = use_trips();
    let trip_id = trip.as_ref().map(|trip| trip.id.clone());
    let editing = trip_id.is_some();
    let draft = trip.map(|trip| trip.to_draft()).unwrap_or_else(|| {
        let today = Utc::now().date_naive();
        TripDraft {
            title: String::new(),
            description: String::new(),
            location: String::new(),
            start_date: today,
            end_date: today.checked_add_days(Days::new(1)).unwrap_or(today),
            is_public: false,
            notes: String::new(),
        }
    });

    let (title, set_title) = signal(draft.title);
    let (location, set_location) = signal(draft.location);
    let (description, set_description) = signal(draft.description);
    let (start_date, set_start_date) = signal(draft.start_date.format("%Y-%m-%d").to_string());
    let (end_date, set_end_date) = signal(draft.end_date.format("%Y-%m-%d").to_string());
    let (is_public, set_is_public) = signal(draft.is_public);
    let notes = draft.notes;
    let (errors, set_errors) = signal(FieldErrors::default());
    let (submitting, set_submitting) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let (Ok(start), Ok(end)) = (
            NaiveDate::parse_from_str(&start_date.get(), "%Y-%m-%d"),
            NaiveDate::parse_from_str(&end_date.get(), "%Y-%m-%d"),
        ) else {
            let mut missing = FieldErrors::default();
            missing.general.push("Please pick both dates.".to_string());
            set_errors.set(missing);
            return;
        };
        let draft = TripDraft {
            title: title.get().trim().to_string(),
            description: description.get(),
            location: location.get().trim().to_string(),
            start_date: start,
            end_date: end,
            is_public: is_public.get(),
            notes: notes.clone(),
        };
        let trip_id = trip_id.clone();

        set_submitting.set(true);
        spawn_local(async move {
            let result = match trip_id {
                Some(id) => trips.update(id, draft).await,
                None => trips.create(draft).await,
            };
            match result {
                Ok(()) => {
                    set_errors.set(FieldErrors::default());
                    on_done.run(());
                }
                Err(e) => {
                    let errors = e.field_errors().cloned().unwrap_or_else(|| {
                        let mut errors = FieldErrors::default();
                        errors.general.push(e.user_message("Could not save the trip."));
                        errors
                    });
                    set_errors.set(errors);
                }
            }
            set_submitting.set(false);
        });
    };

    let field_error = move |name: &'static str| {
        move || {
            errors.with(|errors| {
                errors
                    .field(name)
                    .and_then(|messages| messages.first().cloned())
                    .map(|message| view! { <p class="form-error">{message}</p> })
            })
        }
    };

    view! {
        <form class="trip-form" on:submit=on_submit>
            <h2>{if editing { "Edit trip" } else { "New trip" }}</h2>
            {move || errors.with(|errors| errors.general.first().cloned())
                .map(|message| view! { <p class="form-error">{message}</p> })}

            <label>"Title"</label>
            <input
                type="text"
                prop:value=move || title.get()
                on:input=move |ev| set_title.set(event_target_value(&ev))
            />
            {field_error("title")}

            <label>"Location"</label>
            <input
                type="text"
                prop:value=move || location.get()
                on:input=move |ev| set_location.set(event_target_value(&ev))
            />
            {field_error("location")}

            <label>"Start date"</label>
            <input
                type="date"
                prop:value=move || start_date.get()
                on:input=move |ev| set_start_date.set(event_target_value(&ev))
            />
            {field_error("start_date")}

            <label>"End date"</label>
            <input
                type="date"
                prop:value=move || end_date.get()
                on:input=move |ev| set_end_date.set(event_target_value(&ev))
            />
            {field_error("end_date")}

            <label>"Description"</label>
            <textarea
                prop:value=move || description.get()
                on:input=move |ev| set_description.set(event_target_value(&ev))
            ></textarea>

            <label class="checkbox-label">
                <input
                    type="checkbox"
                    prop:checked=move || is_public.get()
                    on:change=move |ev| set_is_public.set(event_target_checked(&ev))
                />
                "Public (anyone can ask to join)"
            </label>

            <div class="form-actions">
                <button type="submit" disabled=move || submitting.get()>
                    {if editing { "Save" } else { "Create trip" }}
                </button>
                <button type="button" class="cancel-btn" on:click=move |_| on_done.run(())>
                    "Cancel"
                </button>
            </div>
        </form>
    }
}

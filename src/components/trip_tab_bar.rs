//! Trip Tab Bar Component
//!
//! Tabs for switching between the resources of the open trip.

use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Members,
    Expenses,
    Packing,
    Checklist,
    Itinerary,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Members, Tab::Expenses, Tab::Packing, Tab::Checklist, Tab::Itinerary];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Members => "Members",
            Tab::Expenses => "Expenses",
            Tab::Packing => "Packing",
            Tab::Checklist => "Checklist",
            Tab::Itinerary => "Itinerary",
        }
    }
}

#[component]
pub fn TripTabBar(current_tab: ReadSignal<Tab>, set_current_tab: WriteSignal<Tab>) -> impl IntoView {
    view! {
        <nav class="trip-tab-bar">
            {Tab::ALL.into_iter().map(|tab| view! {
                <button
                    class=move || if current_tab.get() == tab { "trip-tab active" } else { "trip-tab" }
                    on:click=move |_| set_current_tab.set(tab)
                >
                    {tab.label()}
                </button>
            }).collect_view()}
        </nav>
    }
}

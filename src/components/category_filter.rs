//! Category Filter Component
//!
//! Filter buttons for a reference list, with an "All" entry first.

use leptos::prelude::*;
use trip_api::resources::Category;

#[component]
pub fn CategoryFilter(
    categories: RwSignal<Vec<Category>>,
    #[prop(into)] selected: Signal<Option<String>>,
    #[prop(into)] on_change: Callback<Option<String>>,
) -> impl IntoView {
    let button_class = move |id: Option<String>| {
        if selected.get() == id {
            "filter-btn active"
        } else {
            "filter-btn"
        }
    };

    view! {
        <div class="category-filter">
            <button class=move || button_class(None) on:click=move |_| on_change.run(None)>
                "All"
            </button>
            <For
                each=move || categories.get()
                key=|category| category.id.clone()
                children=move |category| {
                    let id = category.id.clone();
                    let click_id = id.clone();
                    view! {
                        <button
                            class=move || button_class(Some(id.clone()))
                            on:click=move |_| on_change.run(Some(click_id.clone()))
                        >
                            {category.name.clone()}
                        </button>
                    }
                }
            />
        </div>
    }
}

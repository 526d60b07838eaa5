//! Delete Confirm Button Component
//!
//! Inline two-step delete for list rows: the first click names the item and
//! asks, the second removes it.

use leptos::prelude::*;

fn confirm_prompt(item_name: &str) -> String {
    let name = item_name.trim();
    if name.is_empty() {
        "Delete?".to_string()
    } else {
        format!("Delete \"{}\"?", name)
    }
}

/// Inline delete confirmation button
///
/// # Arguments
/// * `item_name` - Shown in the tooltip and the confirmation prompt
/// * `button_class` - CSS class for the initial delete button
/// * `on_confirm` - Callback to execute when user confirms deletion
#[component]
pub fn DeleteConfirmButton(
    #[prop(into)] item_name: String,
    #[prop(into)] button_class: String,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let (confirming, set_confirming) = signal(false);
    let tooltip = format!("Delete {}", item_name);
    let prompt = confirm_prompt(&item_name);

    view! {
        {move || if confirming.get() {
            view! {
                <span class="delete-confirm">
                    <span class="delete-confirm-text">{prompt.clone()}</span>
                    <button
                        class="confirm-btn"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            set_confirming.set(false);
                            on_confirm.run(());
                        }
                    >
                        "Yes"
                    </button>
                    <button
                        class="cancel-btn"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            set_confirming.set(false);
                        }
                    >
                        "No"
                    </button>
                </span>
            }.into_any()
        } else {
            view! {
                <button
                    class=button_class.clone()
                    title=tooltip.clone()
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_confirming.set(true);
                    }
                >
                    "×"
                </button>
            }.into_any()
        }}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_the_item() {
        assert_eq!(confirm_prompt("Passport"), "Delete \"Passport\"?");
        assert_eq!(confirm_prompt("  Sunscreen "), "Delete \"Sunscreen\"?");
        assert_eq!(confirm_prompt(""), "Delete?");
    }
}

//! Stat Card Component

use leptos::prelude::*;

/// One labelled counter of a statistics row
#[component]
pub fn StatCard(label: &'static str, #[prop(into)] value: Signal<String>) -> impl IntoView {
    view! {
        <div class="stat-card">
            <span class="stat-value">{move || value.get()}</span>
            <span class="stat-label">{label}</span>
        </div>
    }
}

/// Share of `part` in `total`, rounded down
pub fn percent(part: u32, total: u32) -> u32 {
    if total == 0 {
        0
    } else {
        (u64::from(part) * 100 / u64::from(total)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 2), 100);
        assert_eq!(percent(0, 0), 0);
    }
}

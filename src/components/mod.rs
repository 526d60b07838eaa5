//! UI Components
//!
//! Reusable Leptos components.

mod category_filter;
mod checklist_panel;
mod delete_confirm_button;
mod expenses_panel;
mod itinerary_panel;
mod login_form;
mod member_select;
mod members_panel;
mod notice_bar;
mod packing_panel;
mod stat_card;
mod trip_form;
mod trip_list;
mod trip_overview;
mod trip_tab_bar;

pub use category_filter::CategoryFilter;
pub use checklist_panel::ChecklistPanel;
pub use delete_confirm_button::DeleteConfirmButton;
pub use expenses_panel::ExpensesPanel;
pub use itinerary_panel::ItineraryPanel;
pub use login_form::LoginForm;
pub use member_select::MemberSelect;
pub use members_panel::MembersPanel;
pub use notice_bar::NoticeBar;
pub use packing_panel::PackingPanel;
pub use stat_card::{percent, StatCard};
pub use trip_form::TripForm;
pub use trip_list::TripList;
pub use trip_overview::TripOverview;
pub use trip_tab_bar::{Tab, TripTabBar};

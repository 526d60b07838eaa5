//! Application Context
//!
//! Shared state provided via Leptos Context API: the API client, the open
//! trip and the signed-in user.

use leptos::prelude::*;
use trip_api::{ApiClient, ApiError, User};

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    api: StoredValue<ApiClient, LocalStorage>,
    /// Trip being viewed
    pub trip_id: RwSignal<Option<String>>,
    /// Signed-in user (None = show the login form)
    pub user: RwSignal<Option<User>>,
    /// Whether the initial session check finished
    pub session_checked: RwSignal<bool>,
}

impl AppContext {
    pub fn new(api: ApiClient, trip_id: Option<String>) -> Self {
        Self {
            api: StoredValue::new_local(api),
            trip_id: RwSignal::new(trip_id),
            user: RwSignal::new(None),
            session_checked: RwSignal::new(false),
        }
    }

    pub fn api(&self) -> ApiClient {
        self.api.get_value()
    }

    /// Current trip, read without subscribing
    pub fn trip(&self) -> Option<String> {
        self.trip_id.get_untracked()
    }

    /// Drop the user when the server no longer accepts the session
    pub fn handle_error(&self, error: &ApiError) {
        if matches!(error, ApiError::Unauthorized) {
            tracing::info!("session expired, signing out");
            self.user.set(None);
        }
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}

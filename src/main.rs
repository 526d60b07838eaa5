//! Trip Planner Frontend Entry Point

mod app;
mod components;
mod config;
mod context;
mod logging;
mod store;
mod trips;

use app::App;
use config::AppConfig;
use leptos::prelude::*;
use trip_api::ApiClient;

fn main() {
    console_error_panic_hook::set_once();

    let config = AppConfig::from_env();
    logging::init(config.log_level);

    let api: ApiClient = match config.api().and_then(ApiClient::connect) {
        Ok(api) => api,
        Err(e) => {
            tracing::error!(error = %e, url = %config.api_url, "cannot start API client");
            return;
        }
    };
    tracing::info!(url = %config.api_url, "starting");

    mount_to_body(move || view! { <App api=api.clone() /> });
}

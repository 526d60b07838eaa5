//! Login Form Component
//!
//! Email/password sign-in; the session lives in cookies set by the API.

use leptos::prelude::*;
use leptos::task::spawn_local;
use trip_api::ApiError;

use crate::context::use_app_context;

#[component]
pub fn LoginForm() -> impl IntoView {
    let ctx = use_app_context();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (submitting, set_submitting) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let email = email.get();
        let password = password.get();
        if email.is_empty() || password.is_empty() {
            set_error.set(Some("Please enter your email and password.".to_string()));
            return;
        }

        set_submitting.set(true);
        spawn_local(async move {
            match ctx.api().login(&email, &password).await {
                Ok(user) => {
                    set_error.set(None);
                    set_password.set(String::new());
                    ctx.user.set(Some(user));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "sign in failed");
                    let message = match e {
                        ApiError::Unauthorized => "Invalid email or password.".to_string(),
                        other => other.user_message("Sign in failed. Please try again later."),
                    };
                    set_error.set(Some(message));
                }
            }
            set_submitting.set(false);
        });
    };

    view! {
        <form class="login-form" on:submit=on_submit>
            <h2>"Sign in"</h2>
            <input
                type="email"
                placeholder="Email"
                prop:value=move || email.get()
                on:input=move |ev| set_email.set(event_target_value(&ev))
            />
            <input
                type="password"
                placeholder="Password"
                prop:value=move || password.get()
                on:input=move |ev| set_password.set(event_target_value(&ev))
            />
            {move || error.get().map(|message| view! { <p class="form-error">{message}</p> })}
            <button type="submit" disabled=move || submitting.get()>
                {move || if submitting.get() { "Signing in..." } else { "Sign in" }}
            </button>
        </form>
    }
}

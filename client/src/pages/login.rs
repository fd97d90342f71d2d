//! Login page with email + password sign-in.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use chamber_session::demo::{DEMO_EMAIL, DEMO_PASSWORD};
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::state::auth::expect_auth;
use crate::util::auth::should_leave_login;

/// Local form check before anything is sent. Values are passed through
/// untrimmed so the demo pair only matches when typed exactly.
pub(crate) fn validate_credentials(email: &str, password: &str) -> Result<(), &'static str> {
    if email.trim().is_empty() || password.is_empty() {
        return Err("Enter your email and password.");
    }
    Ok(())
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_auth();
    let state = auth.state();
    let demo_mode = auth.session().config().demo_mode;
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let message = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    // Leave the page as soon as a session lands, whichever path produced it.
    Effect::new(move || {
        if state.with(should_leave_login) {
            navigate("/", NavigateOptions::default());
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let email_value = email.get_untracked();
        let password_value = password.get_untracked();
        if let Err(hint) = validate_credentials(&email_value, &password_value) {
            message.set(Some(hint.to_owned()));
            return;
        }
        busy.set(true);
        message.set(None);

        let auth = auth.clone();
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            if let Err(e) = auth.sign_in(&email_value, &password_value).await {
                message.set(Some(e.to_string()));
            }
            busy.set(false);
        });
        #[cfg(not(feature = "csr"))]
        let _ = (auth, email_value, password_value);
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Chamber"</h1>
                <p class="login-card__subtitle">"Sign in to your chamber workspace"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@chamber.law"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign In"
                    </button>
                </form>
                <Show when=move || message.get().is_some()>
                    <p class="login-message">{move || message.get().unwrap_or_default()}</p>
                </Show>
                {demo_mode
                    .then(|| {
                        view! {
                            <p class="login-message login-message--demo">
                                "Demo account: " {DEMO_EMAIL} " / " {DEMO_PASSWORD}
                            </p>
                        }
                    })}
            </div>
        </div>
    }
}

//! Profile page: shows the signed-in user's profile and edits the display
//! name and language.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing route. Saves go through
//! `update_profile`, which merges into the cached profile on success, so the
//! page never re-fetches after a write.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use chamber_session::{Language, Profile, ProfileUpdate, Role};
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::state::auth::expect_auth;
use crate::util::auth::install_unauth_redirect;

pub(crate) fn role_label(role: Role) -> &'static str {
    match role {
        Role::Admin => "Administrator",
        Role::SeniorLawyer => "Senior Lawyer",
        Role::Lawyer => "Lawyer",
        Role::Paralegal => "Paralegal",
        Role::Secretary => "Secretary",
    }
}

pub(crate) fn language_label(language: Language) -> &'static str {
    match language {
        Language::En => "English",
        Language::Ar => "العربية",
    }
}

/// Build the update for an edited display name, or `None` when there is
/// nothing to send.
pub(crate) fn name_update(draft: &str, current: Option<&Profile>) -> Option<ProfileUpdate> {
    let name = draft.trim();
    if name.is_empty() || current.is_some_and(|p| p.full_name == name) {
        return None;
    }
    Some(ProfileUpdate::default().full_name(name))
}

/// Build the update for a language picked from the selector.
pub(crate) fn language_update(code: &str, current: Option<&Profile>) -> Option<ProfileUpdate> {
    let language = Language::from_code(code)?;
    if current.is_some_and(|p| p.language == language) {
        return None;
    }
    Some(ProfileUpdate::default().language(language))
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = expect_auth();
    let state = auth.state();
    install_unauth_redirect(state, use_navigate());

    let name_draft = RwSignal::new(String::new());
    let info = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    // Seed the editor once the profile arrives.
    Effect::new(move || {
        if let Some(name) = state.with(|s| s.profile.as_ref().map(|p| p.full_name.clone())) {
            if name_draft.get_untracked().is_empty() {
                name_draft.set(name);
            }
        }
    });

    let save = {
        let auth = auth.clone();
        move |update: ProfileUpdate| {
            busy.set(true);
            info.set(None);
            let auth = auth.clone();
            #[cfg(feature = "csr")]
            leptos::task::spawn_local(async move {
                match auth.update_profile(update).await {
                    Ok(()) => info.set(Some("Profile saved.".to_owned())),
                    Err(e) => info.set(Some(format!("Save failed: {e}"))),
                }
                busy.set(false);
            });
            #[cfg(not(feature = "csr"))]
            let _ = (auth, update);
        }
    };

    let save_name = save.clone();
    let on_save_name = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let current = state.with_untracked(|s| s.profile.clone());
        match name_update(&name_draft.get_untracked(), current.as_ref()) {
            Some(update) => save_name(update),
            None => info.set(Some("Nothing to save.".to_owned())),
        }
    };

    let on_language = move |ev: leptos::ev::Event| {
        let current = state.with_untracked(|s| s.profile.clone());
        if let Some(update) = language_update(&event_target_value(&ev), current.as_ref()) {
            save(update);
        }
    };

    let on_sign_out = move |_| {
        let auth = auth.clone();
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            if let chamber_session::SignOut::LocalOnly(e) = auth.sign_out().await {
                log::debug!("backend sign-out failed: {e}");
            }
        });
        #[cfg(not(feature = "csr"))]
        let _ = auth;
    };

    let display_name = move || state.with(|s| s.display_name()).unwrap_or_else(|| "-".to_owned());
    let email = move || state.with(|s| s.profile.as_ref().map(|p| p.email.clone())).unwrap_or_default();
    let role = move || state.with(|s| s.profile.as_ref().map(|p| role_label(p.role))).unwrap_or("-");
    let current_language = move || state.with(|s| s.profile.as_ref().map(|p| p.language)).unwrap_or_default();

    view! {
        <div class="profile-page">
            <Show
                when=move || !state.with(|s| s.loading)
                fallback=|| view! { <p class="profile-loading">"Loading session..."</p> }
            >
                <div class="profile-card">
                    <h1>{display_name}</h1>
                    <dl class="profile-fields">
                        <dt>"Email"</dt>
                        <dd>{email}</dd>
                        <dt>"Role"</dt>
                        <dd>{role}</dd>
                    </dl>
                    <form class="profile-form" on:submit=on_save_name.clone()>
                        <input
                            class="profile-input"
                            type="text"
                            prop:value=move || name_draft.get()
                            on:input=move |ev| name_draft.set(event_target_value(&ev))
                        />
                        <button class="profile-button" type="submit" disabled=move || busy.get()>
                            "Save name"
                        </button>
                    </form>
                    <select class="profile-select" on:change=on_language.clone() disabled=move || busy.get()>
                        {Language::ALL
                            .into_iter()
                            .map(|language| {
                                view! {
                                    <option
                                        value=language.as_str()
                                        selected=move || current_language() == language
                                    >
                                        {language_label(language)}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                    <Show when=move || info.get().is_some()>
                        <p class="profile-message">{move || info.get().unwrap_or_default()}</p>
                    </Show>
                    <button class="profile-button profile-button--secondary" on:click=on_sign_out.clone()>
                        "Sign out"
                    </button>
                </div>
            </Show>
        </div>
    }
}

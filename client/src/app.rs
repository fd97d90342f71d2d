//! Root application component with routing and the session provider.

use std::sync::Arc;

use chamber_session::SessionProvider;
use chamber_session::supabase::{SupabaseClient, SupabaseConfig};
use leptos::prelude::*;
use leptos_meta::{Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::auth_provider::AuthProvider;
use crate::pages::{login::LoginPage, profile::ProfilePage};

const DEFAULT_SUPABASE_URL: &str = "http://localhost:54321";

/// Build the session for this UI root. Project credentials are baked in at
/// compile time since the bundle has no process environment.
fn build_session() -> Result<SessionProvider, chamber_session::BackendError> {
    let url = option_env!("SUPABASE_URL").unwrap_or(DEFAULT_SUPABASE_URL);
    let anon_key = option_env!("SUPABASE_ANON_KEY").unwrap_or_default();
    let client = Arc::new(SupabaseClient::new(SupabaseConfig::new(url, anon_key))?);
    Ok(SessionProvider::new(client.clone(), client))
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let routes = match build_session() {
        Ok(session) => view! {
            <AuthProvider session=session>
                <Router>
                    <Routes fallback=|| "Page not found.".into_view()>
                        <Route path=StaticSegment("login") view=LoginPage/>
                        <Route path=StaticSegment("") view=ProfilePage/>
                    </Routes>
                </Router>
            </AuthProvider>
        }
        .into_any(),
        Err(e) => view! { <p class="app-error">{format!("Session backend unavailable: {e}")}</p> }.into_any(),
    };

    view! {
        <Stylesheet id="leptos" href="/pkg/chamber.css"/>
        <Title text="Chamber"/>
        {routes}
    }
}

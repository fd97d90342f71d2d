//! Context provider that binds one `SessionProvider` to a UI subtree.
//!
//! DESIGN
//! ======
//! The provider is passed in as a prop rather than looked up globally, so
//! each mounted root (and each test) gets an isolated session. In the
//! browser, a local task runs the session's subscription loop and copies
//! every committed state into the context signal; both stop when the
//! component is cleaned up, which also unsubscribes from the backend.

use chamber_session::SessionProvider;
use leptos::prelude::*;

use crate::state::auth::{AuthContext, AuthState};

/// Provide [`AuthContext`] to `children`.
#[component]
pub fn AuthProvider(session: SessionProvider, children: Children) -> impl IntoView {
    let state = RwSignal::new(AuthState::from(&session.snapshot()));
    provide_context(AuthContext::new(session.clone(), state));

    #[cfg(feature = "csr")]
    follow_session(session, state);
    #[cfg(not(feature = "csr"))]
    let _ = session;

    children()
}

#[cfg(feature = "csr")]
fn follow_session(session: SessionProvider, state: RwSignal<AuthState>) {
    use futures::future::{abortable, join};

    let mut updates = session.watch();
    let mirror = async move {
        while updates.changed().await.is_ok() {
            let next = AuthState::from(&*updates.borrow_and_update());
            state.set(next);
        }
    };
    let (work, handle) = abortable(async move {
        join(session.run(), mirror).await;
    });

    leptos::task::spawn_local(async move {
        if work.await.is_err() {
            log::debug!("session follower stopped");
        }
    });
    on_cleanup(move || handle.abort());
}

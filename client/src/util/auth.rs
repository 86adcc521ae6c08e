//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components should apply identical unauthenticated redirect behavior.
//! Guards read only derived session state; the decision logic lives in the
//! session manager.

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::session::{LifecyclePhase, SessionSnapshot};

/// Redirect to `/login` whenever the session has resolved and no access
/// token is held.
pub fn install_unauth_redirect<F>(session: RwSignal<SessionSnapshot>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    let navigate = navigate.clone();
    Effect::new(move || {
        let snap = session.get();
        if snap.phase == LifecyclePhase::Ready && !snap.authenticated {
            navigate("/login", NavigateOptions::default());
        }
    });
}

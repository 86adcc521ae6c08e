//! Root application component with routing and the session context.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::net::api::ApiClient;
use crate::net::transport::GlooTransport;
use crate::pages::{home::HomePage, login::LoginPage};
use crate::state::session::{SessionManager, SessionSnapshot};
use crate::util::token_store::SessionStorageStore;

/// The session service as wired for the browser.
pub type BrowserSession = SessionManager<GlooTransport, SessionStorageStore>;
/// The authenticated REST client as wired for the browser.
pub type BrowserApi = ApiClient<GlooTransport, SessionStorageStore>;

/// Session service plus the reactive snapshot consumers render from.
#[derive(Clone)]
pub struct SessionContext {
    pub session: BrowserSession,
    pub snapshot: RwSignal<SessionSnapshot>,
}

impl SessionContext {
    /// Re-publish the current session state to reactive consumers. Called
    /// after every session operation; readers always see the latest
    /// committed value, replaced wholesale.
    pub fn sync(&self) {
        self.snapshot.set(self.session.snapshot());
    }
}

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Constructs the session service, provides it via context, and gates
/// routing behind completion of session restore: guards must never run
/// against an unresolved session.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = SessionManager::new(GlooTransport, SessionStorageStore);
    let ctx = SessionContext { session, snapshot: RwSignal::new(SessionSnapshot::default()) };
    provide_context(ctx.clone());
    provide_context(ApiClient::new(ctx.session.clone()));

    let initialized = RwSignal::new(false);
    #[cfg(feature = "hydrate")]
    {
        let ctx = ctx.clone();
        leptos::task::spawn_local(async move {
            ctx.session.initialize().await;
            ctx.sync();
            initialized.set(true);
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        // No storage off the browser: restore is a no-op and routing can
        // start on the first client-side tick.
        Effect::new(move || initialized.set(true));
    }

    view! {
        <Stylesheet id="leptos" href="/pkg/inkwell.css"/>
        <Title text="Inkwell"/>

        <Show
            when=move || initialized.get()
            fallback=|| view! { <p class="app-loading">"Restoring session..."</p> }
        >
            <Router>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("") view=HomePage/>
                </Routes>
            </Router>
        </Show>
    }
}

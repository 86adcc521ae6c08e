//! Signed-in landing page: identity summary and sign-out.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::app::SessionContext;
use crate::util::auth::install_unauth_redirect;

#[component]
pub fn HomePage() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let snapshot = ctx.snapshot;

    install_unauth_redirect(snapshot, use_navigate());

    let on_logout = {
        let ctx = ctx.clone();
        move |_| {
            #[cfg(feature = "hydrate")]
            {
                let ctx = ctx.clone();
                leptos::task::spawn_local(async move {
                    ctx.session.logout().await;
                    ctx.sync();
                });
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = &ctx;
            }
        }
    };

    view! {
        <div class="home-page">
            <header class="home-header">
                <h1>"Inkwell"</h1>
                <Show when=move || snapshot.get().authenticated>
                    <div class="home-identity">
                        <span class="home-identity__name">
                            {move || {
                                snapshot.get().user.map(|u| u.full_name).unwrap_or_default()
                            }}
                        </span>
                        <Show when=move || {
                            snapshot.get().user.is_some_and(|u| u.role.is_admin())
                        }>
                            <span class="home-identity__badge">"admin"</span>
                        </Show>
                        <button class="home-logout" on:click=on_logout.clone()>
                            "Sign out"
                        </button>
                    </div>
                </Show>
            </header>
            <main class="home-body">
                <p>"Your drafts and published posts live here."</p>
            </main>
        </div>
    }
}

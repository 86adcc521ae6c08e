//! Login and registration page over the session service.

use leptos::prelude::*;

use crate::app::SessionContext;
use crate::net::types::{Credentials, RegisterData};

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = expect_context::<SessionContext>();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let username = RwSignal::new(String::new());
    let full_name = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_login = {
        let ctx = ctx.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            if busy.get() {
                return;
            }
            let credentials = Credentials {
                email: email.get().trim().to_owned(),
                password: password.get(),
            };
            if credentials.email.is_empty() || credentials.password.is_empty() {
                info.set("Enter email and password.".to_owned());
                return;
            }
            busy.set(true);
            info.set("Signing in...".to_owned());

            #[cfg(feature = "hydrate")]
            {
                let ctx = ctx.clone();
                leptos::task::spawn_local(async move {
                    match ctx.session.login(&credentials).await {
                        Ok(()) => {
                            ctx.sync();
                            if let Some(window) = web_sys::window() {
                                let _ = window.location().set_href("/");
                            }
                        }
                        Err(e) => {
                            info.set(format!("Sign-in failed: {e}"));
                            busy.set(false);
                        }
                    }
                });
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = (&ctx, credentials);
            }
        }
    };

    let on_register = {
        let ctx = ctx.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            if busy.get() {
                return;
            }
            let data = RegisterData {
                username: username.get().trim().to_owned(),
                email: email.get().trim().to_owned(),
                password: password.get(),
                full_name: full_name.get().trim().to_owned(),
            };
            if data.username.is_empty() || data.email.is_empty() || data.password.is_empty() {
                info.set("Enter username, email and password.".to_owned());
                return;
            }
            busy.set(true);
            info.set("Creating account...".to_owned());

            #[cfg(feature = "hydrate")]
            {
                let ctx = ctx.clone();
                leptos::task::spawn_local(async move {
                    match ctx.session.register(&data).await {
                        Ok(()) => {
                            ctx.sync();
                            if let Some(window) = web_sys::window() {
                                let _ = window.location().set_href("/");
                            }
                        }
                        Err(e) => {
                            info.set(format!("Registration failed: {e}"));
                            busy.set(false);
                        }
                    }
                });
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = (&ctx, data);
            }
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Inkwell"</h1>
                <p class="login-card__subtitle">"Sign In"</p>
                <form class="login-form" on:submit=on_login>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign In"
                    </button>
                </form>
                <div class="login-divider"></div>
                <p class="login-card__subtitle">"Or Create An Account"</p>
                <form class="login-form" on:submit=on_register>
                    <input
                        class="login-input"
                        type="text"
                        placeholder="username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="text"
                        placeholder="display name"
                        prop:value=move || full_name.get()
                        on:input=move |ev| full_name.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Register"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}

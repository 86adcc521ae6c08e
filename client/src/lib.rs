//! # client
//!
//! Leptos + WASM frontend for the Inkwell blog platform. This crate owns the
//! browser session lifecycle — the token authority with its single-flight
//! refresh — and the authenticated REST client that talks to the forwarding
//! gateway. Page modules are thin consumers of that session surface.

pub mod app;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}

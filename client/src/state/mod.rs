//! Client-side state modules.
//!
//! DESIGN
//! ======
//! `session` is the single authority over authentication state; everything
//! else in the app reads snapshots of it.

pub mod session;

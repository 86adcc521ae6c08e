//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Pages are thin consumers of the session context: they invoke its
//! operations and render its derived state. None of them own auth logic.

pub mod home;
pub mod login;

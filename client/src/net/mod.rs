//! Networking modules for the gateway-fronted REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `types` defines the shared wire schema, `error` classifies failures,
//! `transport` is the seam over the browser fetch stack, and `api` is the
//! authenticated client with the 401 recovery policy.

pub mod api;
pub mod error;
pub mod transport;
pub mod types;

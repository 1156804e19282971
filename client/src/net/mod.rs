//! Networking modules for the clinic REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` issues authenticated requests, `endpoints` owns the URL table,
//! `error` normalizes every failure into one shape, `retry` re-runs transient
//! failures, and `types` defines the wire schema.

pub mod api;
pub mod endpoints;
pub mod error;
pub mod retry;
pub mod types;

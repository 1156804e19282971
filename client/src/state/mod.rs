//! Client-side state containers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` tracks the signed-in session; `appointments` holds history rows and
//! their list filters.

pub mod appointments;
pub mod auth;

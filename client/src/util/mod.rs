//! Utility helpers shared across client modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Role policy, routing tables, token storage and design tokens live here so
//! every front end applies the same rules.

pub mod auth;
pub mod color;
pub mod navigation;
pub mod roles;
pub mod token;

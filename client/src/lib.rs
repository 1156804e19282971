//! Client core for the clinic management portal.
//!
//! Role-based access and navigation, API error normalization, bounded retry,
//! token storage, auth session state, and appointment-history filtering.
//! The REST client in [`net::api`] ties them together for any front end.

pub mod config;
pub mod net;
pub mod state;
pub mod util;

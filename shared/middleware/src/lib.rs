//! Cultura shared HTTP middleware.

pub mod auth;

pub use auth::*;

//! Cultura shared domain models.
//!
//! Request/response types, validation derives and JWT claims shared between the
//! backend service and its middleware. Pure data — no I/O lives here.

pub mod common;
pub mod events;
pub mod subscriptions;
pub mod users;
pub mod venues;

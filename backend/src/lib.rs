//! Cultura backend: handlers, services and error taxonomy for the cultural
//! events API. The binary in `main.rs` wires these into an actix-web server.

pub mod docs;
pub mod errors;
pub mod handlers;
pub mod services;

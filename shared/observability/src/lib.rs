//! Cultura observability library.
//!
//! Standardized tracing subscriber setup with JSON or pretty formatting.

pub mod init;

pub use init::*;

// Re-export tracing for convenience
pub use tracing::{debug, error, info, instrument, span, trace, warn, Level};

//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via the tracing crate, initialized once at
//!   startup before anything else runs
//! - Pretty human-oriented output in development, compact single-line
//!   output in production
//! - `RUST_LOG` overrides the configured level

pub mod logging;

pub use logging::init_logging;

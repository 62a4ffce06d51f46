//! HTTP application assembly and serving.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     ServerConfig + RunMode
//!     → app.rs make_app (discovery → table build → compile → freeze)
//!     → Application (module infos + routing table + settings)
//!     → server.rs (ArcSwap<Application>, axum catch-all dispatch)
//!
//! Request:
//!     path → RoutingTable::match_path → redirect | page | static file
//!
//! Reload (SIGHUP):
//!     make_app builds a complete replacement, then one atomic swap;
//!     in-flight requests keep serving from the old Application
//! ```
//!
//! # Design Decisions
//! - The Application is immutable; a reload replaces it wholesale
//! - Page handlers stay pure; the dispatch shim owns status codes,
//!   headers and the HTML frame
//! - ParseError surfaces as 400 with the original message, never as 500

pub mod app;
pub mod server;

pub use app::{make_app, Application, StartupError};
pub use server::HttpServer;

//! Sammelsurium — a small multi-page website server.
//!
//! # Architecture Overview
//!
//! ```text
//!                ┌────────────────────────────────────────────────┐
//!                │                 STARTUP                        │
//!                │                                                │
//!                │  pages::REGISTRY ──▶ modules::loader           │
//!                │        (one entry per feature module)          │
//!                │                         │                      │
//!                │                         ▼                      │
//!                │                modules::ordering               │
//!                │          (sort, pin the home page)             │
//!                │                         │                      │
//!                │                         ▼                      │
//!                │    routing::builder ──▶ routing::table         │
//!                │  (settings synthesis,   (compile patterns,     │
//!                │   aliases, fallbacks)    freeze)               │
//!                │                         │                      │
//!                │                         ▼                      │
//!                │                 http::app (Application)        │
//!                └───────────────────────┬────────────────────────┘
//!                                        │ ArcSwap
//!     Request ──▶ http::server dispatch ─┴─▶ redirect | page | file
//!
//!     Cross-cutting: config (typed TOML), parsing (structural
//!     request arguments), observability (tracing)
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod modules;
pub mod routing;

// Feature modules
pub mod pages;

// Cross-cutting concerns
pub mod observability;
pub mod parsing;

pub use config::schema::{RunMode, ServerConfig};
pub use http::app::{make_app, Application};
pub use http::server::HttpServer;

//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Table construction (at startup):
//!     native rules (static files, fixed redirects)
//!     + sorted ModuleInfo descriptors
//!     → builder.rs (settings synthesis, alias redirects, API fallbacks)
//!     → table.rs (compile patterns, freeze as immutable RoutingTable)
//!
//! Incoming request (path):
//!     → table.rs match_path (ordered scan, first match wins)
//!     → matched rule + captured groups
//!     → dispatch in http::server
//! ```
//!
//! # Design Decisions
//! - Patterns are regular expressions, compiled once and anchored at
//!   both ends; `(?i)` prefix requests case-insensitivity
//! - The table is immutable after construction, shared read-only
//! - First match wins, so builder ordering is load-bearing: native
//!   rules, then module rules in descriptor order, then aliases, then
//!   the two API fallbacks last
//! - No rule construction can fail at request time; pattern errors
//!   surface at startup

pub mod builder;
pub mod rule;
pub mod table;

pub use builder::build_routing_table;
pub use rule::{
    Handler, PageError, PageHandler, PageRequest, PageResponse, RoutingRule, RuleSettings,
};
pub use table::{expand_target, RouteMatch, RoutingTable, TableError};

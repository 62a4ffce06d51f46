//! Structural request-argument parsing.
//!
//! # Data Flow
//! ```text
//! query arguments (string → string, last value wins)
//!     → value.rs (untyped Value tree)
//!     → schema.rs (per-shape field table: name, kind, default)
//!     → parse.rs (coerce Value against the declared Kind)
//!     → typed argument struct (via the Structured trait)
//!
//! Failure: ParseError propagates unchanged to the request boundary,
//! where it becomes a 400-class PageError.
//! ```
//!
//! # Design Decisions
//! - Coercion dispatches on an explicit tagged Kind enumeration; every
//!   target shape registers its field list as a static Schema
//! - Pure functions over their inputs, safe to call from any handler
//! - Strict mode rejects all implicit coercion
//! - Sequence parsing is atomic: one bad element fails the whole list

pub mod parse;
pub mod schema;
pub mod value;

pub use parse::{parse, parse_request_args, ParseError, Structured};
pub use schema::{DefaultTo, Field, Kind, Schema};
pub use value::Value;

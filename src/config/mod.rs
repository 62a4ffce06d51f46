//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, defaults when absent)
//!     → ServerConfig (typed, all sections defaultable)
//!     → AppSettings (immutable, built once, passed by reference)
//!
//! On reload signal:
//!     http::server rebuilds the whole Application from the same
//!     ServerConfig and swaps it in atomically
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no mutable settings bag
//! - All fields have defaults to allow minimal (or missing) configs
//! - The run mode (development/production) comes from the CLI, not the
//!   file, so a config file cannot accidentally flip failure policy

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{AppSettings, GeneralConfig, LoggingConfig, RunMode, ServerConfig, SiteConfig};

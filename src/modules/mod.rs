//! Module discovery subsystem.
//!
//! # Data Flow
//! ```text
//! registration table (one ModuleProvider per feature module)
//!     → loader.rs (filter against IgnoreList, invoke module_info(),
//!       validate, accumulate errors)
//!     → LoadResult (loaded names, descriptors, errors)
//!     → ordering.rs (sort by (name, description), pin home page)
//!     → routing table builder
//! ```
//!
//! # Design Decisions
//! - Descriptors are produced exactly once per startup (or reload) and
//!   frozen; requests only ever see them read-only behind Arc
//! - One broken module never aborts the scan; development mode escalates
//!   the accumulated errors after the scan, production mode logs them
//!   and serves what loaded
//! - The registration table replaces a filesystem walk: entry names keep
//!   the `group.unit` form so the ignore rules stay expressible

pub mod info;
pub mod loader;
pub mod ordering;

pub use info::{ModuleInfo, PageInfo};
pub use loader::{
    discover_modules, IgnoreList, LoadError, LoadResult, ModuleError, ModuleProvider,
};
pub use ordering::sort_module_infos;

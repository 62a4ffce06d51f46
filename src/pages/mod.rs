//! Feature modules of the website.
//!
//! # Data Flow
//! ```text
//! One file per feature module, each exposing
//!     module_info() -> Result<ModuleInfo, ModuleError>
//! REGISTRY lists every module with its qualified group.unit name;
//! modules::loader walks the table at startup and collects the
//! descriptors of everything not on the ignore list.
//! ```
//!
//! # Design Decisions
//! - Registration is explicit: adding a module means adding one line
//!   here, and the compiler enforces the entry-point signature
//! - A module that cannot build its descriptor (bad embedded data,
//!   missing backing service) reports a ModuleError instead of
//!   panicking, so one broken module never takes the site down

pub mod currency;
pub mod lolwut;
pub mod quotes;
pub mod services;
pub mod soundboard;
pub mod start_page;
pub mod swapped_words;

use crate::modules::loader::ModuleProvider;

/// The registration table, walked in order by the module loader.
pub const REGISTRY: &[ModuleProvider] = &[
    ModuleProvider {
        name: "start_page.start_page",
        build: start_page::module_info,
    },
    ModuleProvider {
        name: "services.services",
        build: services::module_info,
    },
    ModuleProvider {
        name: "swapped_words.swap",
        build: swapped_words::module_info,
    },
    ModuleProvider {
        name: "soundboard.soundboard",
        build: soundboard::module_info,
    },
    ModuleProvider {
        name: "quotes.quotes",
        build: quotes::module_info,
    },
    ModuleProvider {
        name: "currency.converter",
        build: currency::module_info,
    },
    ModuleProvider {
        name: "lolwut.lolwut",
        build: lolwut::module_info,
    },
];

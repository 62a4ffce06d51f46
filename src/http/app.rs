//! Application assembly.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::config::schema::{AppSettings, RunMode, ServerConfig};
use crate::modules::info::ModuleInfo;
use crate::modules::loader::{discover_modules, IgnoreList, LoadError};
use crate::pages;
use crate::routing::builder::build_routing_table;
use crate::routing::rule::{Handler, RoutingRule};
use crate::routing::table::{RoutingTable, TableError};

/// Failure to assemble the application. Only ever raised at startup or
/// on reload, never while serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Everything the serving layer needs, frozen at construction.
pub struct Application {
    /// Sorted descriptors, home page first.
    pub module_infos: Vec<Arc<ModuleInfo>>,
    /// The compiled handler table.
    pub table: RoutingTable,
    /// Immutable site settings.
    pub settings: AppSettings,
}

/// Assemble the application: discover modules, build and compile the
/// routing table, freeze the settings.
pub fn make_app(config: &ServerConfig, mode: RunMode) -> Result<Application, StartupError> {
    let mut ignored = IgnoreList::builtin();
    ignored.merge_config(&config.general.ignored_modules);

    let discovery_timer = Instant::now();
    let result = discover_modules(pages::REGISTRY, &ignored, mode)?;
    let duration = discovery_timer.elapsed();
    if duration > Duration::from_secs(1) {
        tracing::warn!(?duration, "getting the module infos took too long");
    }

    let rules = build_routing_table(static_rules(), &result.infos);
    if mode.is_dev() {
        tracing::debug!(count = rules.len(), "loaded handlers");
    }
    let table = RoutingTable::compile(rules)?;

    Ok(Application {
        module_infos: result.infos,
        table,
        settings: AppSettings::from_config(config, mode),
    })
}

/// The native rules every deployment starts from: static file serving
/// and the fixed file redirects.
fn static_rules() -> Vec<RoutingRule> {
    vec![
        RoutingRule::new(
            "/static/(.*)",
            Handler::StaticFiles {
                root: PathBuf::from("static"),
            },
        ),
        RoutingRule::redirect("/favicon.ico", "/static/favicon.ico"),
        RoutingRule::redirect("/robots.txt", "/static/robots.txt"),
    ]
}

//! Registry-driven module discovery.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::config::RunMode;
use crate::modules::info::ModuleInfo;
use crate::modules::ordering::sort_module_infos;

/// Modules ignored on every deployment, regardless of configuration.
/// Supports the same forms as the config-supplied list: `group.*`
/// wildcards and exact `group.unit` names.
pub const DEFAULT_IGNORED_MODULES: &[&str] = &[
    // needs a Redis-backed art generator that is not part of this deployment
    "lolwut.*",
];

/// Builds of a descriptor exceeding this emit a startup-time warning.
const BUILD_WARN_THRESHOLD: Duration = Duration::from_millis(100);

/// Error a module may report while building its descriptor.
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("invalid embedded config: {0}")]
    Config(String),

    #[error("backing data unavailable: {0}")]
    Unavailable(String),
}

/// One entry of the registration table: a qualified `group.unit` name
/// and the module's descriptor-producing entry point.
#[derive(Debug, Clone, Copy)]
pub struct ModuleProvider {
    pub name: &'static str,
    pub build: fn() -> Result<ModuleInfo, ModuleError>,
}

/// The merged set of module names excluded from discovery.
#[derive(Debug, Clone)]
pub struct IgnoreList {
    entries: Vec<String>,
}

impl IgnoreList {
    /// The built-in list, before any configuration is merged in.
    pub fn builtin() -> Self {
        Self {
            entries: DEFAULT_IGNORED_MODULES
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }

    /// Merge a comma-separated list of additional names from the
    /// configuration. Blank entries are skipped.
    pub fn merge_config(&mut self, csv: &str) {
        for entry in csv.split(',') {
            let entry = entry.trim();
            if !entry.is_empty() {
                self.entries.push(entry.to_string());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn ignores_group(&self, group: &str) -> bool {
        group.starts_with('_') || self.entries.iter().any(|e| e == &format!("{group}.*"))
    }

    fn ignores_unit(&self, qualified: &str, unit: &str) -> bool {
        unit.starts_with('_') || self.entries.iter().any(|e| e == qualified)
    }
}

/// Everything one discovery pass produced, frozen afterwards.
#[derive(Debug, Default)]
pub struct LoadResult {
    pub loaded: Vec<String>,
    pub infos: Vec<Arc<ModuleInfo>>,
    pub errors: Vec<String>,
}

/// Raised only in development mode, to force misconfigured modules to be
/// fixed before anything starts listening.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("module loading failed:\n{0}")]
    ContractViolations(String),
}

/// Walk the registration table, invoke each retained entry point, and
/// collect the descriptors.
///
/// Contract violations are recorded per entry and never abort the scan.
/// After the scan, development mode escalates them all at once;
/// production mode logs them and keeps whatever loaded. The returned
/// descriptors are already sorted with the home page pinned first.
pub fn discover_modules(
    providers: &[ModuleProvider],
    ignored: &IgnoreList,
    mode: RunMode,
) -> Result<LoadResult, LoadError> {
    let mut loaded: Vec<String> = Vec::new();
    let mut infos: Vec<Arc<ModuleInfo>> = Vec::new();
    let mut errors: Vec<String> = Vec::new();

    for provider in providers {
        let (group, unit) = match provider.name.split_once('.') {
            Some(parts) => parts,
            None => ("", provider.name),
        };
        if ignored.ignores_group(group) || ignored.ignores_unit(provider.name, unit) {
            continue;
        }

        let build_timer = Instant::now();
        match (provider.build)() {
            Ok(info) if info.is_valid() => {
                let elapsed = build_timer.elapsed();
                if elapsed > BUILD_WARN_THRESHOLD {
                    tracing::warn!(
                        module = provider.name,
                        elapsed = ?elapsed,
                        "building the module info is affecting the startup time"
                    );
                }
                loaded.push(provider.name.to_string());
                infos.push(Arc::new(info));
            }
            Ok(_) => errors.push(format!(
                "'module_info' of {} did not return a usable ModuleInfo. \
                 Fix the descriptor or add '{}.*' or '{}' to the ignore list.",
                provider.name, group, provider.name,
            )),
            Err(err) => errors.push(format!(
                "building the module info of {} failed: {}. \
                 Fix the module or add '{}.*' or '{}' to the ignore list.",
                provider.name, err, group, provider.name,
            )),
        }
    }

    if !errors.is_empty() {
        match mode {
            // exit to make sure it gets fixed
            RunMode::Development => {
                return Err(LoadError::ContractViolations(errors.join("\n")))
            }
            // don't exit in production to keep stuff running
            RunMode::Production => tracing::error!("{}", errors.join("\n")),
        }
    }

    tracing::info!(
        count = loaded.len(),
        modules = ?loaded,
        "loaded modules"
    );
    tracing::info!(count = ignored.len(), "entries on the ignore list");

    sort_module_infos(&mut infos);

    Ok(LoadResult {
        loaded,
        infos,
        errors,
    })
}

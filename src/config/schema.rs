//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from the config
//! file and carry defaults so a minimal (or missing) config works.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The strict/lenient failure-escalation switch. Development aborts
/// startup on any module contract violation; production logs and keeps
/// serving what loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Development,
    Production,
}

impl RunMode {
    pub fn is_dev(self) -> bool {
        matches!(self, RunMode::Development)
    }
}

/// Root configuration for the website server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener and module-discovery settings.
    pub general: GeneralConfig,

    /// Site-wide settings frozen into [`AppSettings`].
    pub site: SiteConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// General server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Port to listen on.
    pub port: u16,

    /// Bind to localhost only and trust forwarded headers.
    pub behind_proxy: bool,

    /// Comma-separated module names to ignore in addition to the
    /// built-in list; supports `group.*` wildcards and exact
    /// `group.unit` names.
    pub ignored_modules: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            behind_proxy: false,
            ignored_modules: String::new(),
        }
    }
}

/// Site-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Secret used for signed cookies; a deployment-specific fallback
    /// is derived when empty.
    pub cookie_secret: String,

    /// Comma-separated secrets granting trusted API access.
    pub trusted_api_secrets: String,

    /// Whether generated absolute links use https.
    pub link_to_https: bool,

    /// The onion address of this website, if any.
    pub onion_address: Option<String>,

    /// Whether ratelimits are enabled.
    pub ratelimits: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            cookie_secret: String::new(),
            trusted_api_secrets: "xyzzy".to_string(),
            link_to_https: false,
            onion_address: None,
            ratelimits: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Force debug logging on or off; unset follows the run mode.
    pub debug: Option<bool>,
}

/// The immutable settings struct handed to the serving layer; built
/// once per application construction, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub cookie_secret: String,
    pub trusted_api_secrets: BTreeSet<String>,
    pub link_to_https: bool,
    pub onion_address: Option<String>,
    pub onion_protocol: Option<String>,
    pub ratelimits: bool,
    pub mode: RunMode,
}

impl AppSettings {
    pub fn from_config(config: &ServerConfig, mode: RunMode) -> Self {
        let site = &config.site;
        let cookie_secret = if site.cookie_secret.is_empty() {
            env!("CARGO_PKG_NAME").to_string()
        } else {
            site.cookie_secret.clone()
        };
        let trusted_api_secrets = site
            .trusted_api_secrets
            .split(',')
            .map(str::trim)
            .filter(|secret| !secret.is_empty())
            .map(str::to_string)
            .collect();
        let onion_protocol = site
            .onion_address
            .as_deref()
            .map(|addr| addr.split("://").next().unwrap_or(addr).to_string());

        Self {
            cookie_secret,
            trusted_api_secrets,
            link_to_https: site.link_to_https,
            onion_address: site.onion_address.clone(),
            onion_protocol,
            ratelimits: site.ratelimits,
            mode,
        }
    }
}

//! Routing rules and the handler contract.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::modules::info::ModuleInfo;
use crate::parsing::parse::ParseError;
use crate::parsing::value::Value;

/// Everything a page handler may look at for one request.
pub struct PageRequest<'a> {
    pub path: &'a str,
    /// Query arguments, already reduced to last-value-wins.
    pub arguments: BTreeMap<String, String>,
    /// Capture groups of the matched route pattern.
    pub captures: Vec<String>,
    /// The descriptor owning the matched rule, when the rule carries one.
    pub module_info: Option<&'a Arc<ModuleInfo>>,
    /// All loaded descriptors, for pages rendering the module list.
    pub module_infos: &'a [Arc<ModuleInfo>],
}

/// The body a page handler produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse {
    pub content_type: &'static str,
    pub body: String,
}

impl PageResponse {
    pub fn html(body: String) -> Self {
        Self {
            content_type: "text/html; charset=utf-8",
            body,
        }
    }

    pub fn json(body: String) -> Self {
        Self {
            content_type: "application/json",
            body,
        }
    }
}

/// Failure of a page handler, mapped to a status code by the serving
/// layer.
#[derive(Debug, Error)]
pub enum PageError {
    /// Invalid request input; carries the original parser message.
    #[error("{0}")]
    BadRequest(String),

    #[error("not found")]
    NotFound,
}

impl From<ParseError> for PageError {
    fn from(err: ParseError) -> Self {
        PageError::BadRequest(err.to_string())
    }
}

/// A module-provided request handler. Pure over its input, safe to call
/// from any number of request contexts.
pub type PageHandler = fn(&PageRequest<'_>) -> Result<PageResponse, PageError>;

/// The implementation type of a routing rule. `Page` is the
/// module-provided variant; the others are framework-native.
#[derive(Debug, Clone, PartialEq)]
pub enum Handler {
    Page(PageHandler),
    /// Plain redirect; the target may contain `{N}` placeholders filled
    /// from the pattern's capture groups.
    Redirect { target: String },
    /// Static file serving rooted at a directory; the first capture
    /// group selects the file.
    StaticFiles { root: PathBuf },
}

impl Handler {
    /// The provenance marker: true for module-provided handler types,
    /// false for native ones like redirects and static files.
    pub fn is_module_handler(&self) -> bool {
        matches!(self, Handler::Page(_))
    }
}

/// Per-rule settings consumed by the serving layer when rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSettings {
    pub default_title: bool,
    pub default_description: bool,
    /// Injected by the table builder so the serving layer can recover
    /// page metadata without it being embedded in the pattern.
    pub module_info: Option<Arc<ModuleInfo>>,
    /// Handler-specific options, preserved untouched by the builder.
    pub options: BTreeMap<String, Value>,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            default_title: true,
            default_description: true,
            module_info: None,
            options: BTreeMap::new(),
        }
    }
}

/// One entry of the routing table: pattern, handler, optional settings,
/// optional name.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingRule {
    /// Regular expression matched against the request path.
    pub pattern: String,
    pub handler: Handler,
    pub settings: Option<RuleSettings>,
    pub name: Option<String>,
}

impl RoutingRule {
    /// The two-element shorthand form: no settings, no name.
    pub fn new(pattern: &str, handler: Handler) -> Self {
        Self {
            pattern: pattern.to_string(),
            handler,
            settings: None,
            name: None,
        }
    }

    pub fn page(pattern: &str, handler: PageHandler) -> Self {
        Self::new(pattern, Handler::Page(handler))
    }

    pub fn redirect(pattern: &str, target: &str) -> Self {
        Self::new(
            pattern,
            Handler::Redirect {
                target: target.to_string(),
            },
        )
    }

    pub fn with_settings(mut self, settings: RuleSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
}

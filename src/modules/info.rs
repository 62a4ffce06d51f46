//! Page and module descriptors.

use std::cmp::Ordering;

use crate::routing::rule::RoutingRule;

/// Metadata of one page, also used for the sub-pages of a module.
///
/// Ordered by declaration order of the fields, so `(name, description)`
/// decides and the remaining fields only break exact ties.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct PageInfo {
    pub name: String,
    pub description: String,
    /// Canonical URL path, or `None` for a page with no direct route.
    pub path: Option<String>,
    /// Search terms, insertion order preserved.
    pub keywords: Vec<String>,
}

impl PageInfo {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            path: None,
            keywords: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }
}

/// The descriptor every feature module returns from its `module_info`
/// entry point: page identity plus the routing rules, sub-pages and path
/// aliases the module contributes.
///
/// Never mutated after creation; the loader hands descriptors out behind
/// `Arc` and they are rebuilt wholesale on reload, never patched.
#[derive(Debug, Clone, Default)]
pub struct ModuleInfo {
    pub page: PageInfo,
    pub handlers: Vec<RoutingRule>,
    pub sub_pages: Vec<PageInfo>,
    /// Alternate URL path prefixes redirecting (case-insensitively) to
    /// `page.path`.
    pub aliases: Vec<String>,
}

impl ModuleInfo {
    pub fn name(&self) -> &str {
        &self.page.name
    }

    pub fn description(&self) -> &str {
        &self.page.description
    }

    pub fn path(&self) -> Option<&str> {
        self.page.path.as_deref()
    }

    /// Whether the descriptor carries a usable identity. The loader
    /// records a contract violation for descriptors failing this.
    pub fn is_valid(&self) -> bool {
        !self.page.name.is_empty() && !self.page.description.is_empty()
    }

    /// Resolve the page info for a path, falling back to the module
    /// itself when no sub-page matches.
    pub fn get_page_info(&self, path: &str) -> &PageInfo {
        if self.page.path.as_deref() == Some(path) {
            return &self.page;
        }
        self.sub_pages
            .iter()
            .find(|sub| sub.path.as_deref() == Some(path))
            .unwrap_or(&self.page)
    }

    /// Keywords for a path as a comma-separated string; a sub-page match
    /// combines the module's keywords with the sub-page's.
    pub fn keywords_for(&self, path: &str) -> String {
        let page = self.get_page_info(path);
        if std::ptr::eq(page, &self.page) {
            self.page.keywords.join(", ")
        } else {
            let mut keywords = self.page.keywords.clone();
            keywords.extend(page.keywords.iter().cloned());
            keywords.join(", ")
        }
    }
}

impl PartialEq for ModuleInfo {
    fn eq(&self, other: &Self) -> bool {
        self.page == other.page
    }
}

impl Eq for ModuleInfo {}

impl PartialOrd for ModuleInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ModuleInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.page.cmp(&other.page)
    }
}

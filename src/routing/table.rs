//! The compiled, immutable routing table.

use regex::Regex;
use thiserror::Error;

use crate::routing::rule::RoutingRule;

/// A routing rule whose pattern failed to compile. Patterns come from
/// code, not requests, so this is a startup-time programmer error.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("invalid route pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: regex::Error,
    },
}

struct CompiledRule {
    rule: RoutingRule,
    regex: Regex,
}

/// The full ordered handler table, compiled once at startup and shared
/// read-only across all requests.
pub struct RoutingTable {
    rules: Vec<CompiledRule>,
}

/// A matched rule plus the text of its capture groups (unmatched groups
/// yield the empty string).
pub struct RouteMatch<'a> {
    pub rule: &'a RoutingRule,
    pub captures: Vec<String>,
}

impl RoutingTable {
    /// Compile every pattern, anchoring it at both ends the way the
    /// serving layer expects whole-path matches.
    pub fn compile(rules: Vec<RoutingRule>) -> Result<Self, TableError> {
        let compiled = rules
            .into_iter()
            .map(|rule| {
                let anchored = format!("^(?:{})$", rule.pattern);
                match Regex::new(&anchored) {
                    Ok(regex) => Ok(CompiledRule { rule, regex }),
                    Err(source) => Err(TableError::Pattern {
                        pattern: rule.pattern.clone(),
                        source,
                    }),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules: compiled })
    }

    /// Scan the table in order and return the first matching rule.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.rules.iter().find_map(|compiled| {
            compiled.regex.captures(path).map(|captures| RouteMatch {
                rule: &compiled.rule,
                captures: captures
                    .iter()
                    .skip(1)
                    .map(|group| group.map_or(String::new(), |m| m.as_str().to_string()))
                    .collect(),
            })
        })
    }

    pub fn rules(&self) -> impl Iterator<Item = &RoutingRule> {
        self.rules.iter().map(|compiled| &compiled.rule)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Expand `{N}` placeholders in a redirect target from the capture
/// groups of the matched pattern.
pub fn expand_target(template: &str, captures: &[String]) -> String {
    let mut target = template.to_string();
    for (index, capture) in captures.iter().enumerate() {
        target = target.replace(&format!("{{{index}}}"), capture);
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::rule::{Handler, PageError, PageRequest, PageResponse, RoutingRule};

    fn dummy_page(_request: &PageRequest<'_>) -> Result<PageResponse, PageError> {
        Ok(PageResponse::html("spam".to_string()))
    }

    #[test]
    fn test_first_match_wins() {
        let table = RoutingTable::compile(vec![
            RoutingRule::page("/spam/?", dummy_page).with_name("first"),
            RoutingRule::page("/spam", dummy_page).with_name("second"),
        ])
        .unwrap();

        let matched = table.match_path("/spam").unwrap();
        assert_eq!(matched.rule.name.as_deref(), Some("first"));
    }

    #[test]
    fn test_patterns_are_anchored() {
        let table =
            RoutingTable::compile(vec![RoutingRule::page("/spam", dummy_page)]).unwrap();
        assert!(table.match_path("/spam").is_some());
        assert!(table.match_path("/spam/eggs").is_none());
        assert!(table.match_path("/more/spam").is_none());
    }

    #[test]
    fn test_case_insensitive_prefix() {
        let table = RoutingTable::compile(vec![RoutingRule::redirect(
            "(?i)/bar(/.*|)",
            "/foo{0}",
        )])
        .unwrap();

        for path in ["/bar", "/BAR", "/bar/", "/BAR/anything"] {
            assert!(table.match_path(path).is_some(), "{path}");
        }
        assert!(table.match_path("/barn").is_none());
    }

    #[test]
    fn test_captures_extracted() {
        let table = RoutingTable::compile(vec![RoutingRule::page(
            "/zitate/([0-9]+)-([0-9]+)/?",
            dummy_page,
        )])
        .unwrap();

        let matched = table.match_path("/zitate/42-7").unwrap();
        assert_eq!(matched.captures, vec!["42".to_string(), "7".to_string()]);
    }

    #[test]
    fn test_unmatched_group_is_empty_string() {
        let table = RoutingTable::compile(vec![RoutingRule::redirect(
            "(?i)/bar(/.*|)",
            "/foo{0}",
        )])
        .unwrap();
        let matched = table.match_path("/bar").unwrap();
        assert_eq!(matched.captures, vec![String::new()]);
    }

    #[test]
    fn test_expand_target() {
        assert_eq!(
            expand_target("/foo{0}", &["/anything".to_string()]),
            "/foo/anything"
        );
        assert_eq!(expand_target("/foo{0}", &[String::new()]), "/foo");
        assert_eq!(
            expand_target("/api/{0}", &["zitate".to_string()]),
            "/api/zitate"
        );
        // no placeholders, no captures
        assert_eq!(expand_target("/api/endpunkte", &[]), "/api/endpunkte");
    }

    #[test]
    fn test_invalid_pattern_is_startup_error() {
        let result = RoutingTable::compile(vec![RoutingRule::new(
            "/spam(",
            Handler::Redirect {
                target: "/eggs".to_string(),
            },
        )]);
        assert!(matches!(result, Err(TableError::Pattern { .. })));
    }

    #[test]
    fn test_alias_expansion_end_to_end() {
        // the shape emitted by the builder for aliases
        let table = RoutingTable::compile(vec![RoutingRule::redirect(
            "(?i)/bar(/.*|)",
            "/foo{0}",
        )])
        .unwrap();

        for (path, expected) in [
            ("/bar", "/foo"),
            ("/bar/", "/foo/"),
            ("/bar/anything", "/foo/anything"),
            ("/BAR/anything", "/foo/anything"),
        ] {
            let matched = table.match_path(path).unwrap();
            let Handler::Redirect { ref target } = matched.rule.handler else {
                panic!("expected redirect");
            };
            assert_eq!(expand_target(target, &matched.captures), expected, "{path}");
        }
    }
}

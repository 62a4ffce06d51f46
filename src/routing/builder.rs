//! Flattening descriptors into the final ordered rule sequence.

use std::sync::Arc;

use crate::modules::info::ModuleInfo;
use crate::routing::rule::{RoutingRule, RuleSettings};

/// Where `/api` with no module prefix redirects to.
const API_DOCUMENTATION_PATH: &str = "/api/endpunkte";

/// Build the full ordered routing-rule sequence.
///
/// Ordering is significant under first-match-wins and preserved exactly:
/// the supplied native rules first, then every descriptor's own rules in
/// descriptor order, then the alias redirects, then the two fixed API
/// fallbacks.
pub fn build_routing_table(
    static_rules: Vec<RoutingRule>,
    infos: &[Arc<ModuleInfo>],
) -> Vec<RoutingRule> {
    let mut rules = static_rules;

    for info in infos {
        for rule in &info.handlers {
            rules.push(annotate_module_rule(rule.clone(), info));
        }
    }

    for info in infos {
        let Some(path) = info.path() else {
            continue;
        };
        for alias in &info.aliases {
            rules.push(RoutingRule::redirect(
                // (?i) ignores case; the group captures the trailing
                // sub-path or the empty string
                &format!("(?i){alias}(/.*|)"),
                // {0} carries the trailing sub-path over to the target
                &format!("{path}{{0}}"),
            ));
        }
    }

    // redirect handler, to make finding APIs easier
    rules.push(RoutingRule::redirect(r"(?i)/(.+)/api/?", "/api/{0}"));
    // plain /api has no module prefix to shuffle, send it to the docs
    rules.push(RoutingRule::redirect(
        r"(?i)/api/?",
        API_DOCUMENTATION_PATH,
    ));

    rules
}

/// Attach the owning descriptor to a module rule so the serving layer
/// can recover title, description and keywords.
///
/// A rule in the two-element shorthand form gains a settings map with
/// `default_title`/`default_description` disabled (the descriptor's
/// name and description are used instead); a rule that already carries
/// settings only has `module_info` injected. Native rules pass through
/// untouched.
fn annotate_module_rule(mut rule: RoutingRule, info: &Arc<ModuleInfo>) -> RoutingRule {
    if !rule.handler.is_module_handler() {
        return rule;
    }
    match rule.settings {
        None => {
            rule.settings = Some(RuleSettings {
                default_title: false,
                default_description: false,
                module_info: Some(info.clone()),
                options: Default::default(),
            });
        }
        Some(ref mut settings) => {
            settings.module_info = Some(info.clone());
        }
    }
    rule
}

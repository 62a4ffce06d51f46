//! A page that swaps words in a text.

use std::collections::BTreeMap;
use std::collections::HashMap;

use regex::Regex;
use thiserror::Error;

use crate::modules::info::{ModuleInfo, PageInfo};
use crate::modules::loader::ModuleError;
use crate::parsing::parse::{
    field_bool, field_opt_str, field_str, parse_request_args, ParseError, Structured,
};
use crate::parsing::schema::{DefaultTo, Field, Kind, Schema};
use crate::parsing::value::Value;
use crate::routing::rule::{PageError, PageRequest, PageResponse, RoutingRule};

pub fn module_info() -> Result<ModuleInfo, ModuleError> {
    // fail at startup, not at request time, if the shipped pairs are bad
    parse_config(DEFAULT_CONFIG).map_err(|err| ModuleError::Config(err.to_string()))?;

    Ok(ModuleInfo {
        page: PageInfo::new("Vertauschte Wörter", "Eine Seite, die Wörter vertauscht")
            .with_path("/vertauschte-woerter")
            .with_keywords(&["vertauschte", "Wörter", "witzig", "Känguru"]),
        handlers: vec![
            RoutingRule::page("/vertauschte-woerter/?", swapped_words_page),
            RoutingRule::page("/swapped-words/?", swapped_words_page),
            RoutingRule::page("/api/vertauschte-woerter/?", swapped_words_api),
        ],
        sub_pages: vec![PageInfo::new(
            "Plugin",
            "Ein Browser-Plugin, welches Wörter vertauscht",
        )
        .with_path("/vertauschte-woerter/plugin")],
        ..Default::default()
    })
}

/// The max char count of the text to process.
const MAX_CHAR_COUNT: usize = 32768;

/// The word pairs used when the request supplies no config.
const DEFAULT_CONFIG: &str = "\
# word pairs swapped in both directions
links <=> rechts
oben <=> unten
gut <=> böse
Känguru <=> Pinguin
";

#[derive(Debug, Error)]
pub enum SwapConfigError {
    #[error("invalid word pair in line {line}: '{text}'")]
    InvalidLine { line: usize, text: String },
}

/// Parse a word-pair config: one `left <=> right` pair per line,
/// `#` starts a comment.
pub fn parse_config(config: &str) -> Result<Vec<(String, String)>, SwapConfigError> {
    let mut pairs = Vec::new();
    for (index, raw_line) in config.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((left, right)) = line.split_once("<=>") else {
            return Err(SwapConfigError::InvalidLine {
                line: index + 1,
                text: line.to_string(),
            });
        };
        let (left, right) = (left.trim(), right.trim());
        if left.is_empty() || right.is_empty() {
            return Err(SwapConfigError::InvalidLine {
                line: index + 1,
                text: line.to_string(),
            });
        }
        pairs.push((left.to_string(), right.to_string()));
    }
    Ok(pairs)
}

/// Swap the words of every configured pair, in both directions,
/// preserving a leading capital.
pub fn swap_words(text: &str, pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return text.to_string();
    }

    let mut replacements: HashMap<String, String> = HashMap::new();
    let mut alternation: Vec<String> = Vec::new();
    for (left, right) in pairs {
        replacements.insert(left.to_lowercase(), right.to_lowercase());
        replacements.insert(right.to_lowercase(), left.to_lowercase());
        alternation.push(regex::escape(left));
        alternation.push(regex::escape(right));
    }

    // pairs are plain words, so the escaped alternation always compiles
    let Ok(pattern) = Regex::new(&format!(r"(?i)\b({})\b", alternation.join("|"))) else {
        return text.to_string();
    };

    pattern
        .replace_all(text, |captures: &regex::Captures<'_>| {
            let matched = &captures[0];
            let replacement = match replacements.get(&matched.to_lowercase()) {
                Some(word) => word.clone(),
                None => return matched.to_string(),
            };
            if matched.chars().next().is_some_and(char::is_uppercase) {
                capitalize(&replacement)
            } else {
                replacement
            }
        })
        .to_string()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Arguments of the swapped-words API.
#[derive(Debug, PartialEq)]
struct SwapArgs {
    text: String,
    config: Option<String>,
    return_config: bool,
}

impl Structured for SwapArgs {
    const SCHEMA: &'static Schema = &Schema {
        name: "SwapArgs",
        fields: &[
            Field::required("text", Kind::Str),
            Field::optional("config", Kind::Optional(&Kind::Str), DefaultTo::Null),
            Field::optional("return_config", Kind::Bool, DefaultTo::Bool(false)),
        ],
    };

    fn from_parsed(fields: &BTreeMap<String, Value>) -> Result<Self, ParseError> {
        Ok(Self {
            text: field_str(fields, "text")?,
            config: field_opt_str(fields, "config")?,
            return_config: field_bool(fields, "return_config")?,
        })
    }
}

fn swapped_words_page(_request: &PageRequest<'_>) -> Result<PageResponse, PageError> {
    Ok(PageResponse::html(format!(
        "<h1>Vertauschte Wörter</h1>\
         <form action=\"/api/vertauschte-woerter\" method=\"get\">\
         <textarea name=\"text\"></textarea>\
         <button>Vertauschen</button></form>\
         <pre>{DEFAULT_CONFIG}</pre>"
    )))
}

fn swapped_words_api(request: &PageRequest<'_>) -> Result<PageResponse, PageError> {
    let args: SwapArgs = parse_request_args(&request.arguments)?;
    if args.text.len() > MAX_CHAR_COUNT {
        return Err(PageError::BadRequest(format!(
            "the text may not be longer than {MAX_CHAR_COUNT} chars"
        )));
    }

    let config = args.config.as_deref().unwrap_or(DEFAULT_CONFIG);
    let pairs =
        parse_config(config).map_err(|err| PageError::BadRequest(err.to_string()))?;
    let swapped = swap_words(&args.text, &pairs);

    let mut reply = serde_json::json!({ "text": swapped });
    if args.return_config {
        reply["config"] = serde_json::json!(config);
    }
    Ok(PageResponse::json(reply.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_pairs() -> Vec<(String, String)> {
        parse_config(DEFAULT_CONFIG).unwrap()
    }

    #[test]
    fn test_descriptor_builds() {
        let info = module_info().unwrap();
        assert_eq!(info.path(), Some("/vertauschte-woerter"));
        assert_eq!(info.handlers.len(), 3);
        assert_eq!(info.sub_pages.len(), 1);
    }

    #[test]
    fn test_parse_config() {
        let pairs = parse_config("a <=> b\n# comment\n\nc<=>d").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "b".to_string()),
                ("c".to_string(), "d".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_config_rejects_bad_lines() {
        let err = parse_config("a <=> b\nbroken line").unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(parse_config("a <=> ").is_err());
    }

    #[test]
    fn test_swap_words_both_directions() {
        let pairs = default_pairs();
        assert_eq!(swap_words("links und unten", &pairs), "rechts und oben");
        assert_eq!(swap_words("rechts", &pairs), "links");
    }

    #[test]
    fn test_swap_words_preserves_capital() {
        let pairs = default_pairs();
        assert_eq!(swap_words("Links ist gut", &pairs), "Rechts ist böse");
        assert_eq!(swap_words("Das Känguru", &pairs), "Das Pinguin");
    }

    #[test]
    fn test_swap_words_whole_words_only() {
        let pairs = default_pairs();
        assert_eq!(swap_words("linkshänder", &pairs), "linkshänder");
    }

    #[test]
    fn test_api_swaps_text() {
        let mut args = BTreeMap::new();
        args.insert("text".to_string(), "gut".to_string());
        let request = PageRequest {
            path: "/api/vertauschte-woerter",
            arguments: args,
            captures: Vec::new(),
            module_info: None,
            module_infos: &[],
        };
        let response = swapped_words_api(&request).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(parsed["text"], "böse");
        assert!(parsed.get("config").is_none());
    }

    #[test]
    fn test_api_missing_text_is_bad_request() {
        let request = PageRequest {
            path: "/api/vertauschte-woerter",
            arguments: BTreeMap::new(),
            captures: Vec::new(),
            module_info: None,
            module_infos: &[],
        };
        let err = swapped_words_api(&request).unwrap_err();
        assert!(matches!(err, PageError::BadRequest(ref msg)
            if msg.contains("text")));
    }

    #[test]
    fn test_api_returns_config_on_request() {
        let mut args = BTreeMap::new();
        args.insert("text".to_string(), "oben".to_string());
        args.insert("return_config".to_string(), "sure".to_string());
        let request = PageRequest {
            path: "/api/vertauschte-woerter",
            arguments: args,
            captures: Vec::new(),
            module_info: None,
            module_infos: &[],
        };
        let response = swapped_words_api(&request).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(parsed["text"], "unten");
        assert!(parsed["config"].is_string());
    }
}

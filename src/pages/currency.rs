//! The currency converter between Euro and D-Mark.

use std::collections::BTreeMap;

use crate::modules::info::{ModuleInfo, PageInfo};
use crate::modules::loader::ModuleError;
use crate::parsing::parse::{
    field_opt_float, parse_request_args, ParseError, Structured,
};
use crate::parsing::schema::{DefaultTo, Field, Kind, Schema};
use crate::parsing::value::Value;
use crate::routing::rule::{PageError, PageRequest, PageResponse, RoutingRule};

pub fn module_info() -> Result<ModuleInfo, ModuleError> {
    Ok(ModuleInfo {
        page: PageInfo::new(
            "Währungsrechner",
            "Ein Währungsrechner für Euro und D-Mark",
        )
        .with_path("/waehrungs-rechner")
        .with_keywords(&["Währungsrechner", "Euro", "Mark", "D-Mark"]),
        handlers: vec![
            RoutingRule::page("/waehrungs-rechner/?", converter_page),
            RoutingRule::page("/api/waehrungs-rechner/?", converter_api),
        ],
        aliases: vec![
            "/waehrungsrechner".to_string(),
            "/currency-converter".to_string(),
        ],
        ..Default::default()
    })
}

/// The fixed conversion rate of the Deutsche Mark.
const MARK_PER_EURO: f64 = 1.95583;

#[derive(Debug, PartialEq)]
struct ConverterArgs {
    euro: Option<f64>,
    mark: Option<f64>,
}

impl Structured for ConverterArgs {
    const SCHEMA: &'static Schema = &Schema {
        name: "ConverterArgs",
        fields: &[
            Field::optional("euro", Kind::Optional(&Kind::Float), DefaultTo::Null),
            Field::optional("mark", Kind::Optional(&Kind::Float), DefaultTo::Null),
        ],
    };

    fn from_parsed(fields: &BTreeMap<String, Value>) -> Result<Self, ParseError> {
        Ok(Self {
            euro: field_opt_float(fields, "euro")?,
            mark: field_opt_float(fields, "mark")?,
        })
    }
}

impl ConverterArgs {
    /// Resolve to a (euro, mark) pair; euro wins when both are given,
    /// one euro is the default when neither is.
    fn amounts(&self) -> (f64, f64) {
        match (self.euro, self.mark) {
            (Some(euro), _) => (euro, euro * MARK_PER_EURO),
            (None, Some(mark)) => (mark / MARK_PER_EURO, mark),
            (None, None) => (1.0, MARK_PER_EURO),
        }
    }
}

fn converter_page(request: &PageRequest<'_>) -> Result<PageResponse, PageError> {
    let args: ConverterArgs = parse_request_args(&request.arguments)?;
    let (euro, mark) = args.amounts();
    Ok(PageResponse::html(format!(
        "<h1>Währungsrechner</h1>\
         <p>{euro:.2} € = {mark:.2} DM</p>\
         <form method=\"get\">\
         <input name=\"euro\" value=\"{euro}\">\
         <input name=\"mark\" value=\"{mark}\">\
         </form>"
    )))
}

fn converter_api(request: &PageRequest<'_>) -> Result<PageResponse, PageError> {
    let args: ConverterArgs = parse_request_args(&request.arguments)?;
    let (euro, mark) = args.amounts();
    let reply = serde_json::json!({ "euro": euro, "mark": mark });
    Ok(PageResponse::json(reply.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with(args: &[(&str, &str)]) -> PageRequest<'static> {
        PageRequest {
            path: "/waehrungs-rechner",
            arguments: args
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            captures: Vec::new(),
            module_info: None,
            module_infos: &[],
        }
    }

    #[test]
    fn test_descriptor() {
        let info = module_info().unwrap();
        assert_eq!(info.path(), Some("/waehrungs-rechner"));
        assert_eq!(info.aliases.len(), 2);
    }

    #[test]
    fn test_euro_to_mark() {
        let response = converter_api(&request_with(&[("euro", "2")])).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(parsed["euro"], 2.0);
        assert_eq!(parsed["mark"], 2.0 * MARK_PER_EURO);
    }

    #[test]
    fn test_mark_to_euro() {
        let response =
            converter_api(&request_with(&[("mark", "1.95583")])).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(parsed["euro"], 1.0);
    }

    #[test]
    fn test_decimal_strings_keep_their_fraction() {
        // "0.5" parses as a genuine decimal, not a truncated int
        let response = converter_api(&request_with(&[("euro", "0.5")])).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(parsed["euro"], 0.5);
    }

    #[test]
    fn test_no_arguments_defaults_to_one_euro() {
        let response = converter_api(&request_with(&[])).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(parsed["euro"], 1.0);
        assert_eq!(parsed["mark"], MARK_PER_EURO);
    }

    #[test]
    fn test_garbage_amount_is_bad_request() {
        let result = converter_api(&request_with(&[("euro", "spam")]));
        assert!(matches!(result, Err(PageError::BadRequest(_))));
    }
}

//! The page with wrong quotes: real quotes attributed to real, but
//! wrong, authors.

use crate::modules::info::{ModuleInfo, PageInfo};
use crate::modules::loader::ModuleError;
use crate::routing::rule::{PageError, PageRequest, PageResponse, RoutingRule};

pub fn module_info() -> Result<ModuleInfo, ModuleError> {
    Ok(ModuleInfo {
        page: PageInfo::new(
            "Zitate",
            "Eine Sammlung von falsch zugeordneten Zitaten",
        )
        .with_path("/zitate")
        .with_keywords(&["Zitate", "falsch", "Känguru"]),
        handlers: vec![
            RoutingRule::page("/zitate/?", quote_page),
            RoutingRule::page("/zitate/([0-9]+)-([0-9]+)/?", quote_page),
            RoutingRule::page("/api/zitate/([0-9]+)-([0-9]+)/?", quote_api),
        ],
        aliases: vec!["/quotes".to_string()],
        ..Default::default()
    })
}

const QUOTES: &[&str] = &[
    "Nichts ist so, wie es scheint.",
    "Das Leben ist kein Ponyhof.",
    "Der Weg ist das Ziel.",
];

const AUTHORS: &[&str] = &["Marie Curie", "Das Känguru", "Albert Einstein"];

struct WrongQuote {
    quote_id: usize,
    author_id: usize,
}

impl WrongQuote {
    fn resolve(quote_id: usize, author_id: usize) -> Result<Self, PageError> {
        if quote_id >= QUOTES.len() || author_id >= AUTHORS.len() {
            return Err(PageError::NotFound);
        }
        Ok(Self {
            quote_id,
            author_id,
        })
    }

    fn quote(&self) -> &'static str {
        QUOTES[self.quote_id]
    }

    fn author(&self) -> &'static str {
        AUTHORS[self.author_id]
    }
}

fn ids_from_captures(captures: &[String]) -> Result<(usize, usize), PageError> {
    let parse = |text: &str| {
        text.parse::<usize>()
            .map_err(|_| PageError::BadRequest(format!("'{text}' is not a valid id")))
    };
    match captures {
        [quote, author] => Ok((parse(quote)?, parse(author)?)),
        // no ids in the path: start with the first combination
        _ => Ok((0, 0)),
    }
}

fn quote_page(request: &PageRequest<'_>) -> Result<PageResponse, PageError> {
    let (quote_id, author_id) = ids_from_captures(&request.captures)?;
    let wrong_quote = WrongQuote::resolve(quote_id, author_id)?;
    Ok(PageResponse::html(format!(
        "<blockquote>»{}«</blockquote><p>- {}</p>\
         <a href=\"/zitate/{}-{}\">Nächstes Zitat</a>",
        wrong_quote.quote(),
        wrong_quote.author(),
        (quote_id + 1) % QUOTES.len(),
        (author_id + 1) % AUTHORS.len(),
    )))
}

fn quote_api(request: &PageRequest<'_>) -> Result<PageResponse, PageError> {
    let (quote_id, author_id) = ids_from_captures(&request.captures)?;
    let wrong_quote = WrongQuote::resolve(quote_id, author_id)?;
    let reply = serde_json::json!({
        "id": format!("{quote_id}-{author_id}"),
        "quote": wrong_quote.quote(),
        "author": wrong_quote.author(),
    });
    Ok(PageResponse::json(reply.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn request_with_captures(captures: &[&str]) -> PageRequest<'static> {
        PageRequest {
            path: "/zitate",
            arguments: BTreeMap::new(),
            captures: captures.iter().map(|c| c.to_string()).collect(),
            module_info: None,
            module_infos: &[],
        }
    }

    #[test]
    fn test_descriptor() {
        let info = module_info().unwrap();
        assert_eq!(info.path(), Some("/zitate"));
        assert_eq!(info.handlers.len(), 3);
        assert_eq!(info.aliases, vec!["/quotes".to_string()]);
    }

    #[test]
    fn test_quote_page_without_ids() {
        let response = quote_page(&request_with_captures(&[])).unwrap();
        assert!(response.body.contains(QUOTES[0]));
        assert!(response.body.contains(AUTHORS[0]));
    }

    #[test]
    fn test_quote_page_with_ids() {
        let response = quote_page(&request_with_captures(&["1", "2"])).unwrap();
        assert!(response.body.contains(QUOTES[1]));
        assert!(response.body.contains(AUTHORS[2]));
    }

    #[test]
    fn test_unknown_ids_are_not_found() {
        let result = quote_page(&request_with_captures(&["99", "0"]));
        assert!(matches!(result, Err(PageError::NotFound)));
    }

    #[test]
    fn test_api_reply() {
        let response = quote_api(&request_with_captures(&["2", "1"])).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(parsed["id"], "2-1");
        assert_eq!(parsed["quote"], QUOTES[2]);
        assert_eq!(parsed["author"], AUTHORS[1]);
    }
}

//! A page with a list of services that are cool and hosted by us.

use crate::modules::info::{ModuleInfo, PageInfo};
use crate::modules::loader::ModuleError;
use crate::routing::rule::{PageError, PageRequest, PageResponse, RoutingRule};

pub fn module_info() -> Result<ModuleInfo, ModuleError> {
    Ok(ModuleInfo {
        page: PageInfo::new(
            "Service-Liste",
            "Liste von coolen Services des Asozialen Netzwerks",
        )
        .with_path("/services")
        .with_keywords(&["Service", "Liste"]),
        handlers: vec![RoutingRule::page("/services/?", services_page)],
        aliases: vec!["/services-list".to_string()],
        ..Default::default()
    })
}

struct Service {
    title: &'static str,
    text: &'static str,
    infos: &'static [(&'static str, &'static str)],
}

impl Service {
    fn to_html(&self) -> String {
        let mut html = format!("<h2>{}</h2>{}", self.title, self.text);
        if !self.infos.is_empty() {
            html.push_str("<table class='table'><tbody>");
            for (key, value) in self.infos {
                html.push_str(&format!("<tr><td>{key}</td><td>{value}</td></tr>"));
            }
            html.push_str("</tbody></table>");
        }
        html
    }
}

const SERVICES: &[Service] = &[
    Service {
        title: "Minceraft-Server",
        text: "Der Survival-Minceraft-Server funktioniert auch ohne einen \
               Minceraft-Account.",
        infos: &[
            ("Domain", "minceraft.example.org"),
            ("Version", "1.15.2 (1.7-1.18 wird unterstützt)"),
        ],
    },
    Service {
        title: "SuperTuxKart-Server",
        text: "Der SuperTuxKart-Server ist durchgehend online.",
        infos: &[("Domain", "stk.example.org")],
    },
    Service {
        title: "Syncplay-Server",
        text: "Mit dem Syncplay-Server kann man online zusammen Sachen gucken.",
        infos: &[("Domain", "syncplay.example.org:8999")],
    },
];

fn services_page(_request: &PageRequest<'_>) -> Result<PageResponse, PageError> {
    let list = SERVICES
        .iter()
        .map(Service::to_html)
        .collect::<Vec<_>>()
        .join("\n");
    Ok(PageResponse::html(list))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_descriptor() {
        let info = module_info().unwrap();
        assert_eq!(info.path(), Some("/services"));
        assert_eq!(info.aliases, vec!["/services-list".to_string()]);
    }

    #[test]
    fn test_service_to_html() {
        let html = SERVICES[0].to_html();
        assert!(html.starts_with("<h2>Minceraft-Server</h2>"));
        assert!(html.contains("<td>Domain</td>"));
    }

    #[test]
    fn test_services_page_lists_everything() {
        let request = PageRequest {
            path: "/services",
            arguments: BTreeMap::new(),
            captures: Vec::new(),
            module_info: None,
            module_infos: &[],
        };
        let response = services_page(&request).unwrap();
        for service in SERVICES {
            assert!(response.body.contains(service.title));
        }
    }
}

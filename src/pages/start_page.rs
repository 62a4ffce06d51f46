//! The start page, linking to every other module.

use crate::modules::info::{ModuleInfo, PageInfo};
use crate::modules::loader::ModuleError;
use crate::routing::rule::{PageError, PageRequest, PageResponse, RoutingRule};

pub fn module_info() -> Result<ModuleInfo, ModuleError> {
    Ok(ModuleInfo {
        page: PageInfo::new("Startseite", "Die Hauptseite der Webseite")
            .with_path("/")
            .with_keywords(&["Startseite", "Start"]),
        handlers: vec![RoutingRule::page("/", start_page)],
        ..Default::default()
    })
}

fn start_page(request: &PageRequest<'_>) -> Result<PageResponse, PageError> {
    let mut items = String::new();
    for info in request.module_infos {
        let Some(path) = info.path() else {
            continue;
        };
        if path == "/" {
            continue;
        }
        items.push_str(&format!(
            "<li><a href=\"{path}\">{}</a>: {}</li>\n",
            info.name(),
            info.description(),
        ));
    }
    Ok(PageResponse::html(format!("<ul>\n{items}</ul>\n")))
}

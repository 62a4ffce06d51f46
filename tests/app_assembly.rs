//! End-to-end assembly tests: from a config to a serving application.

use std::collections::BTreeMap;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use sammelsurium::config::schema::{RunMode, ServerConfig};
use sammelsurium::http::app::make_app;
use sammelsurium::http::server::HttpServer;
use sammelsurium::routing::rule::{Handler, PageRequest};
use sammelsurium::routing::table::expand_target;

#[test]
fn test_default_config_assembles_in_dev_mode() {
    // development mode turns any registry contract violation into an
    // assembly error, so this doubles as a registry health check
    let app = make_app(&ServerConfig::default(), RunMode::Development).unwrap();
    assert!(app.module_infos.len() >= 5);
    assert_eq!(app.module_infos[0].path(), Some("/"));
}

#[test]
fn test_start_page_serves_module_links() {
    let app = make_app(&ServerConfig::default(), RunMode::Development).unwrap();
    let matched = app.table.match_path("/").unwrap();
    let Handler::Page(handler) = matched.rule.handler else {
        panic!("expected a page handler on /");
    };

    let request = PageRequest {
        path: "/",
        arguments: BTreeMap::new(),
        captures: matched.captures.clone(),
        module_info: matched
            .rule
            .settings
            .as_ref()
            .and_then(|settings| settings.module_info.as_ref()),
        module_infos: &app.module_infos,
    };
    let response = handler(&request).unwrap();
    assert!(response.body.contains("/services"));
    assert!(response.body.contains("/zitate"));
}

#[test]
fn test_swapped_words_api_through_the_table() {
    let app = make_app(&ServerConfig::default(), RunMode::Development).unwrap();
    let matched = app.table.match_path("/api/vertauschte-woerter").unwrap();
    let Handler::Page(handler) = matched.rule.handler else {
        panic!("expected a page handler");
    };

    let mut arguments = BTreeMap::new();
    arguments.insert("text".to_string(), "links ist gut".to_string());
    let request = PageRequest {
        path: "/api/vertauschte-woerter",
        arguments,
        captures: matched.captures.clone(),
        module_info: None,
        module_infos: &app.module_infos,
    };
    let response = handler(&request).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(parsed["text"], "rechts ist böse");
}

#[test]
fn test_alias_and_api_fallbacks_resolve() {
    let app = make_app(&ServerConfig::default(), RunMode::Development).unwrap();

    for (path, expected) in [
        ("/services-list", "/services"),
        ("/SOUNDBOARD/muk", "/kaenguru-soundboard/muk"),
        ("/zitate/api", "/api/zitate"),
        ("/api", "/api/endpunkte"),
    ] {
        let matched = app.table.match_path(path).unwrap();
        let Handler::Redirect { ref target } = matched.rule.handler else {
            panic!("expected a redirect for {path}");
        };
        assert_eq!(expand_target(target, &matched.captures), expected, "{path}");
    }
}

async fn spawn_server() -> std::net::SocketAddr {
    let config = ServerConfig::default();
    let application = make_app(&config, RunMode::Development).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(application, config, RunMode::Development);
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    addr
}

async fn fetch(addr: std::net::SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(
            format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
                .as_bytes(),
        )
        .await
        .unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

#[tokio::test]
async fn test_served_start_page() {
    let addr = spawn_server().await;
    let response = fetch(addr, "/").await;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("<title>Startseite</title>"));
    assert!(response.contains("/kaenguru-soundboard"));
}

#[tokio::test]
async fn test_served_alias_redirect() {
    let addr = spawn_server().await;
    let response = fetch(addr, "/services-list/spam").await;
    assert!(response.starts_with("HTTP/1.1 301"));
    assert!(response.contains("location: /services/spam"));
}

#[tokio::test]
async fn test_served_bad_request_from_parser() {
    let addr = spawn_server().await;
    // missing the required text argument
    let response = fetch(addr, "/api/vertauschte-woerter").await;
    assert!(response.starts_with("HTTP/1.1 400"));
    assert!(response.contains("text"));
}

#[tokio::test]
async fn test_served_unknown_path_is_404() {
    let addr = spawn_server().await;
    let response = fetch(addr, "/does-not-exist").await;
    assert!(response.starts_with("HTTP/1.1 404"));
}

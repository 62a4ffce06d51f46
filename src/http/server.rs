//! HTTP server setup and dispatch.
//!
//! # Responsibilities
//! - Create the axum router with the catch-all dispatch handler
//! - Wire up middleware (tracing, request timeout)
//! - Serve redirects, pages and static files from the routing table
//! - Rebuild and atomically swap the Application on SIGHUP
//! - Graceful shutdown on ctrl-c

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::schema::{RunMode, ServerConfig};
use crate::http::app::{make_app, Application};
use crate::routing::rule::{Handler, PageError, PageRequest};
use crate::routing::table::expand_target;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// State injected into the dispatch handler.
#[derive(Clone)]
struct AppState {
    app: Arc<ArcSwap<Application>>,
}

/// HTTP server for the website.
pub struct HttpServer {
    app: Arc<ArcSwap<Application>>,
    config: ServerConfig,
    mode: RunMode,
}

impl HttpServer {
    pub fn new(application: Application, config: ServerConfig, mode: RunMode) -> Self {
        Self {
            app: Arc::new(ArcSwap::from_pointee(application)),
            config,
            mode,
        }
    }

    /// Build the axum router with all middleware layers.
    fn build_router(&self) -> Router {
        let state = AppState {
            app: self.app.clone(),
        };
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        self.spawn_reload_task();

        let app = self.build_router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Rebuild the whole application on SIGHUP and swap it in
    /// atomically; a failing rebuild keeps the old table serving.
    fn spawn_reload_task(&self) {
        let app = self.app.clone();
        let config = self.config.clone();
        let mode = self.mode;
        tokio::spawn(async move {
            let Ok(mut hangup) =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup())
            else {
                tracing::error!("failed to install SIGHUP handler, reload disabled");
                return;
            };
            while hangup.recv().await.is_some() {
                match make_app(&config, mode) {
                    Ok(rebuilt) => {
                        app.store(Arc::new(rebuilt));
                        tracing::info!("application reloaded");
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "reload failed, keeping old application");
                    }
                }
            }
        });
    }
}

/// The catch-all handler: look up the path in the routing table and
/// serve whatever the matched rule says.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let app = state.app.load();
    let path = request.uri().path().to_string();

    let Some(matched) = app.table.match_path(&path) else {
        tracing::debug!(path = %path, "no route matched");
        return (StatusCode::NOT_FOUND, "404 Not Found").into_response();
    };

    match matched.rule.handler {
        Handler::Redirect { ref target } => {
            let location = expand_target(target, &matched.captures);
            redirect_response(&location)
        }
        Handler::StaticFiles { ref root } => {
            serve_static(root, matched.captures.first().map(String::as_str)).await
        }
        Handler::Page(handler) => {
            let arguments = query_arguments(request.uri().query());
            let page_request = PageRequest {
                path: &path,
                arguments,
                captures: matched.captures.clone(),
                module_info: matched
                    .rule
                    .settings
                    .as_ref()
                    .and_then(|settings| settings.module_info.as_ref()),
                module_infos: &app.module_infos,
            };
            match handler(&page_request) {
                Ok(page) => {
                    let body = if page.content_type.starts_with("text/html") {
                        frame_html(&page.body, &page_request)
                    } else {
                        page.body
                    };
                    (
                        [(header::CONTENT_TYPE, page.content_type)],
                        body,
                    )
                        .into_response()
                }
                Err(PageError::BadRequest(message)) => {
                    (StatusCode::BAD_REQUEST, message).into_response()
                }
                Err(PageError::NotFound) => {
                    (StatusCode::NOT_FOUND, "404 Not Found").into_response()
                }
            }
        }
    }
}

fn redirect_response(location: &str) -> Response {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, location.to_string())],
        format!("redirecting to {location}"),
    )
        .into_response()
}

/// Reduce the query string to a last-value-wins argument map.
fn query_arguments(query: Option<&str>) -> BTreeMap<String, String> {
    let mut arguments = BTreeMap::new();
    if let Some(query) = query {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            arguments.insert(key.into_owned(), value.into_owned());
        }
    }
    arguments
}

/// Wrap a page body in the shared HTML frame, using the owning
/// descriptor for title, description and keywords.
fn frame_html(body: &str, request: &PageRequest<'_>) -> String {
    let Some(info) = request.module_info else {
        return body.to_string();
    };
    let page = info.get_page_info(request.path);
    format!(
        "<!DOCTYPE html>\n<html lang=\"de\">\n<head>\n\
         <title>{title}</title>\n\
         <meta name=\"description\" content=\"{description}\">\n\
         <meta name=\"keywords\" content=\"{keywords}\">\n\
         </head>\n<body>\n{body}\n</body>\n</html>\n",
        title = page.name,
        description = page.description,
        keywords = info.keywords_for(request.path),
    )
}

/// Serve a file from below the static root; anything trying to climb
/// out of it is rejected.
async fn serve_static(root: &Path, relative: Option<&str>) -> Response {
    let Some(relative) = relative.filter(|r| !r.is_empty()) else {
        return (StatusCode::NOT_FOUND, "404 Not Found").into_response();
    };
    let relative_path = PathBuf::from(relative);
    if relative_path
        .components()
        .any(|component| !matches!(component, Component::Normal(_)))
    {
        return (StatusCode::NOT_FOUND, "404 Not Found").into_response();
    }

    let full_path = root.join(relative_path);
    match tokio::fs::read(&full_path).await {
        Ok(contents) => (
            [(header::CONTENT_TYPE, content_type_for(&full_path))],
            contents,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("ico") => "image/x-icon",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("txt") => "text/plain",
        Some("mp3") => "audio/mpeg",
        _ => "application/octet-stream",
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_arguments_last_value_wins() {
        let arguments = query_arguments(Some("a=1&b=2&a=3"));
        assert_eq!(arguments.get("a").map(String::as_str), Some("3"));
        assert_eq!(arguments.get("b").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_query_arguments_decoded() {
        let arguments = query_arguments(Some("text=ein%20Wort&x=a%2Bb"));
        assert_eq!(
            arguments.get("text").map(String::as_str),
            Some("ein Wort")
        );
        assert_eq!(arguments.get("x").map(String::as_str), Some("a+b"));
    }

    #[test]
    fn test_query_arguments_empty() {
        assert!(query_arguments(None).is_empty());
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for(Path::new("style/main.css")), "text/css");
        assert_eq!(
            content_type_for(Path::new("unknown.bin")),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn test_serve_static_rejects_traversal() {
        let response = serve_static(Path::new("static"), Some("../Cargo.toml")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_serve_static_missing_file() {
        let response = serve_static(Path::new("static"), Some("nope.css")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

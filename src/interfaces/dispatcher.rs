//! Transport-independent request handling for the public site.
//!
//! The actix default service converts each unclaimed request into a
//! [`SiteRequest`] and writes the returned [`SiteResponse`] back. The
//! serverless and CGI adapters reuse the same two types at their edges.

use actix_web::http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::{
    errors::AppError,
    handlers::{assets, pages},
    AppState,
};

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone)]
pub struct SiteRequest {
    pub method: Method,
    pub scheme: String,
    pub host: String,
    pub path: String,
    pub query: String,
    /// Header names are stored lowercase.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl SiteRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        SiteRequest {
            method,
            scheme: "http".to_string(),
            host: "localhost".to_string(),
            path: path.into(),
            query: String::new(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_ascii_lowercase(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }

    /// True when the client asked for JSON instead of rendered HTML.
    pub fn prefers_json(&self) -> bool {
        self.header("accept")
            .map(|accept| {
                accept.split(',').any(|item| {
                    let mime = item.split(';').next().unwrap_or("").trim();
                    mime == JSON_CONTENT_TYPE || mime.ends_with("+json")
                })
            })
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiteResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl SiteResponse {
    pub fn new(status: StatusCode, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        SiteResponse {
            status,
            headers: vec![("content-type".to_string(), content_type.to_string())],
            body: body.into(),
        }
    }

    pub fn html(status: StatusCode, body: String) -> Self {
        SiteResponse::new(status, HTML_CONTENT_TYPE, body)
    }

    pub fn json(status: StatusCode, value: &Value) -> Self {
        SiteResponse::new(status, JSON_CONTENT_TYPE, value.to_string())
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_ascii_lowercase(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// `"200 OK"`, as CGI and WSGI expect it.
    pub fn status_line(&self) -> String {
        format!(
            "{} {}",
            self.status.as_u16(),
            self.status.canonical_reason().unwrap_or("Unknown")
        )
    }

    /// Textual bodies are sent as-is; anything else needs base64 in proxy responses.
    pub fn is_text(&self) -> bool {
        self.header("content-type")
            .map(|ct| {
                let ct = ct.to_ascii_lowercase();
                ct.starts_with("text/")
                    || ct.contains("json")
                    || ct.contains("javascript")
                    || ct.contains("xml")
                    || ct.starts_with("image/svg")
            })
            .unwrap_or(true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    About,
    Contact,
    Students,
    ForLoop,
    Static(String),
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::About => "about",
            Route::Contact => "contact",
            Route::Students => "students",
            Route::ForLoop => "for_loop",
            Route::Static(_) => "static",
        }
    }

    pub fn allowed_methods(&self) -> &'static [Method] {
        const READ: &[Method] = &[Method::GET, Method::HEAD];
        const FORM: &[Method] = &[Method::GET, Method::HEAD, Method::POST];
        match self {
            Route::Contact | Route::ForLoop => FORM,
            _ => READ,
        }
    }

    fn is_cacheable(&self) -> bool {
        matches!(self, Route::Home | Route::About)
    }
}

/// Path pattern, methods and name of every public route, in match order.
pub const ROUTE_TABLE: &[(&str, &str, &str)] = &[
    ("/", "GET", "home"),
    ("/home/", "GET", "home"),
    ("/about/", "GET", "about"),
    ("/contact/", "GET, POST", "contact"),
    ("/students/", "GET", "students"),
    ("/for-loop/", "GET, POST", "for_loop"),
];

/// Maps a request path to a route. Trailing slashes are optional.
pub fn resolve(path: &str, static_prefix: &str) -> Option<Route> {
    let static_prefix = static_prefix.trim_end_matches('/');
    if !static_prefix.is_empty() {
        if let Some(rest) = path.strip_prefix(static_prefix).and_then(|r| r.strip_prefix('/')) {
            return (!rest.is_empty()).then(|| Route::Static(rest.to_string()));
        }
    }

    match path.trim_end_matches('/') {
        "" | "/home" => Some(Route::Home),
        "/about" => Some(Route::About),
        "/contact" => Some(Route::Contact),
        "/students" => Some(Route::Students),
        "/for-loop" => Some(Route::ForLoop),
        _ => None,
    }
}

/// Template name plus the context it renders with.
#[derive(Debug, Clone)]
pub struct PageOutcome {
    pub template: &'static str,
    pub context: Value,
}

#[derive(Serialize, Deserialize)]
struct CachedPage {
    content_type: String,
    body: String,
}

pub async fn dispatch(state: &AppState, req: SiteRequest) -> SiteResponse {
    let Some(route) = resolve(&req.path, state.config.static_files.url_prefix()) else {
        return error_page(state, &req, StatusCode::NOT_FOUND, Some(format!("No page at {}", req.path)));
    };

    if !route.allowed_methods().contains(&req.method) {
        let allow = route
            .allowed_methods()
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        return error_page(state, &req, StatusCode::METHOD_NOT_ALLOWED, None).with_header("allow", allow);
    }

    let is_head = req.method == Method::HEAD;
    let mut response = route_request(state, &req, &route).await;
    if is_head {
        response.body.clear();
    }
    response
}

async fn route_request(state: &AppState, req: &SiteRequest, route: &Route) -> SiteResponse {
    let cache_key = route
        .is_cacheable()
        .then(|| format!("page:{}:{}", route.name(), if req.prefers_json() { "json" } else { "html" }));

    if let Some(key) = &cache_key {
        if let Some(hit) = cached(state, key).await {
            return hit;
        }
    }

    let outcome = match route {
        Route::Home => pages::home(state).await,
        Route::About => pages::about(state).await,
        Route::Contact => pages::contact(state, req).await,
        Route::Students => pages::students(state).await,
        Route::ForLoop => pages::for_loop(state, req).await,
        Route::Static(relative) => return assets::serve(&state.config.static_files, relative).await,
    };

    let response = match outcome {
        Ok(outcome) => render_page(state, req, outcome),
        Err(e) => return app_error_page(state, req, e),
    };

    if let Some(key) = cache_key {
        if response.status == StatusCode::OK {
            store(state, &key, &response).await;
        }
    }
    response
}

async fn cached(state: &AppState, key: &str) -> Option<SiteResponse> {
    let bytes = state.cache.get(key).await?;
    let page: CachedPage = serde_json::from_slice(&bytes)
        .map_err(|e| tracing::warn!("Discarding unreadable cache entry {}: {}", key, e))
        .ok()?;
    tracing::debug!(key, "Page served from cache");
    Some(SiteResponse::new(StatusCode::OK, &page.content_type, page.body))
}

async fn store(state: &AppState, key: &str, response: &SiteResponse) {
    let page = CachedPage {
        content_type: response.header("content-type").unwrap_or(HTML_CONTENT_TYPE).to_string(),
        body: String::from_utf8_lossy(&response.body).into_owned(),
    };
    if let Ok(bytes) = serde_json::to_vec(&page) {
        let ttl = Duration::from_secs(state.config.cache.timeout_seconds);
        state.cache.set(key, bytes, ttl).await;
    }
}

pub fn render_page(state: &AppState, req: &SiteRequest, outcome: PageOutcome) -> SiteResponse {
    if req.prefers_json() {
        return SiteResponse::json(StatusCode::OK, &outcome.context);
    }

    match state.renderer.render(outcome.template, &outcome.context) {
        Ok(body) => SiteResponse::html(StatusCode::OK, body),
        Err(e) => {
            tracing::error!(template = outcome.template, "Template render error: {}", e);
            let detail = state.config.is_debug().then(|| e.to_string());
            error_page(state, req, StatusCode::INTERNAL_SERVER_ERROR, detail)
        }
    }
}

fn app_error_page(state: &AppState, req: &SiteRequest, err: AppError) -> SiteResponse {
    use actix_web::ResponseError;

    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!(path = %req.path, "Page failed: {}", err);
    }
    let detail = state.config.is_debug().then(|| err.to_string());
    error_page(state, req, status, detail)
}

/// Default error page. Details are only shown in debug mode.
pub fn error_page(state: &AppState, req: &SiteRequest, status: StatusCode, detail: Option<String>) -> SiteResponse {
    let title = status.canonical_reason().unwrap_or("Error");
    let detail = detail.filter(|_| state.config.is_debug());

    if req.prefers_json() {
        let mut body = json!({ "error": title, "status": status.as_u16() });
        if let Some(detail) = &detail {
            body["detail"] = json!(detail);
        }
        return SiteResponse::json(status, &body);
    }

    let context = json!({
        "site": pages::site_stub(),
        "static_url": state.config.static_files.url_prefix(),
        "status": status.as_u16(),
        "title": title,
        "detail": detail,
    });

    match state.renderer.render("error", &context) {
        Ok(body) => SiteResponse::html(status, body),
        Err(e) => {
            tracing::error!("Error page failed to render: {}", e);
            SiteResponse::new(status, "text/plain; charset=utf-8", format!("{} {}", status.as_u16(), title))
        }
    }
}

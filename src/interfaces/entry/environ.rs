use std::collections::HashMap;

use actix_web::http::{Method, StatusCode};

use super::SiteService;
use crate::dispatcher::{SiteRequest, SiteResponse};

/// Builds a request from CGI/WSGI style variables.
pub fn site_request_from_environ(environ: &HashMap<String, String>, body: Vec<u8>) -> Option<SiteRequest> {
    let var = |name: &str| environ.get(name).map(String::as_str).filter(|v| !v.is_empty());

    let method = Method::from_bytes(var("REQUEST_METHOD").unwrap_or("GET").as_bytes()).ok()?;
    let mut request = SiteRequest::new(method, var("PATH_INFO").unwrap_or("/"));
    request.query = var("QUERY_STRING").unwrap_or_default().to_string();

    for (name, value) in environ {
        if let Some(header) = name.strip_prefix("HTTP_") {
            request.headers.push((header.replace('_', "-").to_ascii_lowercase(), value.clone()));
        }
    }
    if let Some(content_type) = var("CONTENT_TYPE") {
        request.headers.push(("content-type".to_string(), content_type.to_string()));
    }
    if let Some(length) = var("CONTENT_LENGTH") {
        request.headers.push(("content-length".to_string(), length.to_string()));
    }

    request.scheme = match var("wsgi.url_scheme") {
        Some(scheme) => scheme.to_string(),
        None if var("HTTPS").is_some_and(|v| v.eq_ignore_ascii_case("on")) => "https".to_string(),
        None => "http".to_string(),
    };
    request.host = match (var("HTTP_HOST"), var("SERVER_NAME")) {
        (Some(host), _) => host.to_string(),
        (None, Some(server)) => match var("SERVER_PORT") {
            Some(port) if port != "80" && port != "443" => format!("{server}:{port}"),
            _ => server.to_string(),
        },
        (None, None) => String::new(),
    };
    request.body = body;
    Some(request)
}

/// Handles one CGI/WSGI style call. `start_response` receives the status line
/// and headers before the body is returned.
pub async fn call_environ<F>(
    service: &SiteService,
    environ: &HashMap<String, String>,
    body: Vec<u8>,
    start_response: F,
) -> Vec<u8>
where
    F: FnOnce(&str, &[(String, String)]),
{
    let response = match site_request_from_environ(environ, body) {
        Some(request) => service.call(request).await,
        None => {
            tracing::warn!(method = ?environ.get("REQUEST_METHOD"), "Invalid request method in environment");
            SiteResponse::new(StatusCode::BAD_REQUEST, "text/plain; charset=utf-8", "Bad Request (400)")
        }
    };

    let mut headers = response.headers.clone();
    headers.push(("content-length".to_string(), response.body.len().to_string()));
    start_response(&response.status_line(), &headers);
    response.body
}

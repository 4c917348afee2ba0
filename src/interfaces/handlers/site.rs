use actix_web::{
    http::header::{HeaderName, HeaderValue},
    web, HttpRequest, HttpResponse,
};

use crate::{
    dispatcher::{self, SiteRequest, SiteResponse},
    AppState,
};

/// Converts an actix request into the transport-neutral shape.
pub fn site_request(req: &HttpRequest, body: &[u8]) -> SiteRequest {
    let info = req.connection_info();
    SiteRequest {
        method: req.method().clone(),
        scheme: info.scheme().to_string(),
        host: info.host().to_string(),
        path: req.path().to_string(),
        query: req.query_string().to_string(),
        headers: req
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect(),
        body: body.to_vec(),
    }
}

pub fn into_http_response(response: SiteResponse) -> HttpResponse {
    let mut builder = HttpResponse::build(response.status);
    for (name, value) in &response.headers {
        match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
            (Ok(name), Ok(value)) => {
                builder.append_header((name, value));
            }
            _ => tracing::warn!(header = %name, "Dropping unrepresentable response header"),
        }
    }
    builder.body(response.body)
}

/// Every request the admin API does not claim ends up here. Host and TLS
/// checks already ran in the middleware stack.
pub async fn dispatch(req: HttpRequest, body: web::Bytes, state: web::Data<AppState>) -> HttpResponse {
    let request = site_request(&req, &body);
    into_http_response(dispatcher::dispatch(&state, request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::{Method, StatusCode}, test::TestRequest};

    #[test]
    fn request_fields_are_copied() {
        let req = TestRequest::with_uri("/contact/?a=1")
            .method(Method::POST)
            .insert_header(("Host", "example.com"))
            .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
            .to_http_request();

        let site = site_request(&req, b"name=A");
        assert_eq!(site.method, Method::POST);
        assert_eq!(site.host, "example.com");
        assert_eq!(site.path, "/contact/");
        assert_eq!(site.query, "a=1");
        assert_eq!(site.content_type(), Some("application/x-www-form-urlencoded"));
        assert_eq!(site.body, b"name=A");
    }

    #[test]
    fn response_headers_survive_conversion() {
        let response = SiteResponse::html(StatusCode::METHOD_NOT_ALLOWED, "no".into()).with_header("allow", "GET, HEAD");
        let http = into_http_response(response);

        assert_eq!(http.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(http.headers().get("allow").and_then(|v| v.to_str().ok()), Some("GET, HEAD"));
    }
}

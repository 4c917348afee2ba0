use std::str::FromStr;

use actix_http::{Payload, Request};
use actix_service::{
    boxed::{self, BoxService},
    IntoServiceFactory, ServiceExt,
};
use actix_web::{
    body::{self, BoxBody},
    dev::{AppConfig, Service, ServiceFactory, ServiceResponse},
    http::{
        header::{self, HeaderName, HeaderValue},
        StatusCode, Uri, Version,
    },
    web, Error, HttpResponse,
};

use super::site_app;
use crate::{
    dispatcher::{SiteRequest, SiteResponse},
    errors::StartupError,
    AppState,
};

const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

/// The actix app initialized once and called without a socket, so the
/// serverless and CGI adapters see the same routes and middleware as the listener.
pub struct SiteService {
    inner: BoxService<Request, ServiceResponse<BoxBody>, Error>,
}

impl SiteService {
    pub async fn new(state: web::Data<AppState>) -> Result<Self, StartupError> {
        let service = site_app(state)
            .into_factory()
            .new_service(AppConfig::default())
            .await
            .map_err(|_| StartupError::Runtime("application service failed to initialize".into()))?;

        Ok(SiteService {
            inner: boxed::service(service.map(ServiceResponse::map_into_boxed_body)),
        })
    }

    /// Runs one request through the middleware stack and the router.
    pub async fn call(&self, req: SiteRequest) -> SiteResponse {
        let request = match into_request(req) {
            Ok(request) => request,
            Err(reason) => {
                tracing::warn!("Rejected request before routing: {}", reason);
                return SiteResponse::new(StatusCode::BAD_REQUEST, PLAIN_TEXT, "Bad Request (400)");
            }
        };

        let response = match self.inner.call(request).await {
            Ok(response) => response.into_parts().1,
            Err(err) => err.error_response(),
        };
        from_response(response).await
    }
}

fn into_request(req: SiteRequest) -> Result<Request, String> {
    let uri = Uri::from_str(&req.path_and_query()).map_err(|e| format!("invalid path: {e}"))?;
    let SiteRequest { method, scheme, host, headers, body, .. } = req;

    let mut request: Request = Request::with_payload(Payload::from(web::Bytes::from(body)));
    let head = request.head_mut();
    head.method = method;
    head.uri = uri;
    head.version = Version::HTTP_11;

    for (name, value) in &headers {
        match (HeaderName::from_str(name), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => head.headers.append(name, value),
            _ => tracing::warn!(header = %name, "Dropping unrepresentable request header"),
        }
    }

    // Without a host the default app config would stand in for one.
    if host.is_empty() {
        return Err("no host".to_string());
    }
    if !head.headers.contains_key(header::HOST) {
        let value = HeaderValue::from_str(&host).map_err(|_| format!("invalid host {host}"))?;
        head.headers.insert(header::HOST, value);
    }
    if !head.headers.contains_key("x-forwarded-proto") {
        if let Ok(value) = HeaderValue::from_str(&scheme) {
            head.headers.insert(HeaderName::from_static("x-forwarded-proto"), value);
        }
    }

    Ok(request)
}

async fn from_response(response: HttpResponse) -> SiteResponse {
    let status = response.status();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string())))
        .collect();

    match body::to_bytes(response.into_body()).await {
        Ok(bytes) => SiteResponse { status, headers, body: bytes.to_vec() },
        Err(e) => {
            tracing::error!("Failed to read response body: {}", e);
            SiteResponse::new(StatusCode::INTERNAL_SERVER_ERROR, PLAIN_TEXT, "Internal Server Error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::Method;

    #[test]
    fn host_and_scheme_become_headers() {
        let mut req = SiteRequest::new(Method::GET, "/about/");
        req.host = "example.com".into();
        req.scheme = "https".into();
        req.query = "a=1".into();

        let request = into_request(req).unwrap();
        assert_eq!(request.head().uri.to_string(), "/about/?a=1");
        assert_eq!(request.head().headers.get(header::HOST).unwrap(), "example.com");
        assert_eq!(request.head().headers.get("x-forwarded-proto").unwrap(), "https");
    }

    #[test]
    fn request_without_host_is_rejected() {
        let mut req = SiteRequest::new(Method::GET, "/");
        req.host = String::new();
        assert!(into_request(req).is_err());
    }
}

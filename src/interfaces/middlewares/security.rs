use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpResponse,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{settings::SecuritySettings, AppState};

/// Outcome of the host and TLS checks done before any routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeDecision {
    Proceed,
    DisallowedHost(String),
    RedirectTo(String),
}

/// Matches a `Host` value against the configured patterns.
/// `*` matches anything and a leading dot matches the domain and its subdomains.
pub fn host_allowed(host: &str, patterns: &[String]) -> bool {
    let hostname = strip_port(host).trim_end_matches('.').to_ascii_lowercase();
    if hostname.is_empty() {
        return false;
    }

    patterns.iter().any(|pattern| {
        let pattern = pattern.to_ascii_lowercase();
        if pattern == "*" {
            true
        } else if let Some(domain) = pattern.strip_prefix('.') {
            hostname == domain || hostname.ends_with(&pattern)
        } else {
            hostname == pattern
        }
    })
}

fn strip_port(host: &str) -> &str {
    // [::1]:8000
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

pub fn check_edge(
    security: &SecuritySettings,
    scheme: &str,
    host: &str,
    path_and_query: &str,
) -> EdgeDecision {
    if !host_allowed(host, &security.allowed_hosts) {
        return EdgeDecision::DisallowedHost(host.to_string());
    }
    if security.ssl_redirect && !scheme.eq_ignore_ascii_case("https") {
        return EdgeDecision::RedirectTo(format!("https://{host}{path_and_query}"));
    }
    EdgeDecision::Proceed
}

pub struct SecurityMiddleware;

impl<S, B> Transform<S, ServiceRequest> for SecurityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SecurityMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct SecurityMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SecurityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let decision = match req.app_data::<web::Data<AppState>>() {
                Some(state) => {
                    let info = req.connection_info().clone();
                    let path_and_query = req
                        .uri()
                        .path_and_query()
                        .map(|pq| pq.as_str().to_string())
                        .unwrap_or_else(|| req.path().to_string());
                    check_edge(&state.config.security, info.scheme(), info.host(), &path_and_query)
                }
                None => {
                    tracing::error!("AppState missing in security middleware");
                    EdgeDecision::Proceed
                }
            };

            match decision {
                EdgeDecision::Proceed => {
                    let res = service.call(req).await?;
                    Ok(res.map_into_boxed_body())
                }
                EdgeDecision::DisallowedHost(host) => {
                    tracing::warn!(host = %host, "Rejected request for disallowed host");
                    Ok(req.into_response(
                        HttpResponse::BadRequest()
                            .content_type("text/plain; charset=utf-8")
                            .body("Bad Request (400)"),
                    ))
                }
                EdgeDecision::RedirectTo(location) => Ok(req.into_response(
                    HttpResponse::MovedPermanently()
                        .insert_header((header::LOCATION, location))
                        .finish(),
                )),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn exact_hosts_ignore_port_and_case() {
        let allowed = patterns(&["localhost", "127.0.0.1"]);
        assert!(host_allowed("LOCALHOST:8000", &allowed));
        assert!(host_allowed("127.0.0.1", &allowed));
        assert!(!host_allowed("evil.com", &allowed));
    }

    #[test]
    fn leading_dot_matches_subdomains() {
        let allowed = patterns(&[".vercel.app"]);
        assert!(host_allowed("portfolio.vercel.app", &allowed));
        assert!(host_allowed("vercel.app", &allowed));
        assert!(!host_allowed("myvercel.app", &allowed));
    }

    #[test]
    fn wildcard_matches_anything_non_empty() {
        let allowed = patterns(&["*"]);
        assert!(host_allowed("anything.example", &allowed));
        assert!(!host_allowed("", &allowed));
    }

    #[test]
    fn ipv6_hosts_are_matched_without_brackets() {
        assert!(host_allowed("[::1]:8000", &patterns(&["::1"])));
    }

    #[test]
    fn plain_http_is_redirected_when_required() {
        let security = SecuritySettings {
            debug: false,
            allowed_hosts: patterns(&["example.com"]),
            ssl_redirect: true,
            secure_cookies: true,
            secret_key: String::new(),
            token_expiration_minutes: 60,
            fast_password_hashing: false,
        };

        assert_eq!(
            check_edge(&security, "http", "example.com", "/about/?a=1"),
            EdgeDecision::RedirectTo("https://example.com/about/?a=1".into())
        );
        assert_eq!(check_edge(&security, "https", "example.com", "/"), EdgeDecision::Proceed);
        assert!(matches!(
            check_edge(&security, "https", "other.com", "/"),
            EdgeDecision::DisallowedHost(_)
        ));
    }
}

use std::{collections::HashMap, rc::Rc};

use actix_web::http::Method;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use derive_more::Display;
use lambda_runtime::{service_fn, LambdaEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{EntryPoint, SiteService};
use crate::{
    dispatcher::{SiteRequest, SiteResponse},
    errors::StartupError,
    startup::Application,
};

/// Platform events that cannot be turned into a request.
#[derive(Debug, Display)]
pub enum InvocationError {
    #[display("Malformed event: {_0}")]
    MalformedEvent(String),

    #[display("Invalid base64 body: {_0}")]
    InvalidBody(String),
}

impl std::error::Error for InvocationError {}

/// What the adapter needs from the platform's invocation context.
#[derive(Debug, Clone, Default)]
pub struct InvocationContext {
    pub request_id: String,
}

impl From<&lambda_runtime::Context> for InvocationContext {
    fn from(context: &lambda_runtime::Context) -> Self {
        InvocationContext { request_id: context.request_id.clone() }
    }
}

/// API Gateway REST (payload format 1.0).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestApiEvent {
    http_method: String,
    path: String,
    #[serde(default)]
    headers: Option<HashMap<String, String>>,
    #[serde(default)]
    multi_value_query_string_parameters: Option<HashMap<String, Vec<String>>>,
    #[serde(default)]
    query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    is_base64_encoded: bool,
}

#[derive(Debug, Deserialize)]
struct HttpContext {
    method: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HttpApiRequestContext {
    http: HttpContext,
    #[serde(default)]
    domain_name: Option<String>,
}

/// API Gateway HTTP API and function URLs (payload format 2.0).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HttpApiEvent {
    raw_path: String,
    #[serde(default)]
    raw_query_string: String,
    #[serde(default)]
    headers: HashMap<String, String>,
    #[serde(default)]
    cookies: Vec<String>,
    request_context: HttpApiRequestContext,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    is_base64_encoded: bool,
}

/// The request carried inside a Vercel `Invoke` action.
#[derive(Debug, Deserialize)]
struct VercelRequest {
    method: String,
    path: String,
    #[serde(default)]
    headers: HashMap<String, String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl From<SiteResponse> for ProxyResponse {
    fn from(response: SiteResponse) -> Self {
        let is_text = response.is_text();
        let body = if is_text {
            String::from_utf8_lossy(&response.body).into_owned()
        } else {
            STANDARD.encode(&response.body)
        };

        ProxyResponse {
            status_code: response.status.as_u16(),
            headers: response.headers.into_iter().collect(),
            body,
            is_base64_encoded: !is_text,
        }
    }
}

fn parse_method(raw: &str) -> Result<Method, InvocationError> {
    Method::from_bytes(raw.to_ascii_uppercase().as_bytes())
        .map_err(|_| InvocationError::MalformedEvent(format!("unknown method {raw}")))
}

fn decode_body(body: Option<String>, base64: bool) -> Result<Vec<u8>, InvocationError> {
    match body {
        None => Ok(Vec::new()),
        Some(body) if base64 => STANDARD
            .decode(body.as_bytes())
            .map_err(|e| InvocationError::InvalidBody(e.to_string())),
        Some(body) => Ok(body.into_bytes()),
    }
}

fn lowercase_headers(headers: HashMap<String, String>) -> Vec<(String, String)> {
    headers.into_iter().map(|(k, v)| (k.to_ascii_lowercase(), v)).collect()
}

fn encode_query(pairs: impl IntoIterator<Item = (String, String)>) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

fn finish_request(
    method: Method,
    path: String,
    query: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    fallback_host: Option<String>,
) -> SiteRequest {
    let mut request = SiteRequest::new(method, path);
    request.query = query;
    request.headers = headers;
    request.body = body;
    request.scheme = request
        .header("x-forwarded-proto")
        .map(|proto| proto.split(',').next().unwrap_or(proto).trim().to_string())
        .unwrap_or_else(|| "https".to_string());
    request.host = request
        .header("x-forwarded-host")
        .or_else(|| request.header("host"))
        .map(str::to_string)
        .or(fallback_host)
        .unwrap_or_default();
    request
}

fn from_rest_api(event: RestApiEvent) -> Result<SiteRequest, InvocationError> {
    let query = match (event.multi_value_query_string_parameters, event.query_string_parameters) {
        (Some(multi), _) => encode_query(
            multi.into_iter().flat_map(|(k, values)| values.into_iter().map(move |v| (k.clone(), v))),
        ),
        (None, Some(single)) => encode_query(single),
        (None, None) => String::new(),
    };

    Ok(finish_request(
        parse_method(&event.http_method)?,
        event.path,
        query,
        lowercase_headers(event.headers.unwrap_or_default()),
        decode_body(event.body, event.is_base64_encoded)?,
        None,
    ))
}

fn from_http_api(event: HttpApiEvent) -> Result<SiteRequest, InvocationError> {
    let mut headers = lowercase_headers(event.headers);
    if !event.cookies.is_empty() {
        headers.push(("cookie".to_string(), event.cookies.join("; ")));
    }

    Ok(finish_request(
        parse_method(&event.request_context.http.method)?,
        event.raw_path,
        event.raw_query_string,
        headers,
        decode_body(event.body, event.is_base64_encoded)?,
        event.request_context.domain_name,
    ))
}

fn from_vercel(event: &Value) -> Result<SiteRequest, InvocationError> {
    let payload = event
        .get("body")
        .and_then(Value::as_str)
        .ok_or_else(|| InvocationError::MalformedEvent("Invoke action without a body".into()))?;
    let request: VercelRequest =
        serde_json::from_str(payload).map_err(|e| InvocationError::MalformedEvent(e.to_string()))?;

    let (path, query) = match request.path.split_once('?') {
        Some((path, query)) => (path.to_string(), query.to_string()),
        None => (request.path.clone(), String::new()),
    };
    let base64 = request.encoding.as_deref() == Some("base64");

    Ok(finish_request(
        parse_method(&request.method)?,
        path,
        query,
        lowercase_headers(request.headers),
        decode_body(request.body, base64)?,
        None,
    ))
}

/// Recognizes the event shape and builds the request from it.
pub fn site_request_from_event(event: Value) -> Result<SiteRequest, InvocationError> {
    if event.get("Action").and_then(Value::as_str) == Some("Invoke") {
        return from_vercel(&event);
    }

    let is_http_api = event.get("version").and_then(Value::as_str) == Some("2.0")
        || event.get("rawPath").is_some();
    if is_http_api {
        let event: HttpApiEvent =
            serde_json::from_value(event).map_err(|e| InvocationError::MalformedEvent(e.to_string()))?;
        return from_http_api(event);
    }

    if event.get("httpMethod").is_some() {
        let event: RestApiEvent =
            serde_json::from_value(event).map_err(|e| InvocationError::MalformedEvent(e.to_string()))?;
        return from_rest_api(event);
    }

    Err(InvocationError::MalformedEvent("unrecognized event shape".into()))
}

/// Handles one serverless invocation and returns the proxy response.
pub async fn call_event(
    service: &SiteService,
    event: Value,
    context: &InvocationContext,
) -> Result<ProxyResponse, InvocationError> {
    let request = site_request_from_event(event).inspect_err(|e| {
        tracing::warn!(request_id = %context.request_id, "Rejected invocation: {}", e);
    })?;

    tracing::info!(
        request_id = %context.request_id,
        method = %request.method,
        path = %request.path,
        "Serverless invocation"
    );

    let response = service.call(request).await;
    Ok(ProxyResponse::from(response))
}

/// Serverless loop driven by `lambda_runtime`.
pub struct InvocationEntry;

#[async_trait(?Send)]
impl EntryPoint for InvocationEntry {
    async fn run(self, app: Application) -> Result<(), StartupError> {
        let service = Rc::new(SiteService::new(app.state.clone()).await?);

        let handler = service_fn(move |event: LambdaEvent<Value>| {
            let service = Rc::clone(&service);
            async move {
                let context = InvocationContext::from(&event.context);
                call_event(&service, event.payload, &context)
                    .await
                    .map_err(lambda_runtime::Error::from)
            }
        });

        lambda_runtime::run(handler)
            .await
            .map_err(|e| StartupError::Runtime(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rest_api_events_keep_query_and_headers() {
        let event = json!({
            "httpMethod": "GET",
            "path": "/students/",
            "headers": { "Host": "example.vercel.app", "X-Forwarded-Proto": "https" },
            "queryStringParameters": { "page": "2" },
            "body": null,
            "isBase64Encoded": false
        });

        let request = site_request_from_event(event).unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/students/");
        assert_eq!(request.query, "page=2");
        assert_eq!(request.host, "example.vercel.app");
        assert_eq!(request.scheme, "https");
    }

    #[test]
    fn http_api_events_decode_base64_bodies() {
        let event = json!({
            "version": "2.0",
            "rawPath": "/contact/",
            "rawQueryString": "",
            "headers": { "content-type": "application/x-www-form-urlencoded" },
            "requestContext": { "http": { "method": "POST" }, "domainName": "abc.lambda-url.aws" },
            "body": STANDARD.encode("name=A"),
            "isBase64Encoded": true
        });

        let request = site_request_from_event(event).unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.host, "abc.lambda-url.aws");
        assert_eq!(request.body, b"name=A");
    }

    #[test]
    fn vercel_invoke_splits_the_query() {
        let inner = json!({
            "method": "GET",
            "path": "/for-loop/?x=1",
            "headers": { "host": "site.now.sh" }
        });
        let event = json!({ "Action": "Invoke", "body": inner.to_string() });

        let request = site_request_from_event(event).unwrap();
        assert_eq!(request.path, "/for-loop/");
        assert_eq!(request.query, "x=1");
        assert_eq!(request.host, "site.now.sh");
    }

    #[test]
    fn unknown_shapes_are_rejected() {
        let err = site_request_from_event(json!({ "hello": "world" })).unwrap_err();
        assert!(matches!(err, InvocationError::MalformedEvent(_)));
    }

    #[test]
    fn binary_responses_are_base64_encoded() {
        let response = SiteResponse::new(actix_web::http::StatusCode::OK, "image/png", vec![0u8, 159, 146]);
        let proxy = ProxyResponse::from(response);

        assert!(proxy.is_base64_encoded);
        assert_eq!(STANDARD.decode(proxy.body).unwrap(), vec![0u8, 159, 146]);
    }
}

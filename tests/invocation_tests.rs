mod test_utils;

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD, Engine};
use portfolio_site::entry::{call_environ, call_event, InvocationContext, SiteService};
use serde_json::{json, Value};
use test_utils::{AdminTestHelpers, TestApp};

fn context() -> InvocationContext {
    InvocationContext { request_id: "test-request".into() }
}

async fn site_service(app: &TestApp) -> SiteService {
    SiteService::new(app.state.clone()).await.unwrap()
}

async fn listener_body(app: &TestApp, path: &str) -> String {
    let response = app.client.get(app.url(path)).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    response.text().await.unwrap()
}

#[actix_rt::test]
async fn rest_api_event_matches_listener_output() {
    let app = TestApp::spawn().await;
    let service = site_service(&app).await;
    let expected = listener_body(&app, "/students/").await;

    let event = json!({
        "httpMethod": "GET",
        "path": "/students/",
        "headers": { "Host": "localhost" },
        "queryStringParameters": null,
        "body": null,
        "isBase64Encoded": false
    });
    let response = call_event(&service, event, &context()).await.unwrap();

    assert_eq!(response.status_code, 200);
    assert!(!response.is_base64_encoded);
    assert_eq!(response.body, expected);
}

#[actix_rt::test]
async fn http_api_event_matches_listener_output() {
    let app = TestApp::spawn().await;
    let service = site_service(&app).await;
    let expected = listener_body(&app, "/about/").await;

    let event = json!({
        "version": "2.0",
        "rawPath": "/about/",
        "rawQueryString": "",
        "headers": {},
        "requestContext": {
            "domainName": "localhost",
            "http": { "method": "GET" }
        },
        "isBase64Encoded": false
    });
    let response = call_event(&service, event, &context()).await.unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, expected);
}

#[actix_rt::test]
async fn vercel_invoke_posts_the_contact_form() {
    let app = TestApp::spawn().await;
    let service = site_service(&app).await;

    let request = json!({
        "method": "POST",
        "path": "/contact/",
        "headers": {
            "host": "localhost",
            "content-type": "application/x-www-form-urlencoded",
            "accept": "application/json"
        },
        "body": STANDARD.encode("name=Ada&email=ada%40example.com"),
        "encoding": "base64"
    });
    let event = json!({ "Action": "Invoke", "body": request.to_string() });

    let response = call_event(&service, event, &context()).await.unwrap();

    assert_eq!(response.status_code, 200);
    let context: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(context["message_sent"], true);
    assert_eq!(context["form_data"]["name"], "Ada");
    assert!(context["form_data"]["lastname"].is_null());
}

#[actix_rt::test]
async fn event_with_disallowed_host_is_a_bad_request() {
    let app = TestApp::spawn().await;
    let service = site_service(&app).await;

    let event = json!({
        "httpMethod": "GET",
        "path": "/",
        "headers": { "Host": "evil.com" }
    });
    let response = call_event(&service, event, &context()).await.unwrap();

    assert_eq!(response.status_code, 400);
}

#[actix_rt::test]
async fn admin_api_answers_events_with_bearer_token() {
    let app = TestApp::spawn().await;
    let service = site_service(&app).await;
    let token = app.admin_token().await;

    let event = json!({
        "httpMethod": "GET",
        "path": "/admin/health",
        "headers": { "Host": "localhost", "Authorization": format!("Bearer {token}") }
    });
    let response = call_event(&service, event, &context()).await.unwrap();

    assert_eq!(response.status_code, 200);
}

#[actix_rt::test]
async fn admin_api_event_without_token_is_unauthorized() {
    let app = TestApp::spawn().await;
    let service = site_service(&app).await;

    let event = json!({
        "httpMethod": "GET",
        "path": "/admin/skills",
        "headers": { "Host": "localhost" }
    });
    let response = call_event(&service, event, &context()).await.unwrap();

    assert_eq!(response.status_code, 401);
}

#[actix_rt::test]
async fn unrecognized_event_is_rejected() {
    let app = TestApp::spawn().await;
    let service = site_service(&app).await;

    let result = call_event(&service, json!({ "hello": "world" }), &context()).await;

    assert!(result.is_err());
}

#[actix_rt::test]
async fn static_assets_are_base64_only_when_binary() {
    let app = TestApp::spawn().await;
    let service = site_service(&app).await;

    let event = json!({
        "httpMethod": "GET",
        "path": "/static/css/style.css",
        "headers": { "Host": "localhost" }
    });
    let response = call_event(&service, event, &context()).await.unwrap();

    assert_eq!(response.status_code, 200);
    assert!(!response.is_base64_encoded);
    assert!(response.headers["content-type"].starts_with("text/css"));
}

#[actix_rt::test]
async fn environ_call_matches_listener_output() {
    let app = TestApp::spawn().await;
    let service = site_service(&app).await;
    let expected = listener_body(&app, "/for-loop/").await;

    let environ: HashMap<String, String> = [
        ("REQUEST_METHOD", "GET"),
        ("PATH_INFO", "/for-loop/"),
        ("QUERY_STRING", ""),
        ("SERVER_NAME", "localhost"),
        ("SERVER_PORT", "8000"),
        ("wsgi.url_scheme", "http"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let mut started = None;
    let body = call_environ(&service, &environ, Vec::new(), |status, headers| {
        started = Some((status.to_string(), headers.to_vec()));
    })
    .await;

    let (status, headers) = started.expect("start_response was not called");
    assert_eq!(status, "200 OK");
    let length = headers.iter().find(|(k, _)| k == "content-length").map(|(_, v)| v.clone());
    assert_eq!(length, Some(body.len().to_string()));
    assert_eq!(String::from_utf8(body).unwrap(), expected);
}

#[actix_rt::test]
async fn environ_with_unknown_method_is_a_bad_request() {
    let app = TestApp::spawn().await;
    let service = site_service(&app).await;

    let environ: HashMap<String, String> = [("REQUEST_METHOD", "BAD METHOD"), ("PATH_INFO", "/")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let mut status_line = String::new();
    call_environ(&service, &environ, Vec::new(), |status, _| status_line = status.to_string()).await;

    assert!(status_line.starts_with("400"));
}

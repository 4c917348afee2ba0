mod test_utils;

use portfolio_site::entities::student::{NamePrefix, NewStudent};
use test_utils::TestApp;

#[actix_rt::test]
async fn home_renders_html_with_and_without_trailing_slash() {
    let app = TestApp::spawn().await;

    for path in ["/", "/home", "/home/"] {
        let response = app.client.get(app.url(path)).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 200, "GET {}", path);

        let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/html"));
        let body = response.text().await.unwrap();
        assert!(body.contains("My Portfolio"));
    }
}

#[actix_rt::test]
async fn home_context_uses_default_site_before_configuration() {
    let app = TestApp::spawn().await;

    let context = app.get_page_json("/").await;

    assert_eq!(context["page"], "home");
    assert_eq!(context["site"]["site_title"], "My Portfolio");
    assert_eq!(context["static_url"], "/static");
    assert_eq!(context["featured_skills"].as_array().unwrap().len(), 0);
}

#[actix_rt::test]
async fn students_are_listed_by_student_id() {
    let app = TestApp::spawn().await;

    for (id, first) in [(3, "Somchai"), (1, "Malee"), (2, "Niran")] {
        app.state
            .student_handler
            .create_student(NewStudent {
                student_id: id,
                name_prefix: NamePrefix::Mr,
                first_name: first.into(),
                last_name: "Jaidee".into(),
            })
            .await
            .unwrap();
    }

    let context = app.get_page_json("/students/").await;

    let ids: Vec<i64> = context["students"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["student_id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(context["total_students"], 3);
    assert_eq!(context["students"][0]["full_name"], "Mr. Malee Jaidee");
}

#[actix_rt::test]
async fn empty_roster_shows_placeholder() {
    let app = TestApp::spawn().await;

    let body = app.client.get(app.url("/students/")).send().await.unwrap().text().await.unwrap();

    assert!(body.contains("No students have been added yet."));
}

#[actix_rt::test]
async fn for_loop_counts_to_twelve() {
    let app = TestApp::spawn().await;

    let context = app.get_page_json("/for-loop/").await;

    let count: Vec<u64> = context["count"].as_array().unwrap().iter().map(|n| n.as_u64().unwrap()).collect();
    assert_eq!(count, (1..=12).collect::<Vec<u64>>());
    assert_eq!(context["items"].as_array().unwrap().len(), 6);
    assert_eq!(context["selected_skills"].as_array().unwrap().len(), 0);
}

#[actix_rt::test]
async fn for_loop_post_echoes_selected_skills() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/for-loop/"))
        .header("Accept", "application/json")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body("skills=Python&skills=Django")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let context: serde_json::Value = response.json().await.unwrap();
    assert_eq!(context["selected_skills"], serde_json::json!(["Python", "Django"]));
}

#[actix_rt::test]
async fn contact_post_echoes_the_submission() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/contact/"))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body("name=Ada&lastname=Lovelace&email=ada%40example.com&message=Hello")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("Thank you, Ada Lovelace"));
    assert!(body.contains("ada@example.com"));

    let stored = app.state.contact_handler.list_contact_messages().await.unwrap();
    assert_eq!(stored.total, 0);
}

#[actix_rt::test]
async fn contact_get_shows_empty_form() {
    let app = TestApp::spawn().await;

    let context = app.get_page_json("/contact/").await;

    assert_eq!(context["message_sent"], false);
    assert!(context.get("form_data").is_none());
}

#[actix_rt::test]
async fn wrong_method_is_rejected_with_allow_header() {
    let app = TestApp::spawn().await;

    let response = app.client.delete(app.url("/about/")).send().await.unwrap();

    assert_eq!(response.status().as_u16(), 405);
    let allow = response.headers()["allow"].to_str().unwrap();
    assert!(allow.contains("GET"));
    assert!(!allow.contains("POST"));
}

#[actix_rt::test]
async fn unknown_path_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app.client.get(app.url("/does-not-exist/")).send().await.unwrap();

    assert_eq!(response.status().as_u16(), 404);
}

#[actix_rt::test]
async fn disallowed_host_is_a_bad_request() {
    let app = TestApp::spawn().await;

    let response = app.client
        .get(app.url("/"))
        .header("Host", "evil.com")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[actix_rt::test]
async fn stylesheet_is_served_from_static_prefix() {
    let app = TestApp::spawn().await;

    let response = app.client.get(app.url("/static/css/style.css")).send().await.unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/css"));
}

#[actix_rt::test]
async fn static_path_traversal_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app.client.get(app.url("/static/..%2FCargo.toml")).send().await.unwrap();

    assert_eq!(response.status().as_u16(), 404);
}

#[actix_rt::test]
async fn contact_post_returns_same_values_as_json() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/contact/"))
        .header("Accept", "application/json")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body("name=A&lastname=B&email=a%40b.com&message=hi")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let context: serde_json::Value = response.json().await.unwrap();
    assert_eq!(context["message_sent"], true);
    assert_eq!(
        context["form_data"],
        serde_json::json!({ "name": "A", "lastname": "B", "email": "a@b.com", "message": "hi" })
    );
}

#[actix_rt::test]
async fn repeated_contact_field_echoes_last_value() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/contact/"))
        .header("Accept", "application/json")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body("name=A&name=B")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let context: serde_json::Value = response.json().await.unwrap();
    assert_eq!(context["form_data"]["name"], "B");
}

#[actix_rt::test]
async fn empty_contact_post_does_not_error() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/contact/"))
        .header("Accept", "application/json")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body("")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let context: serde_json::Value = response.json().await.unwrap();
    assert_eq!(context["message_sent"], true);
    assert!(context["form_data"]["name"].is_null());
}

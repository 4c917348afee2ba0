mod test_utils;

use serde_json::{json, Value};
use test_utils::{AdminTestHelpers, TestApp, ADMIN_EMAIL};

#[actix_rt::test]
async fn admin_api_requires_credentials() {
    let app = TestApp::spawn().await;

    let response = app.client.get(app.url("/admin/skills")).send().await.unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[actix_rt::test]
async fn garbage_token_is_unauthorized() {
    let app = TestApp::spawn().await;

    let response = app.client
        .get(app.url("/admin/skills"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[actix_rt::test]
async fn login_with_wrong_password_fails() {
    let app = TestApp::spawn().await;
    app.create_admin().await;

    let response = app.client
        .post(app.url("/admin/login"))
        .json(&json!({ "email": ADMIN_EMAIL, "password": "wrong-password" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
}

#[actix_rt::test]
async fn login_sets_session_cookie_usable_without_bearer() {
    let app = TestApp::spawn().await;
    app.create_admin().await;

    let response = app.client
        .post(app.url("/admin/login"))
        .json(&json!({ "email": "ADMIN@example.com", "password": test_utils::ADMIN_PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let set_cookie = response.headers()["set-cookie"].to_str().unwrap().to_string();
    assert!(set_cookie.starts_with("admin_session="));
    assert!(set_cookie.contains("HttpOnly"));

    // The client's cookie store replays the session.
    let response = app.client.get(app.url("/admin/skills")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[actix_rt::test]
async fn health_reports_database_and_cache() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let response = app.client.get(app.url("/admin/health")).bearer_auth(&token).send().await.unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["environment"], "testing");
    assert_eq!(body["cache_backend"], "dummy");
}

#[actix_rt::test]
async fn skill_crud_round_trip() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let response = app.client
        .post(app.url("/admin/skills"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Rust", "proficiency": 80, "category": "backend", "is_featured": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let skill: Value = response.json().await.unwrap();
    let id = skill["id"].as_i64().unwrap();

    let response = app.client
        .put(app.url(&format!("/admin/skills/{}", id)))
        .bearer_auth(&token)
        .json(&json!({ "name": "Rust", "proficiency": 90, "category": "backend" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["proficiency"], 90);

    let response = app.client
        .delete(app.url(&format!("/admin/skills/{}", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);

    let response = app.client
        .get(app.url(&format!("/admin/skills/{}", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[actix_rt::test]
async fn invalid_skill_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let response = app.client
        .post(app.url("/admin/skills"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Rust", "proficiency": 150 }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Validation failed");
}

#[actix_rt::test]
async fn deleting_a_skill_keeps_its_projects() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let skill: Value = app.client
        .post(app.url("/admin/skills"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Django", "proficiency": 75, "category": "backend" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let skill_id = skill["id"].as_i64().unwrap();

    let response = app.client
        .post(app.url("/admin/projects"))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Portfolio",
            "description": "Personal site",
            "short_description": "Site",
            "technology_ids": [skill_id]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let project: Value = response.json().await.unwrap();
    let project_id = project["id"].as_i64().unwrap();
    assert_eq!(project["technologies"][0]["name"], "Django");

    app.client
        .delete(app.url(&format!("/admin/skills/{}", skill_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    let project: Value = app.client
        .get(app.url(&format!("/admin/projects/{}", project_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(project["title"], "Portfolio");
    assert_eq!(project["technologies"].as_array().unwrap().len(), 0);
}

#[actix_rt::test]
async fn only_one_site_configuration_may_exist() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let response = app.client
        .get(app.url("/admin/site-configuration"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let response = app.client
        .post(app.url("/admin/site-configuration"))
        .bearer_auth(&token)
        .json(&json!({ "site_title": "Ada's Portfolio" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    let response = app.client
        .post(app.url("/admin/site-configuration"))
        .bearer_auth(&token)
        .json(&json!({ "site_title": "Second" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let context = app.get_page_json("/").await;
    assert_eq!(context["site"]["site_title"], "Ada's Portfolio");
}

#[actix_rt::test]
async fn contact_message_can_only_be_replied_to_once() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let message: Value = app.client
        .post(app.url("/admin/contact-messages"))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Ada",
            "email": "ada@example.com",
            "subject": "Hello",
            "message": "Nice site"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = message["id"].as_i64().unwrap();
    assert_eq!(message["is_read"], false);

    let read: Value = app.client
        .post(app.url(&format!("/admin/contact-messages/{}/read", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(read["is_read"], true);

    let response = app.client
        .post(app.url(&format!("/admin/contact-messages/{}/reply", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let replied: Value = response.json().await.unwrap();
    assert!(replied["replied_at"].is_string());

    let response = app.client
        .post(app.url(&format!("/admin/contact-messages/{}/reply", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 409);
}

#[actix_rt::test]
async fn duplicate_student_id_is_a_conflict() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;
    let student = json!({
        "student_id": 1,
        "name_prefix": "miss",
        "first_name": "Malee",
        "last_name": "Jaidee"
    });

    let response = app.client
        .post(app.url("/admin/students"))
        .bearer_auth(&token)
        .json(&student)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);

    let response = app.client
        .post(app.url("/admin/students"))
        .bearer_auth(&token)
        .json(&student)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 409);
}

#[actix_rt::test]
async fn malformed_json_body_is_a_bad_request() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let response = app.client
        .post(app.url("/admin/skills"))
        .bearer_auth(&token)
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

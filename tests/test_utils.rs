use std::{net::TcpListener, time::Duration};

use actix_web::web;
use async_trait::async_trait;
use portfolio_site::{
    entities::{admin_user::NewAdminUser, token::AuthResponse},
    entry::listener::serve,
    settings::{AppConfig, AppEnvironment},
    startup::Application,
    AppState,
};
use reqwest::Client;
use serde_json::{json, Value};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "Tangerine-Harbor-47!";

pub struct TestApp {
    pub state: web::Data<AppState>,
    pub address: String,
    pub client: Client,
}

impl TestApp {
    /// Starts the listener on a random port backed by a private in-memory database.
    pub async fn spawn() -> Self {
        let mut config = AppConfig::for_environment(AppEnvironment::Testing)
            .expect("Failed to load testing profile");
        config.server.workers = 1;

        let app = Application::build(config)
            .await
            .expect("Failed to build application");
        let state = app.state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let server = serve(listener, &app).expect("Failed to bind server");
        tokio::spawn(server);

        let client = Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();
        while client.get(format!("{}/", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self { state, address, client }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Fetches a public page as JSON so assertions can inspect its context.
    pub async fn get_page_json(&self, path: &str) -> Value {
        let response = self.client
            .get(self.url(path))
            .header("Accept", "application/json")
            .send()
            .await
            .expect("Failed to fetch page");
        assert_eq!(response.status().as_u16(), 200, "GET {} failed", path);
        response.json().await.expect("Page context was not JSON")
    }
}

#[async_trait]
pub trait AdminTestHelpers: Send + Sync {
    async fn create_admin(&self);
    async fn login_admin(&self) -> AuthResponse;
    async fn admin_token(&self) -> String;
}

#[async_trait]
impl AdminTestHelpers for TestApp {
    async fn create_admin(&self) {
        self.state
            .auth_handler
            .create_admin(NewAdminUser {
                email: ADMIN_EMAIL.into(),
                password: ADMIN_PASSWORD.into(),
            })
            .await
            .expect("Failed to create admin");
    }

    async fn login_admin(&self) -> AuthResponse {
        let response = self.client
            .post(self.url("/admin/login"))
            .json(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
            .send()
            .await
            .expect("Failed to log in");

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            panic!("Login failed: ({}): {}", status, body);
        }

        let body: Value = response.json().await.expect("Failed to parse login response");
        AuthResponse::new(
            body["access_token"].as_str().unwrap().to_string(),
            body["expires_in"].as_i64().unwrap(),
        )
    }

    async fn admin_token(&self) -> String {
        self.create_admin().await;
        self.login_admin().await.access_token
    }
}

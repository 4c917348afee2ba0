use std::env;

use portfolio_site::{
    entry::{EntryPoint, InvocationEntry},
    errors::StartupError,
    settings::AppConfig,
    startup::Application,
    telemetry,
};

/// Deployed functions run the production profile unless told otherwise.
fn with_platform_defaults(key: &str) -> Option<String> {
    env::var(key).ok().or_else(|| match key {
        "DJANGO_ENV" => Some("production".to_string()),
        "DEBUG" => Some("false".to_string()),
        _ => None,
    })
}

#[actix_web::main]
async fn main() -> Result<(), StartupError> {
    dotenv::dotenv().ok();

    let config = AppConfig::from_lookup(with_platform_defaults).inspect_err(|e| {
        eprintln!("Error initializing application: {e}");
    })?;
    telemetry::init(&config.logging);

    let app = Application::build(config).await.inspect_err(|e| {
        tracing::error!("Error initializing application: {}", e);
    })?;

    InvocationEntry.run(app).await
}

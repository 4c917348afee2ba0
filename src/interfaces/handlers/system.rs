use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use serde::Serialize;
use std::time::Duration;

use crate::{
    constants::START_TIME,
    repositories::admin_user::AdminUserRepository,
    use_cases::extractors::AdminClaims,
    AppState,
};

#[derive(Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    environment: String,
    uptime: String,
    timestamp: String,
    start_at: String,
    version: &'static str,
    database: &'static str,
    cache_backend: String,
    cache_status: &'static str,
}

async fn build_health_response(state: &AppState) -> HealthCheckResponse {
    let now_utc = Utc::now();
    let uptime = now_utc.signed_duration_since(*START_TIME);
    let human_uptime = format_duration(Duration::from_secs(uptime.num_seconds().max(0) as u64));

    let database = match state.auth_handler.admin_repo.check_connection().await {
        Ok(_) => "OK",
        Err(e) => {
            tracing::warn!("Database health check failed: {}", e);
            "Unavailable"
        }
    };

    let cache_status = match state.cache.ping().await {
        Ok(_) => "OK",
        Err(e) => {
            tracing::warn!("Cache health check failed: {}", e);
            "Unavailable"
        }
    };

    let status = if database == "OK" { "healthy" } else { "degraded" };

    HealthCheckResponse {
        status,
        environment: state.config.env.to_string(),
        uptime: human_uptime.to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
        database,
        cache_backend: format!("{:?}", state.cache.backend()).to_lowercase(),
        cache_status,
    }
}

pub async fn admin_health_check(_claims: AdminClaims, state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(build_health_response(&state).await)
}

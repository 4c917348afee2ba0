use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::site_config::SiteConfigurationInput,
    errors::AppError,
    use_cases::extractors::AdminClaims,
    AppState,
};

/// The saved configuration, or 404 when none has been created yet.
#[instrument(skip(_claims, state))]
pub async fn get_site_configuration(
    _claims: AdminClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let site = state
        .site_handler
        .current()
        .await?
        .ok_or_else(|| AppError::NotFound("No site configuration has been saved".to_string()))?;
    Ok(HttpResponse::Ok().json(site))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_site_configuration(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<SiteConfigurationInput>,
) -> Result<impl Responder, AppError> {
    let site = state.site_handler.create(data.into_inner()).await?;
    state.invalidate_pages().await;
    Ok(HttpResponse::Created().json(site))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_site_configuration(
    _claims: AdminClaims,
    site_id: web::Path<i64>,
    state: web::Data<AppState>,
    data: web::Json<SiteConfigurationInput>,
) -> Result<impl Responder, AppError> {
    let site = state.site_handler.update(site_id.into_inner(), data.into_inner()).await?;
    state.invalidate_pages().await;
    Ok(HttpResponse::Ok().json(site))
}

use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::contact_message::ContactMessageInput,
    errors::AppError,
    use_cases::extractors::AdminClaims,
    AppState,
};

#[instrument(skip(_claims, state))]
pub async fn list_messages(
    _claims: AdminClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let listing = state.contact_handler.list_contact_messages().await?;
    Ok(HttpResponse::Ok().json(listing))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_message(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<ContactMessageInput>,
) -> Result<impl Responder, AppError> {
    let message = state.contact_handler.create_contact_message(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(message))
}

#[instrument(skip(_claims, state))]
pub async fn get_message(
    _claims: AdminClaims,
    message_id: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let message = state.contact_handler.get_contact_message(message_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(message))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_message(
    _claims: AdminClaims,
    message_id: web::Path<i64>,
    state: web::Data<AppState>,
    data: web::Json<ContactMessageInput>,
) -> Result<impl Responder, AppError> {
    let message = state
        .contact_handler
        .update_contact_message(message_id.into_inner(), data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(message))
}

#[instrument(skip(_claims, state))]
pub async fn delete_message(
    _claims: AdminClaims,
    message_id: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.contact_handler.delete_contact_message(message_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(_claims, state))]
pub async fn mark_read(
    _claims: AdminClaims,
    message_id: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let message = state.contact_handler.mark_read(message_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(message))
}

#[instrument(skip(_claims, state))]
pub async fn mark_replied(
    _claims: AdminClaims,
    message_id: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let message = state.contact_handler.mark_replied(message_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(message))
}

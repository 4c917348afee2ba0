use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::student::{NewStudent, StudentUpdate},
    errors::AppError,
    use_cases::extractors::AdminClaims,
    AppState,
};

#[instrument(skip(_claims, state))]
pub async fn list_students(
    _claims: AdminClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let listing = state.student_handler.list_students().await?;
    Ok(HttpResponse::Ok().json(listing))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_student(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    data: web::Json<NewStudent>,
) -> Result<impl Responder, AppError> {
    let student = state.student_handler.create_student(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(student))
}

#[instrument(skip(_claims, state))]
pub async fn get_student(
    _claims: AdminClaims,
    student_id: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let student = state.student_handler.get_student(student_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(student))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_student(
    _claims: AdminClaims,
    student_id: web::Path<i64>,
    state: web::Data<AppState>,
    data: web::Json<StudentUpdate>,
) -> Result<impl Responder, AppError> {
    let student = state
        .student_handler
        .update_student(student_id.into_inner(), data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(student))
}

#[instrument(skip(_claims, state))]
pub async fn delete_student(
    _claims: AdminClaims,
    student_id: web::Path<i64>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.student_handler.delete_student(student_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

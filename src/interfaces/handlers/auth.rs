use actix_web::{
    cookie::{time::Duration, Cookie, SameSite},
    web, HttpResponse,
};
use tracing::instrument;

use crate::{
    constants::ADMIN_SESSION_COOKIE,
    entities::admin_user::LoginAdmin,
    errors::AuthError,
    AppState,
};

#[instrument(skip(state, credentials))]
pub async fn login(
    state: web::Data<AppState>,
    credentials: web::Json<LoginAdmin>,
) -> Result<HttpResponse, AuthError> {
    let mut credentials = credentials.into_inner();
    credentials.email = credentials.email.trim().to_lowercase();

    let response = state.auth_handler.login(credentials).await?;

    let cookie = Cookie::build(ADMIN_SESSION_COOKIE, response.access_token.clone())
        .path("/admin")
        .http_only(true)
        .secure(state.config.security.secure_cookies)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(response.expires_in))
        .finish();

    Ok(HttpResponse::Ok().cookie(cookie).json(response))
}
